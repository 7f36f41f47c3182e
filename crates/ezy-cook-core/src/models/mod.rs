// ABOUTME: Core data models shared by the database, services and HTTP layers
// ABOUTME: Re-exports recipe, ingredient, meal-time, query and user types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

/// Recipe documents, ingredients, meal times and match queries
pub mod recipe;

/// User accounts
pub mod user;

pub use recipe::{Ingredient, MealTime, Recipe, RecipeAuthor, RecipeQuery, RecipeSuggestion};
pub use user::User;
