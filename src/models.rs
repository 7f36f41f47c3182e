// ABOUTME: Re-exports domain models from the core crate
// ABOUTME: Recipe, ingredient, meal-time, match query and user types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

pub use ezy_cook_core::models::*;
