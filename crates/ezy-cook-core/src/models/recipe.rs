// ABOUTME: Recipe domain model with ingredients, tools and meal-time classification
// ABOUTME: Also defines the normalized match query used by the tiered recipe matcher
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Meal time a system recipe is curated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening snack
    Evening,
    /// Evening meal
    Dinner,
    /// Holidays, parties and other celebrations
    #[serde(rename = "special occasion", alias = "special-occasion")]
    SpecialOccasion,
}

impl MealTime {
    /// All meal times in display order
    pub const ALL: [Self; 5] = [
        Self::Breakfast,
        Self::Lunch,
        Self::Evening,
        Self::Dinner,
        Self::SpecialOccasion,
    ];

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Evening => "evening",
            Self::Dinner => "dinner",
            Self::SpecialOccasion => "special occasion",
        }
    }

    /// Parse a meal time case-insensitively
    ///
    /// Accepts `special occasion`, `special-occasion` and `special_occasion`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|meal_time| meal_time.as_str() == normalized)
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name (matched case-insensitively by the filter endpoint)
    pub name: String,
    /// Free-form quantity such as "2 cups"
    pub quantity: String,
}

/// Public profile fields of a recipe's creator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeAuthor {
    /// User ID
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Username
    pub username: String,
    /// Email address
    pub email: String,
}

/// A recipe document, either system-curated or user-authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Recipe title
    pub title: String,
    /// Cooking description
    pub description: String,
    /// Ingredients with quantities, in display order
    pub ingredients: Vec<Ingredient>,
    /// Kitchen tools required, in display order
    pub tools: Vec<String>,
    /// Meal time (user recipes may leave this empty)
    pub meal_time: Option<MealTime>,
    /// Number of servings
    pub servings: u32,
    /// Stored image path or URL (empty when absent)
    pub image: String,
    /// Video URL (empty when absent)
    pub video_url: String,
    /// Creator; `None` for system recipes ingested without an owner
    pub created_by: Option<Uuid>,
    /// Populated creator profile on list/detail responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<RecipeAuthor>,
    /// System recipes are the curated catalog searched by filter/suggest
    pub is_system: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Iterate over ingredient names
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|ingredient| ingredient.name.as_str())
    }

    /// Whether `user_id` owns this recipe
    #[must_use]
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by == Some(user_id)
    }
}

/// Title-only projection returned by the suggestion search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    /// Recipe ID
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Recipe title
    pub title: String,
}

/// Normalized selectors for the tiered recipe matcher
///
/// Selector values are trimmed, lowercased and deduplicated, so `tools` and
/// `ingredients` behave as case-insensitive sets. A blank meal time is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    /// Desired tools
    pub tools: Vec<String>,
    /// Desired ingredient names
    pub ingredients: Vec<String>,
    /// Required meal time (exact, case-insensitive)
    pub meal_time: Option<String>,
}

impl RecipeQuery {
    /// Build a normalized query from raw request values
    #[must_use]
    pub fn new<T, I>(tools: T, ingredients: I, meal_time: Option<&str>) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let meal_time = meal_time
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());

        Self {
            tools: normalize_selectors(tools),
            ingredients: normalize_selectors(ingredients),
            meal_time,
        }
    }

    /// Whether the query carries no tool or ingredient selectors
    #[must_use]
    pub fn has_no_selectors(&self) -> bool {
        self.tools.is_empty() && self.ingredients.is_empty()
    }
}

fn normalize_selectors<T>(values: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|value| value.as_ref().trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
