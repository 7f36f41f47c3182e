// ABOUTME: Catalog query port consumed by the tiered recipe matcher
// ABOUTME: Describes structured recipe filters independently of the storage engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

use crate::errors::AppResult;
use crate::models::{MealTime, Recipe};
use async_trait::async_trait;

/// Set-membership constraint on one list-valued recipe field
///
/// Values are compared case-insensitively against the recipe's tools or
/// ingredient names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AxisConstraint {
    /// No constraint on this field
    #[default]
    Unconstrained,
    /// Every value must be present
    All(Vec<String>),
    /// At least one value must be present
    Any(Vec<String>),
}

impl AxisConstraint {
    /// Constraint for one matcher tier on an axis with `selected` values
    ///
    /// `None` (an empty axis) and empty selections are unconstrained. A tier
    /// equal to the selection size requires all values, anything lower
    /// requires any of them and leaves the exact count to the caller.
    #[must_use]
    pub fn for_tier(selected: &[String], tier: Option<usize>) -> Self {
        match tier {
            Some(_) if selected.is_empty() => Self::Unconstrained,
            Some(tier) if tier >= selected.len() => Self::All(selected.to_vec()),
            Some(_) => Self::Any(selected.to_vec()),
            None => Self::Unconstrained,
        }
    }

    /// Whether a candidate list satisfies this constraint
    #[must_use]
    pub fn admits<'a, I>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let candidates: Vec<String> = candidates.into_iter().map(str::to_lowercase).collect();
        match self {
            Self::Unconstrained => true,
            Self::All(values) => values
                .iter()
                .all(|value| candidates.contains(&value.to_lowercase())),
            Self::Any(values) => values
                .iter()
                .any(|value| candidates.contains(&value.to_lowercase())),
        }
    }
}

/// Structured filter over the recipe catalog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogFilter {
    /// Restrict to system recipes
    pub system_only: bool,
    /// Exact (case-insensitive) meal time
    pub meal_time: Option<String>,
    /// Constraint on the recipe's tools
    pub tools: AxisConstraint,
    /// Constraint on the recipe's ingredient names
    pub ingredients: AxisConstraint,
}

impl CatalogFilter {
    /// Filter matching every system recipe
    #[must_use]
    pub fn system() -> Self {
        Self {
            system_only: true,
            ..Self::default()
        }
    }

    /// Require an exact meal time
    ///
    /// Known meal times are stored in canonical form, so aliases such as
    /// `special-occasion` are canonicalized. Unknown values are folded with
    /// Unicode lowercasing and simply match nothing. Backends compare this
    /// value for equality against the stored canonical string and must not
    /// fold it again.
    #[must_use]
    pub fn with_meal_time(mut self, meal_time: Option<&str>) -> Self {
        self.meal_time = meal_time.map(|value| {
            MealTime::parse(value).map_or_else(|| value.trim().to_lowercase(), |known| {
                known.as_str().to_owned()
            })
        });
        self
    }

    /// Constrain the tools axis
    #[must_use]
    pub fn with_tools(mut self, constraint: AxisConstraint) -> Self {
        self.tools = constraint;
        self
    }

    /// Constrain the ingredients axis
    #[must_use]
    pub fn with_ingredients(mut self, constraint: AxisConstraint) -> Self {
        self.ingredients = constraint;
        self
    }

    /// Evaluate this filter against a single recipe
    ///
    /// Storage backends that cannot push a filter down use this to match
    /// recipes in memory.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if self.system_only && !recipe.is_system {
            return false;
        }
        if let Some(meal_time) = &self.meal_time {
            let recipe_meal_time = recipe.meal_time.map(|value| value.as_str());
            if recipe_meal_time != Some(meal_time.as_str()) {
                return false;
            }
        }
        self.tools.admits(recipe.tools.iter().map(String::as_str))
            && self.ingredients.admits(recipe.ingredient_names())
    }
}

/// Read access to the recipe catalog
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// Return every recipe matching `filter`, in the catalog's natural order
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying store cannot execute the query
    async fn find_recipes(&self, filter: &CatalogFilter) -> AppResult<Vec<Recipe>>;
}
