// ABOUTME: Tiered recipe matcher that relaxes tool and ingredient strictness step by step
// ABOUTME: Returns the first non-empty result set from the system-recipe catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

//! # Tiered Recipe Matcher
//!
//! Each selector axis (tools, ingredients) gets a descending list of
//! required-match counts: all selected values, then at least two, then at
//! least one. The matcher walks tool tiers in the outer loop and ingredient
//! tiers in the inner loop, querying the catalog once per pair, and stops at
//! the first pair that yields any recipe.
//!
//! The meal time is a hard filter on every tier and only system recipes are
//! ever searched.

use super::catalog::{AxisConstraint, CatalogFilter, RecipeCatalog};
use crate::constants::recipes::PARTIAL_MATCH_TIERS;
use crate::errors::AppResult;
use crate::models::{Recipe, RecipeQuery};
use std::sync::Arc;
use tracing::debug;

/// Required-match counts for an axis with `selected_len` values, strictest first
///
/// An empty axis has no tiers. Tiers above the selection size and repeats are
/// skipped, so the result is strictly decreasing.
#[must_use]
pub fn axis_tiers(selected_len: usize) -> Vec<usize> {
    let mut tiers = Vec::with_capacity(1 + PARTIAL_MATCH_TIERS.len());
    for tier in std::iter::once(selected_len).chain(PARTIAL_MATCH_TIERS) {
        if (1..=selected_len).contains(&tier) && !tiers.contains(&tier) {
            tiers.push(tier);
        }
    }
    tiers
}

/// One `(tool tier, ingredient tier)` pair of the relaxation loop
///
/// `None` marks an axis without selectors, which is never constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierStep {
    /// Required number of matching tools
    pub tools: Option<usize>,
    /// Required number of matching ingredient names
    pub ingredients: Option<usize>,
}

/// Every tier pair tried for `query`, in the order the matcher tries them
#[must_use]
pub fn tier_plan(query: &RecipeQuery) -> Vec<TierStep> {
    let tool_tiers = optional_tiers(query.tools.len());
    let ingredient_tiers = optional_tiers(query.ingredients.len());

    tool_tiers
        .iter()
        .flat_map(|&tools| {
            ingredient_tiers
                .iter()
                .map(move |&ingredients| TierStep { tools, ingredients })
        })
        .collect()
}

fn optional_tiers(selected_len: usize) -> Vec<Option<usize>> {
    let tiers = axis_tiers(selected_len);
    if tiers.is_empty() {
        vec![None]
    } else {
        tiers.into_iter().map(Some).collect()
    }
}

/// Count candidates that case-insensitively equal one of the selected values
///
/// `selected` is expected to be lowercased already, as produced by
/// [`RecipeQuery::new`].
pub fn count_matches<'a, I>(candidates: I, selected: &[String]) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .filter(|candidate| {
            let candidate = candidate.to_lowercase();
            selected.iter().any(|value| *value == candidate)
        })
        .count()
}

/// Finds the most specific non-empty set of system recipes for a query
#[derive(Clone)]
pub struct TieredRecipeMatcher {
    catalog: Arc<dyn RecipeCatalog>,
}

impl TieredRecipeMatcher {
    /// Create a matcher over `catalog`
    #[must_use]
    pub fn new(catalog: Arc<dyn RecipeCatalog>) -> Self {
        Self { catalog }
    }

    /// Run the relaxation loop for `query`
    ///
    /// Returns the recipes of the first non-empty tier in catalog order, or an
    /// empty list when no tier matches.
    ///
    /// # Errors
    ///
    /// Propagates the first catalog failure; no partial results are returned.
    pub async fn find_matches(&self, query: &RecipeQuery) -> AppResult<Vec<Recipe>> {
        for step in tier_plan(query) {
            let filter = Self::filter_for(query, step);
            let candidates = self.catalog.find_recipes(&filter).await?;
            let candidate_count = candidates.len();

            let matched: Vec<Recipe> = candidates
                .into_iter()
                .filter(|recipe| Self::meets_partial_tiers(query, step, recipe))
                .collect();

            debug!(
                tool_tier = ?step.tools,
                ingredient_tier = ?step.ingredients,
                candidates = candidate_count,
                matched = matched.len(),
                "Recipe match tier evaluated"
            );

            if !matched.is_empty() {
                return Ok(matched);
            }
        }

        Ok(Vec::new())
    }

    fn filter_for(query: &RecipeQuery, step: TierStep) -> CatalogFilter {
        CatalogFilter::system()
            .with_meal_time(query.meal_time.as_deref())
            .with_tools(AxisConstraint::for_tier(&query.tools, step.tools))
            .with_ingredients(AxisConstraint::for_tier(
                &query.ingredients,
                step.ingredients,
            ))
    }

    // The catalog only checks "any of" on partial tiers; the count is enforced here
    fn meets_partial_tiers(query: &RecipeQuery, step: TierStep, recipe: &Recipe) -> bool {
        let tools_ok = match step.tools {
            Some(tier) if tier < query.tools.len() => {
                count_matches(recipe.tools.iter().map(String::as_str), &query.tools) >= tier
            }
            _ => true,
        };
        let ingredients_ok = match step.ingredients {
            Some(tier) if tier < query.ingredients.len() => {
                count_matches(recipe.ingredient_names(), &query.ingredients) >= tier
            }
            _ => true,
        };
        tools_ok && ingredients_ok
    }
}
