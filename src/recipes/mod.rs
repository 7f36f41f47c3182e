// ABOUTME: Recipe search module with the catalog port and the tiered matcher
// ABOUTME: Storage-agnostic; the SQLite database implements the catalog port
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

/// Catalog query port and structured filters
pub mod catalog;
/// Tiered relaxation over tools and ingredients
pub mod matcher;

pub use catalog::{AxisConstraint, CatalogFilter, RecipeCatalog};
pub use matcher::{axis_tiers, count_matches, tier_plan, TierStep, TieredRecipeMatcher};
