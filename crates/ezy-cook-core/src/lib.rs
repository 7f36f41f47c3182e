// ABOUTME: Core types and constants for the Ezy Cook recipe platform
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

#![deny(unsafe_code)]

//! # Ezy Cook Core
//!
//! Foundation crate providing shared types and constants for the Ezy Cook
//! recipe platform. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Application-wide constants organized by domain
//! - **models**: Recipe, ingredient, meal-time, query, and user models

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Recipe, `MealTime`, `RecipeQuery`, User)
pub mod models;
