// ABOUTME: Re-exports the unified error types from the core crate
// ABOUTME: Lets server modules import errors from `crate::errors`
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

//! # Unified Error Handling System
//!
//! Error codes, the application error type and the JSON error body live in
//! `ezy-cook-core` so that every crate of the workspace shares them.

pub use ezy_cook_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse};
