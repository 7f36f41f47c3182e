// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: User accounts, password reset and recipe management over the shared resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

//! Domain service layer
//!
//! Handlers parse the HTTP request and hand typed input to these functions;
//! the seed binary calls the recipe service directly.

use serde::{Deserialize, Serialize};

/// Recipe CRUD, filtering, suggestions and system recipe ingestion
pub mod recipes;

/// Signup, login, password reset and profile management
pub mod users;

/// Plain `{message}` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

impl MessageResponse {
    /// Wrap `message`
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
