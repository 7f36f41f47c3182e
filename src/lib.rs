// ABOUTME: Main library entry point for the Ezy Cook recipe API
// ABOUTME: User accounts, recipe CRUD, image uploads and tiered recipe matching over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

#![deny(unsafe_code)]

//! # Ezy Cook Server
//!
//! Backend of a recipe-sharing application. Users sign up, reset passwords
//! through emailed one-time codes and manage their own recipes. A curated
//! catalog of system recipes is searchable by title prefix and by a tiered
//! filter that relaxes tool and ingredient matching until something matches.
//!
//! ## Architecture
//!
//! - **recipes**: catalog port and the tiered matcher (storage-agnostic)
//! - **database**: SQLite persistence, implements the catalog port
//! - **services**: business logic shared by routes and the seed binary
//! - **routes**: axum routers and middleware assembly
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ezy_cook_server::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Ezy Cook configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT authentication and password hashing
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Application constants
pub mod constants;

/// SQLite persistence for users, reset codes and recipes
pub mod database;

/// Unified error types
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Password-reset email delivery
pub mod mailer;

/// CORS and request tracing middleware
pub mod middleware;

/// Domain models
pub mod models;

/// Catalog port and tiered recipe matcher
pub mod recipes;

/// Shared handler dependencies
pub mod resources;

/// HTTP routes
pub mod routes;

/// Business logic
pub mod services;

/// Multipart parsing and image storage
pub mod uploads;
