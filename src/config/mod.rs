// ABOUTME: Configuration module for centralized server settings
// ABOUTME: Exposes the environment-driven ServerConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AuthConfig, CorsConfig, Environment, MailConfig, ServerConfig, UploadConfig,
};
