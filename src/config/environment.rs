// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, database URL, auth, upload, mail and CORS settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

//! Environment-based configuration management for production deployment

use crate::constants::{auth, network, uploads};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Default SQLite database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/ezy_cook.db";

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Token and password hashing settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret; a random per-process secret is used when absent
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Bcrypt work factor
    pub bcrypt_cost: u32,
}

/// Image upload settings
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory where uploaded images are stored
    pub dir: PathBuf,
}

/// Outgoing mail settings for OTP delivery
#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    /// HTTP mail API endpoint; OTP emails are only logged when absent
    pub api_url: Option<String>,
    /// Bearer key for the mail API
    pub api_key: Option<String>,
    /// Sender address
    pub from: String,
}

/// CORS settings
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated allowed origins, or `*`
    pub allowed_origins: String,
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// sqlx SQLite connection URL
    pub database_url: String,
    /// Token and password hashing settings
    pub auth: AuthConfig,
    /// Image upload settings
    pub uploads: UploadConfig,
    /// OTP mail delivery settings
    pub mail: MailConfig,
    /// CORS settings
    pub cors: CorsConfig,
    /// Overall per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed or the
    /// resulting configuration fails [`Self::validate`]
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let http_port = match env::var("PORT").or_else(|_| env::var("HTTP_PORT")) {
            Ok(value) => value
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {value}"))?,
            Err(_) => network::DEFAULT_HTTP_PORT,
        };

        let config = Self {
            http_port,
            host: env_var_or("HOST", network::DEFAULT_HOST),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            auth: AuthConfig {
                jwt_secret: optional_env_var("JWT_SECRET"),
                jwt_expiry_hours: parse_env_var("JWT_EXPIRY_HOURS", auth::DEFAULT_JWT_EXPIRY_HOURS)?,
                bcrypt_cost: parse_env_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            },
            uploads: UploadConfig {
                dir: PathBuf::from(env_var_or("UPLOAD_DIR", uploads::DEFAULT_UPLOAD_DIR)),
            },
            mail: MailConfig {
                api_url: optional_env_var("MAIL_API_URL"),
                api_key: optional_env_var("MAIL_API_KEY"),
                from: env_var_or("MAIL_FROM", "no-reply@ezycook.local"),
            },
            cors: CorsConfig {
                allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
            },
            request_timeout_secs: parse_env_var(
                "REQUEST_TIMEOUT_SECS",
                network::DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for a zero port or timeout, a bcrypt cost outside
    /// 4..=31, a non-positive token lifetime, or a missing `JWT_SECRET` in
    /// production
    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow::anyhow!("HTTP port cannot be 0"));
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(anyhow::anyhow!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            ));
        }

        if self.auth.jwt_expiry_hours <= 0 {
            return Err(anyhow::anyhow!("JWT_EXPIRY_HOURS must be positive"));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be positive"));
        }

        if self.auth.jwt_secret.is_none() {
            if self.environment.is_production() {
                return Err(anyhow::anyhow!("JWT_SECRET is required in production"));
            }
            warn!("JWT_SECRET not set; tokens will not survive a restart");
        }

        if self.mail.api_url.is_none() {
            warn!("MAIL_API_URL not set; OTP emails will only be logged");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Ezy Cook Server Configuration:\n\
             - Environment: {}\n\
             - Listen: {}:{}\n\
             - Database: {}\n\
             - JWT Secret: {}\n\
             - Token Expiry: {}h\n\
             - Upload Dir: {}\n\
             - Mail Delivery: {}\n\
             - CORS Origins: {}\n\
             - Request Timeout: {}s",
            self.environment,
            self.host,
            self.http_port,
            self.database_url,
            if self.auth.jwt_secret.is_some() {
                "Configured"
            } else {
                "Ephemeral"
            },
            self.auth.jwt_expiry_hours,
            self.uploads.dir.display(),
            if self.mail.api_url.is_some() {
                "HTTP API"
            } else {
                "Log only"
            },
            self.cors.allowed_origins,
            self.request_timeout_secs
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get a non-empty environment variable
fn optional_env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {value}")),
        Err(_) => Ok(default),
    }
}
