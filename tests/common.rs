// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database, recording mailer, temporary upload dir and seeded users/recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `ezy_cook_server`

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use ezy_cook_server::{
    config::{AuthConfig, CorsConfig, Environment, MailConfig, ServerConfig, UploadConfig},
    database::Database,
    errors::AppResult,
    mailer::{OtpEmail, OtpMailer},
    models::Recipe,
    resources::ServerResources,
    routes::build_router,
    services::{
        recipes::{add_system_recipe, NewSystemRecipe},
        users::{signup, AuthResponse, SignupRequest},
    },
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Mailer that keeps every email in memory
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OtpEmail>>,
}

impl RecordingMailer {
    /// All emails sent so far
    pub fn sent(&self) -> Vec<OtpEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Code from the most recent email to `email`
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .find(|message| message.to == email)
            .and_then(|message| {
                message
                    .text
                    .split_whitespace()
                    .find(|word| word.trim_end_matches('.').chars().all(|c| c.is_ascii_digit()))
                    .map(|word| word.trim_end_matches('.').to_owned())
            })
    }
}

#[async_trait]
impl OtpMailer for RecordingMailer {
    async fn send(&self, email: &OtpEmail) -> AppResult<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Configuration suitable for tests: in-memory database, cheap bcrypt
pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        http_port: 5000,
        host: "127.0.0.1".to_owned(),
        environment: Environment::Testing,
        database_url: "sqlite::memory:".to_owned(),
        auth: AuthConfig {
            jwt_secret: Some("integration-test-secret".to_owned()),
            jwt_expiry_hours: 24,
            bcrypt_cost: 4,
        },
        uploads: UploadConfig { dir: upload_dir },
        mail: MailConfig::default(),
        cors: CorsConfig {
            allowed_origins: "*".to_owned(),
        },
        request_timeout_secs: 30,
    }
}

/// Everything a route test needs
pub struct TestContext {
    pub resources: Arc<ServerResources>,
    pub mailer: Arc<RecordingMailer>,
    upload_dir: TempDir,
}

impl TestContext {
    /// Fresh router over the shared resources
    pub fn router(&self) -> Router {
        build_router(self.resources.clone())
    }

    /// Directory uploaded images are written to
    pub fn upload_dir(&self) -> &Path {
        self.upload_dir.path()
    }

    /// Database handle
    pub fn database(&self) -> &Database {
        &self.resources.database
    }
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    database.migrate().await?;
    Ok(database)
}

/// Build resources over an in-memory database and a temporary upload dir
pub async fn create_test_context() -> Result<TestContext> {
    let upload_dir = tempfile::tempdir()?;
    let database = create_test_database().await?;
    let mailer = Arc::new(RecordingMailer::default());
    let config = Arc::new(test_config(upload_dir.path().to_path_buf()));

    let resources = ServerResources::new(database, mailer.clone(), config)?;
    resources.images.ensure_dir().await?;

    Ok(TestContext {
        resources: Arc::new(resources),
        mailer,
        upload_dir,
    })
}

/// Register a user through the signup service
pub async fn create_user(context: &TestContext, username: &str) -> Result<AuthResponse> {
    let request = SignupRequest {
        name: Some(format!("{username} Cook")),
        username: Some(username.to_owned()),
        email: Some(format!("{username}@example.com")),
        password: Some("password123".to_owned()),
    };
    Ok(signup(&context.resources, request).await?)
}

/// Insert a system recipe with the given selectors
pub async fn insert_system_recipe(
    database: &Database,
    title: &str,
    tools: &[&str],
    ingredients: &[&str],
    meal_time: Option<&str>,
) -> Result<Recipe> {
    let ingredients: Vec<_> = ingredients
        .iter()
        .map(|name| json!({ "name": name, "quantity": "1" }))
        .collect();
    let input = NewSystemRecipe {
        title: Some(title.to_owned()),
        description: Some(format!("How to make {title}")),
        ingredients: Some(json!(ingredients)),
        tools: Some(json!(tools)),
        meal_time: meal_time.map(str::to_owned),
        ..NewSystemRecipe::default()
    };
    Ok(add_system_recipe(database, input).await?)
}
