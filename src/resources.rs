// ABOUTME: Shared server resources handed to every route handler
// ABOUTME: Builds the database, auth manager, matcher, mailer and image store once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

use crate::auth::{generate_jwt_secret, AuthManager};
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::mailer::{mailer_from_config, OtpMailer};
use crate::recipes::{RecipeCatalog, TieredRecipeMatcher};
use crate::uploads::ImageStore;
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

/// Dependencies shared by all handlers
///
/// Created once at startup and wrapped in an `Arc`; nothing in here is
/// mutated after construction.
#[derive(Clone)]
pub struct ServerResources {
    /// SQLite persistence
    pub database: Arc<Database>,
    /// JWT issuance and validation
    pub auth: AuthManager,
    /// Tiered filter over the system recipe catalog
    pub matcher: TieredRecipeMatcher,
    /// Password-reset email delivery
    pub mailer: Arc<dyn OtpMailer>,
    /// Uploaded image storage
    pub images: ImageStore,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources around an already migrated database
    ///
    /// Without `JWT_SECRET` a random per-process secret is generated, so
    /// issued tokens do not survive a restart.
    ///
    /// # Errors
    ///
    /// Returns an error if a JWT secret has to be generated and the system
    /// RNG fails
    pub fn new(
        database: Database,
        mailer: Arc<dyn OtpMailer>,
        config: Arc<ServerConfig>,
    ) -> AppResult<Self> {
        let jwt_secret = match &config.auth.jwt_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                warn!("JWT_SECRET not set; using a random per-process secret");
                generate_jwt_secret()?.to_vec()
            }
        };

        let database = Arc::new(database);
        let catalog: Arc<dyn RecipeCatalog> = database.clone();

        Ok(Self {
            auth: AuthManager::new(jwt_secret, config.auth.jwt_expiry_hours),
            matcher: TieredRecipeMatcher::new(catalog),
            images: ImageStore::new(config.uploads.dir.clone()),
            database,
            mailer,
            config,
        })
    }

    /// Connect, migrate and assemble everything described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated, or the
    /// upload directory cannot be created
    pub async fn from_config(config: ServerConfig) -> anyhow::Result<Self> {
        let database = Database::new(&config.database_url)
            .await
            .with_context(|| format!("Failed to open database {}", config.database_url))?;
        database
            .migrate()
            .await
            .context("Failed to run database migrations")?;
        info!("Database ready");

        let mailer = mailer_from_config(&config.mail);
        let resources = Self::new(database, mailer, Arc::new(config))?;
        resources
            .images
            .ensure_dir()
            .await
            .context("Failed to prepare upload directory")?;

        Ok(resources)
    }
}
