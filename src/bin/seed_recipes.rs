// ABOUTME: System recipe seeding utility for the Ezy Cook server
// ABOUTME: Loads curated recipes from a JSON file and inserts those not already present
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

//! System recipe seeder.
//!
//! Reads a JSON array of recipes and inserts each one as a system recipe.
//! Recipes whose title already exists in the system catalog are skipped, so
//! the seeder can be run repeatedly.
//!
//! Usage:
//! ```bash
//! # Seed from the bundled catalog (uses DATABASE_URL from environment)
//! cargo run --bin seed-recipes
//!
//! # Custom file and database
//! cargo run --bin seed-recipes -- --file my_recipes.json --database-url sqlite:./data/dev.db
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use ezy_cook_server::config::environment::DEFAULT_DATABASE_URL;
use ezy_cook_server::database::Database;
use ezy_cook_server::logging::LoggingConfig;
use ezy_cook_server::services::recipes::{seed_system_recipes, NewSystemRecipe};
use std::env;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-recipes",
    about = "Ezy Cook system recipe seeder",
    long_about = "Insert the curated system recipes searched by the filter and suggestion endpoints"
)]
struct SeedArgs {
    /// JSON file with an array of recipes
    #[arg(long, default_value = "data/system_recipes.json")]
    file: PathBuf,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let mut logging = LoggingConfig::from_env();
    if args.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let recipes: Vec<NewSystemRecipe> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of recipes", args.file.display()))?;
    info!("Loaded {} recipes from {}", recipes.len(), args.file.display());

    let database = Database::new(&database_url)
        .await
        .with_context(|| format!("Failed to open database {database_url}"))?;
    database.migrate().await?;

    let report = seed_system_recipes(&database, recipes).await?;
    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "System recipes seeded"
    );
    println!(
        "Seeded {} system recipes ({} already present)",
        report.inserted, report.skipped
    );

    Ok(())
}
