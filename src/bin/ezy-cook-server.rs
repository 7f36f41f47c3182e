// ABOUTME: HTTP server binary for the Ezy Cook recipe API
// ABOUTME: Loads configuration, initializes logging and the database, then serves until Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

//! # Ezy Cook Server Binary
//!
//! Starts the REST API. Configuration comes from the environment; the port
//! and database URL can be overridden on the command line.

use anyhow::{Context, Result};
use clap::Parser;
use ezy_cook_server::{
    config::ServerConfig, logging, resources::ServerResources, routes::build_router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "ezy-cook-server")]
#[command(about = "Ezy Cook API - recipe sharing backend with tiered recipe matching")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    config.validate()?;

    logging::init_from_env()?;
    info!("{}", config.summary());

    let address = format!("{}:{}", config.host, config.http_port);
    let resources = Arc::new(ServerResources::from_config(config).await?);
    let app = build_router(resources);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Ezy Cook API listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
