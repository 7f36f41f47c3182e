// ABOUTME: Tests for loading server configuration from environment variables
// ABOUTME: Defaults, overrides, parse failures and production secret requirements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use ezy_cook_server::config::{Environment, ServerConfig};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const CONFIG_VARS: &[&str] = &[
    "PORT",
    "HTTP_PORT",
    "HOST",
    "ENVIRONMENT",
    "DATABASE_URL",
    "JWT_SECRET",
    "JWT_EXPIRY_HOURS",
    "BCRYPT_COST",
    "UPLOAD_DIR",
    "MAIL_API_URL",
    "MAIL_API_KEY",
    "MAIL_FROM",
    "CORS_ALLOWED_ORIGINS",
    "REQUEST_TIMEOUT_SECS",
];

fn clear_config_env() {
    for key in CONFIG_VARS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_config_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 5000);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.environment, Environment::Development);
    assert!(config.auth.jwt_secret.is_none());
    assert_eq!(config.auth.jwt_expiry_hours, 24 * 30);
    assert_eq!(config.uploads.dir, PathBuf::from("uploads"));
    assert!(config.mail.api_url.is_none());
    assert_eq!(config.cors.allowed_origins, "*");
    assert_eq!(config.request_timeout_secs, 30);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_config_env();
    env::set_var("PORT", "8080");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("JWT_SECRET", "  from-env  ");
    env::set_var("BCRYPT_COST", "6");
    env::set_var("UPLOAD_DIR", "/var/lib/ezy-cook/uploads");
    env::set_var("MAIL_API_URL", "https://mail.example.com/send");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8080);
    assert!(config.environment.is_production());
    assert_eq!(config.auth.jwt_secret.as_deref(), Some("from-env"));
    assert_eq!(config.auth.bcrypt_cost, 6);
    assert_eq!(config.uploads.dir, PathBuf::from("/var/lib/ezy-cook/uploads"));
    assert_eq!(
        config.mail.api_url.as_deref(),
        Some("https://mail.example.com/send")
    );

    clear_config_env();
}

#[test]
#[serial]
fn test_http_port_alias() {
    clear_config_env();
    env::set_var("HTTP_PORT", "9090");

    assert_eq!(ServerConfig::from_env().unwrap().http_port, 9090);

    env::set_var("PORT", "7070");
    assert_eq!(ServerConfig::from_env().unwrap().http_port, 7070);

    clear_config_env();
}

#[test]
#[serial]
fn test_unparseable_values_are_errors() {
    clear_config_env();
    env::set_var("PORT", "not-a-port");
    let error = ServerConfig::from_env().unwrap_err();
    assert!(error.to_string().contains("Invalid PORT value"));

    clear_config_env();
    env::set_var("REQUEST_TIMEOUT_SECS", "soon");
    let error = ServerConfig::from_env().unwrap_err();
    assert!(error.to_string().contains("REQUEST_TIMEOUT_SECS"));

    clear_config_env();
}

#[test]
#[serial]
fn test_production_without_secret_is_rejected() {
    clear_config_env();
    env::set_var("ENVIRONMENT", "prod");
    env::set_var("JWT_SECRET", "   ");

    let error = ServerConfig::from_env().unwrap_err();
    assert!(error.to_string().contains("JWT_SECRET is required"));

    clear_config_env();
}
