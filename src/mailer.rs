// ABOUTME: Password-reset OTP email delivery
// ABOUTME: Log-only mailer for development and an HTTP mail-API mailer for deployments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

use crate::config::MailConfig;
use crate::constants::{otp, service_names};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// A rendered OTP email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpEmail {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub text: String,
}

impl OtpEmail {
    /// Render the reset email for `code`
    #[must_use]
    pub fn new(to: &str, code: &str) -> Self {
        Self {
            to: to.to_owned(),
            subject: otp::EMAIL_SUBJECT.to_owned(),
            text: format!(
                "Your OTP code is {code}. It will expire in {} minutes.",
                otp::TTL_MINUTES
            ),
        }
    }
}

/// Delivers password-reset codes
#[async_trait]
pub trait OtpMailer: Send + Sync {
    /// Send `email`
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceError` when the mail provider rejects the message
    async fn send(&self, email: &OtpEmail) -> AppResult<()>;
}

/// Writes OTP emails to the log instead of sending them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl OtpMailer for LogMailer {
    async fn send(&self, email: &OtpEmail) -> AppResult<()> {
        info!(to = %email.to, subject = %email.subject, "OTP email (log only): {}", email.text);
        Ok(())
    }
}

#[derive(Serialize)]
struct MailApiRequest<'a> {
    from: &'a str,
    from_name: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Sends OTP emails through a JSON mail API
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    /// Create a mailer posting to `api_url`
    #[must_use]
    pub fn new(api_url: String, api_key: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl OtpMailer for HttpMailer {
    async fn send(&self, email: &OtpEmail) -> AppResult<()> {
        let payload = MailApiRequest {
            from: &self.from,
            from_name: service_names::DISPLAY_NAME,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
        };

        let mut request = self.client.post(&self.api_url).json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::external_service("mail", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, to = %email.to, "Mail API rejected OTP email");
            return Err(AppError::external_service(
                "mail",
                format!("provider returned {status}"),
            ));
        }

        info!(to = %email.to, "OTP email sent");
        Ok(())
    }
}

/// Pick the mailer for `config`
#[must_use]
pub fn mailer_from_config(config: &MailConfig) -> Arc<dyn OtpMailer> {
    match &config.api_url {
        Some(api_url) => Arc::new(HttpMailer::new(
            api_url.clone(),
            config.api_key.clone(),
            config.from.clone(),
        )),
        None => Arc::new(LogMailer),
    }
}
