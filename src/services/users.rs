// ABOUTME: User account business logic: signup, login, OTP password reset and profiles
// ABOUTME: Hashes passwords with bcrypt, issues JWTs and mails reset codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

use super::MessageResponse;
use crate::auth::{hash_password, verify_password};
use crate::constants::{auth::MIN_PASSWORD_LENGTH, messages, otp};
use crate::database::OtpRecord;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::logging::AppLogger;
use crate::mailer::OtpEmail;
use crate::models::User;
use crate::resources::ServerResources;
use crate::uploads::MultipartForm;
use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

/// Signup body
#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    /// Display name
    pub name: Option<String>,
    /// Unique username
    pub username: Option<String>,
    /// Unique email
    pub email: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

/// Login body
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    /// Username
    pub username: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

/// Forgot-password body
#[derive(Debug, Default, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Account email
    pub email: Option<String>,
}

/// Reset-password body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Account email
    pub email: Option<String>,
    /// Emailed code, as a string or a number
    pub otp: Option<Value>,
    /// Replacement password
    pub new_password: Option<String>,
}

/// Returned by signup and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// User ID
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Username
    pub username: String,
    /// Email
    pub email: String,
    /// Bearer token
    pub token: String,
}

/// Returned by the profile read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// Outcome message
    pub message: String,
    /// Profile without the password hash
    pub user: User,
}

/// Returned by the profile update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateResponse {
    /// Outcome message
    pub message: String,
    /// Updated profile
    pub user: User,
    /// Names of the fields that were written
    pub changes: Vec<String>,
}

/// Register a new account and issue a token
///
/// # Errors
///
/// - `MissingRequiredField` when username, email or password is blank
/// - `InvalidInput` for a malformed email or short password
/// - `ResourceAlreadyExists` when the username or email is taken
pub async fn signup(resources: &ServerResources, request: SignupRequest) -> AppResult<AuthResponse> {
    let (Some(username), Some(email), Some(password)) = (
        required(request.username.as_deref()),
        required(request.email.as_deref()),
        request.password.filter(|password| !password.is_empty()),
    ) else {
        return Err(AppError::missing_field(messages::SIGNUP_FIELDS_REQUIRED));
    };

    if !is_valid_email(email) {
        return Err(AppError::invalid_input(messages::INVALID_EMAIL));
    }
    check_password_length(&password)?;

    if resources.database.user_exists(username, email).await? {
        AppLogger::log_auth_event(username, "signup", false, Some("username or email taken"));
        return Err(AppError::already_exists(messages::USER_ALREADY_EXISTS));
    }

    let password_hash = hash_password(password, resources.config.auth.bcrypt_cost).await?;
    let name = request.name.map(|name| name.trim().to_owned()).unwrap_or_default();
    let user = User::new(name, username.to_owned(), email.to_owned(), password_hash);

    resources
        .database
        .create_user(&user)
        .await
        .map_err(conflict_message)?;

    let token = resources.auth.generate_token(&user)?;
    AppLogger::log_auth_event(&user.username, "signup", true, None);

    Ok(AuthResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        token,
    })
}

/// Check credentials and issue a token
///
/// # Errors
///
/// Returns `AuthInvalid` for unknown users, wrong passwords and blank input
pub async fn login(resources: &ServerResources, request: LoginRequest) -> AppResult<AuthResponse> {
    let username = required(request.username.as_deref()).unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let user = resources.database.get_user_by_username(username).await?;
    let verified = match &user {
        Some(user) => verify_password(password, user.password_hash.clone()).await?,
        None => false,
    };
    let Some(user) = user.filter(|_| verified) else {
        AppLogger::log_auth_event(username, "login", false, Some("invalid credentials"));
        return Err(AppError::auth_invalid(messages::INVALID_CREDENTIALS));
    };

    let token = resources.auth.generate_token(&user)?;
    AppLogger::log_auth_event(&user.username, "login", true, None);

    Ok(AuthResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        token,
    })
}

/// Issue a 4-digit reset code, replacing older codes, and mail it
///
/// # Errors
///
/// - `ResourceNotFound` when no account uses the email
/// - `ExternalServiceError` when the mailer fails
pub async fn forgot_password(
    resources: &ServerResources,
    request: ForgotPasswordRequest,
) -> AppResult<MessageResponse> {
    let email = required(request.email.as_deref()).unwrap_or_default();
    let user = resources
        .database
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let code = rand::thread_rng()
        .gen_range(otp::CODE_MIN..=otp::CODE_MAX)
        .to_string();
    let record = OtpRecord {
        email: user.email.clone(),
        code,
        expires_at: Utc::now() + Duration::minutes(otp::TTL_MINUTES),
    };
    resources.database.replace_otp(&record).await?;

    resources
        .mailer
        .send(&OtpEmail::new(&record.email, &record.code))
        .await?;

    AppLogger::log_auth_event(&user.username, "otp_issued", true, None);
    Ok(MessageResponse::new(messages::OTP_SENT))
}

/// Replace the password of the account owning a live reset code
///
/// All codes for the email are consumed on success.
///
/// # Errors
///
/// - `MissingRequiredField` when email, code or new password is blank
/// - `InvalidInput` for wrong or expired codes and short passwords
/// - `ResourceNotFound` when the account no longer exists
pub async fn reset_password(
    resources: &ServerResources,
    request: ResetPasswordRequest,
) -> AppResult<MessageResponse> {
    let code = request.otp.as_ref().and_then(otp_code_text);
    let (Some(email), Some(code), Some(new_password)) = (
        required(request.email.as_deref()),
        code,
        request.new_password.filter(|password| !password.is_empty()),
    ) else {
        return Err(AppError::missing_field(
            "Email, OTP and new password are required",
        ));
    };
    check_password_length(&new_password)?;

    let record = resources
        .database
        .find_otp(email, &code)
        .await?
        .ok_or_else(|| {
            AppLogger::log_security_event("invalid_otp", "Reset attempted with a wrong code", None);
            AppError::invalid_input(messages::INVALID_OTP)
        })?;

    if record.is_expired_at(Utc::now()) {
        resources.database.delete_otps(email).await?;
        return Err(AppError::invalid_input(messages::OTP_EXPIRED));
    }

    let user = resources
        .database
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let password_hash = hash_password(new_password, resources.config.auth.bcrypt_cost).await?;
    if !resources
        .database
        .update_user_password(user.id, &password_hash)
        .await?
    {
        return Err(AppError::not_found("User"));
    }
    let consumed = resources.database.delete_otps(email).await?;

    info!(user_id = %user.id, consumed, "Password reset");
    AppLogger::log_auth_event(&user.username, "password_reset", true, None);
    Ok(MessageResponse::new(messages::PASSWORD_RESET))
}

/// Read the caller's profile
///
/// # Errors
///
/// Returns `ResourceNotFound` when the account was deleted after the token
/// was issued
pub async fn get_profile(resources: &ServerResources, user_id: Uuid) -> AppResult<ProfileResponse> {
    let user = resources
        .database
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(ProfileResponse {
        message: messages::PROFILE_FETCHED.to_owned(),
        user,
    })
}

/// Update the caller's profile from a multipart form
///
/// Text fields are written only when present and non-empty. A new
/// `profileImage` replaces the stored one and the old file is deleted.
///
/// # Errors
///
/// - `ResourceNotFound` when the account no longer exists
/// - `InvalidInput` for a malformed email
/// - `ResourceAlreadyExists` when the new username or email is taken
/// - `StorageError` when the image cannot be written
pub async fn update_profile(
    resources: &ServerResources,
    user_id: Uuid,
    mut form: MultipartForm,
) -> AppResult<ProfileUpdateResponse> {
    let mut user = resources
        .database
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    let mut changes = Vec::new();

    if let Some(name) = form.non_empty("name") {
        name.trim().clone_into(&mut user.name);
        changes.push("name".to_owned());
    }
    if let Some(username) = form.non_empty("username") {
        username.trim().clone_into(&mut user.username);
        changes.push("username".to_owned());
    }
    if let Some(email) = form.non_empty("email") {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AppError::invalid_input(messages::INVALID_EMAIL));
        }
        email.clone_into(&mut user.email);
        changes.push("email".to_owned());
    }
    if let Some(phone_number) = form.non_empty("phoneNumber") {
        phone_number.trim().clone_into(&mut user.phone_number);
        changes.push("phoneNumber".to_owned());
    }

    let previous_image = user.profile_image.clone();
    let stored_image = match form.take_image() {
        Some(image) => {
            let path = resources.images.save(&image).await?;
            user.profile_image.clone_from(&path);
            changes.push("profileImage".to_owned());
            Some(path)
        }
        None => None,
    };

    user.updated_at = Utc::now();
    if let Err(error) = resources.database.update_user_profile(&user).await {
        if let Some(path) = &stored_image {
            resources.images.remove(path).await;
        }
        return Err(conflict_message(error));
    }

    if stored_image.is_some() && !previous_image.is_empty() {
        resources.images.remove(&previous_image).await;
    }

    info!(user_id = %user.id, ?changes, "Profile updated");
    Ok(ProfileUpdateResponse {
        message: messages::PROFILE_UPDATED.to_owned(),
        user,
        changes,
    })
}

/// Trimmed value when present and not blank
fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn check_password_length(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::invalid_input(messages::PASSWORD_TOO_SHORT));
    }
    Ok(())
}

fn conflict_message(error: AppError) -> AppError {
    if error.code == ErrorCode::ResourceAlreadyExists {
        AppError::already_exists(messages::USER_ALREADY_EXISTS)
    } else {
        error
    }
}

fn otp_code_text(value: &Value) -> Option<String> {
    match value {
        Value::String(code) => required(Some(code.as_str())).map(str::to_owned),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

/// Loose address check: one `@`, a non-empty local part and a dotted domain
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
