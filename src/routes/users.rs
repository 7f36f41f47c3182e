// ABOUTME: User account route handlers
// ABOUTME: Signup, login, OTP password reset and authenticated profile endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

use super::{authenticate, multipart_body, JsonBody};
use crate::constants::uploads::PROFILE_IMAGE_FIELD;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::users::{
    self, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest,
};
use crate::uploads::MultipartForm;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;

/// User routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users/signup", post(Self::handle_signup))
            .route("/api/users/login", post(Self::handle_login))
            .route("/api/users/forgot-password", post(Self::handle_forgot_password))
            .route("/api/users/verify-otp", post(Self::handle_reset_password))
            .route("/api/users/reset-password", put(Self::handle_reset_password))
            .route(
                "/api/users/profile",
                get(Self::handle_get_profile).put(Self::handle_update_profile),
            )
            .with_state(resources)
    }

    async fn handle_signup(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<SignupRequest>,
    ) -> Result<Response, AppError> {
        let response = users::signup(&resources, request).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<LoginRequest>,
    ) -> Result<Response, AppError> {
        let response = users::login(&resources, request).await?;
        Ok(Json(response).into_response())
    }

    async fn handle_forgot_password(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<ForgotPasswordRequest>,
    ) -> Result<Response, AppError> {
        let response = users::forgot_password(&resources, request).await?;
        Ok(Json(response).into_response())
    }

    async fn handle_reset_password(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<ResetPasswordRequest>,
    ) -> Result<Response, AppError> {
        let response = users::reset_password(&resources, request).await?;
        Ok(Json(response).into_response())
    }

    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let response = users::get_profile(&resources, auth.user_id).await?;
        Ok(Json(response).into_response())
    }

    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let form = MultipartForm::parse(multipart_body(multipart)?, PROFILE_IMAGE_FIELD).await?;
        let response = users::update_profile(&resources, auth.user_id, form).await?;
        Ok(Json(response).into_response())
    }
}
