// ABOUTME: HTTP route assembly for the Ezy Cook API
// ABOUTME: Merges user and recipe routers, static uploads and the shared middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

//! Route modules
//!
//! Each domain exposes a `XRoutes::routes(resources)` router; [`build_router`]
//! merges them and applies the middleware stack used in production and tests.

/// Recipe CRUD, catalog, filter and suggestion routes
pub mod recipes;
/// Account, password reset and profile routes
pub mod users;

pub use recipes::RecipeRoutes;
pub use users::UserRoutes;

use crate::auth::AuthResult;
use crate::constants::{messages, uploads};
use crate::errors::{AppError, AppResult};
use crate::middleware::{make_request_span, request_id_layers, setup_cors};
use crate::resources::ServerResources;
use crate::services::MessageResponse;
use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, FromRequest, Multipart, Request,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let timeout = Duration::from_secs(resources.config.request_timeout_secs);
    let (set_request_id, propagate_request_id) = request_id_layers();
    let uploads_dir = ServeDir::new(resources.images.root());
    let cors = setup_cors(&resources.config);

    Router::new()
        .route("/", get(welcome))
        .merge(UserRoutes::routes(resources.clone()))
        .merge(RecipeRoutes::routes(resources))
        .nest_service(uploads::PUBLIC_PREFIX, uploads_dir)
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(uploads::MAX_REQUEST_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id)
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(propagate_request_id)
                .layer(cors)
                .layer(TimeoutLayer::new(timeout)),
        )
}

async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new(messages::WELCOME))
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route")
}

/// Resolve the bearer token of a request to the calling user
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<AuthResult> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    resources.auth.authenticate_request(auth_header)
}

/// JSON body extractor whose rejections use the API error format
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(request, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection: JsonRejection| AppError::invalid_input(rejection.body_text()))
    }
}

/// Map a multipart extraction failure to the API error format
pub(crate) fn multipart_body(
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> AppResult<Multipart> {
    multipart.map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}

/// Map a query-string extraction failure to the API error format
pub(crate) fn query_params<T>(query: Result<axum::extract::Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|axum::extract::Query(value)| value)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}
