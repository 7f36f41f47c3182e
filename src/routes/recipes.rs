// ABOUTME: Recipe route handlers
// ABOUTME: Owner CRUD under /my-recipes plus public catalog, suggestion and filter endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

//! Recipe routes
//!
//! `/api/recipes/my-recipes` endpoints require a bearer token and only touch
//! the caller's recipes. Everything else is public and reads the system
//! catalog, except the detail route which serves any recipe.

use super::{authenticate, multipart_body, query_params, JsonBody};
use crate::constants::uploads::RECIPE_IMAGE_FIELD;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::recipes::{self, FilterRequest};
use crate::uploads::MultipartForm;
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::QueryRejection, Multipart, Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Query string of the suggestion endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SuggestQuery {
    /// Title prefix
    pub query: Option<String>,
}

/// Recipe routes
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipes", get(Self::handle_list_system))
            .route(
                "/api/recipes/my-recipes",
                post(Self::handle_create).get(Self::handle_list_mine),
            )
            .route(
                "/api/recipes/my-recipes/:id",
                put(Self::handle_update).delete(Self::handle_delete),
            )
            .route("/api/recipes/suggest/search", get(Self::handle_suggest))
            .route("/api/recipes/filter", post(Self::handle_filter))
            .route("/api/recipes/:id", get(Self::handle_get))
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let form = MultipartForm::parse(multipart_body(multipart)?, RECIPE_IMAGE_FIELD).await?;
        let recipe = recipes::create_recipe(&resources, auth.user_id, form).await?;
        Ok((StatusCode::CREATED, Json(recipe)).into_response())
    }

    async fn handle_list_mine(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let recipes = recipes::list_my_recipes(&resources, auth.user_id).await?;
        Ok(Json(recipes).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        headers: HeaderMap,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let form = MultipartForm::parse(multipart_body(multipart)?, RECIPE_IMAGE_FIELD).await?;
        let recipe = recipes::update_recipe(&resources, auth.user_id, &id, form).await?;
        Ok(Json(recipe).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let response = recipes::delete_recipe(&resources, auth.user_id, &id).await?;
        Ok(Json(response).into_response())
    }

    async fn handle_list_system(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let recipes = recipes::list_system_recipes(&resources).await?;
        Ok(Json(recipes).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe = recipes::get_recipe(&resources, &id).await?;
        Ok(Json(recipe).into_response())
    }

    async fn handle_suggest(
        State(resources): State<Arc<ServerResources>>,
        query: Result<Query<SuggestQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let SuggestQuery { query } = query_params(query)?;
        let suggestions = recipes::suggest_recipes(&resources, query.as_deref()).await?;
        Ok(Json(suggestions).into_response())
    }

    async fn handle_filter(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<FilterRequest>,
    ) -> Result<Response, AppError> {
        let recipes = recipes::filter_recipes(&resources, request).await?;
        Ok(Json(recipes).into_response())
    }
}
