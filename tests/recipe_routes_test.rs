// ABOUTME: HTTP tests for the recipe routes
// ABOUTME: Owner CRUD with multipart uploads, public catalog reads, suggestions and the filter endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_test_context, create_user, insert_system_recipe, TestContext};
use helpers::axum_test::{AxumTestRequest, MultipartBody};
use serde_json::{json, Value};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

fn recipe_form() -> MultipartBody {
    MultipartBody::new()
        .text("title", "\"Garlic Bread\"")
        .text("description", "Butter, garlic, bake")
        .text(
            "ingredients",
            r#"[{"name":"bread","quantity":"1 loaf"},{"name":"garlic","quantity":"3 cloves"}]"#,
        )
        .text("tools", r#"["oven","knife"]"#)
        .text("mealTime", "Evening")
        .text("servings", "4")
}

async fn create_recipe(context: &TestContext, token: &str, form: MultipartBody) -> Value {
    AxumTestRequest::post("/api/recipes/my-recipes")
        .bearer(token)
        .multipart(form)
        .send(context.router())
        .await
        .assert_status(StatusCode::CREATED)
        .json()
}

#[tokio::test]
async fn test_welcome_route() {
    let context = create_test_context().await.unwrap();
    let body: Value = AxumTestRequest::get("/")
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["message"], "Welcome to the Ezy Cook API!");
}

#[tokio::test]
async fn test_create_recipe_with_image() {
    let context = create_test_context().await.unwrap();
    let user = create_user(&context, "alice").await.unwrap();

    let form = recipe_form().file("image", "bread.PNG", "image/png", PNG_BYTES);
    let recipe = create_recipe(&context, &user.token, form).await;

    assert_eq!(recipe["title"], "Garlic Bread");
    assert_eq!(recipe["mealTime"], "evening");
    assert_eq!(recipe["servings"], 4);
    assert_eq!(recipe["tools"], json!(["oven", "knife"]));
    assert_eq!(recipe["isSystem"], false);
    assert_eq!(recipe["createdBy"], user.id.to_string());
    assert_eq!(recipe["author"]["username"], "alice");

    let image = recipe["image"].as_str().unwrap();
    assert!(image.starts_with("/uploads/image-"), "unexpected path {image}");
    assert!(image.ends_with(".png"));

    let served = AxumTestRequest::get(image)
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .bytes();
    assert_eq!(served, PNG_BYTES);
}

#[tokio::test]
async fn test_create_recipe_requires_fields_and_valid_json() {
    let context = create_test_context().await.unwrap();
    let user = create_user(&context, "alice").await.unwrap();
    let router = context.router();

    let body: Value = AxumTestRequest::post("/api/recipes/my-recipes")
        .bearer(&user.token)
        .multipart(MultipartBody::new().text("title", "Soup"))
        .send(router.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(
        body["message"],
        "Title, description, and ingredients are required"
    );

    let body: Value = AxumTestRequest::post("/api/recipes/my-recipes")
        .bearer(&user.token)
        .multipart(
            MultipartBody::new()
                .text("title", "Soup")
                .text("description", "Boil")
                .text("ingredients", "water, salt"),
        )
        .send(router)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["message"], "Ingredients must be a valid JSON array");
}

#[tokio::test]
async fn test_create_recipe_rejects_bad_uploads() {
    let context = create_test_context().await.unwrap();
    let user = create_user(&context, "alice").await.unwrap();
    let router = context.router();

    let body: Value = AxumTestRequest::post("/api/recipes/my-recipes")
        .bearer(&user.token)
        .multipart(recipe_form().file("image", "notes.gif", "image/gif", b"GIF89a"))
        .send(router.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["message"], "Images only! Allowed types: jpg, jpeg, png");

    let body: Value = AxumTestRequest::post("/api/recipes/my-recipes")
        .bearer(&user.token)
        .multipart(recipe_form().file("cover", "bread.png", "image/png", PNG_BYTES))
        .send(router.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["message"], "Unexpected file field.");

    let oversized = vec![0_u8; 5 * 1024 * 1024 + 1];
    let body: Value = AxumTestRequest::post("/api/recipes/my-recipes")
        .bearer(&user.token)
        .multipart(recipe_form().file("image", "huge.jpg", "image/jpeg", &oversized))
        .send(router)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["message"], "File too large. Maximum size is 5MB.");

    let mine = context
        .database()
        .list_recipes_by_owner(user.id)
        .await
        .unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn test_my_recipes_require_token() {
    let context = create_test_context().await.unwrap();

    let body: Value = AxumTestRequest::get("/api/recipes/my-recipes")
        .send(context.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["message"], "Not authorized, no token");

    let body: Value = AxumTestRequest::get("/api/recipes/my-recipes")
        .bearer("not-a-jwt")
        .send(context.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["message"], "Not authorized, token failed");
}

#[tokio::test]
async fn test_list_my_recipes_only_returns_callers_recipes() {
    let context = create_test_context().await.unwrap();
    let alice = create_user(&context, "alice").await.unwrap();
    let bob = create_user(&context, "bob").await.unwrap();
    insert_system_recipe(context.database(), "System Soup", &["pot"], &["water"], None)
        .await
        .unwrap();

    create_recipe(&context, &alice.token, recipe_form()).await;
    create_recipe(&context, &bob.token, recipe_form().text("title", "Bob's Bread")).await;

    let mine: Vec<Value> = AxumTestRequest::get("/api/recipes/my-recipes")
        .bearer(&alice.token)
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["createdBy"], alice.id.to_string());
}

#[tokio::test]
async fn test_update_recipe_applies_provided_fields() {
    let context = create_test_context().await.unwrap();
    let user = create_user(&context, "alice").await.unwrap();
    let created = create_recipe(
        &context,
        &user.token,
        recipe_form().file("image", "old.png", "image/png", PNG_BYTES),
    )
    .await;
    let id = created["_id"].as_str().unwrap();
    let old_image = created["image"].as_str().unwrap().to_owned();

    let updated: Value = AxumTestRequest::put(&format!("/api/recipes/my-recipes/{id}"))
        .bearer(&user.token)
        .multipart(
            MultipartBody::new()
                .text("title", "  'Cheesy Garlic Bread' ")
                .text("servings", "zero")
                .text("tools", r#"["oven"]"#)
                .file("image", "new.jpg", "image/jpeg", b"jpeg-bytes"),
        )
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(updated["title"], "Cheesy Garlic Bread");
    assert_eq!(updated["description"], "Butter, garlic, bake");
    assert_eq!(updated["servings"], 4);
    assert_eq!(updated["tools"], json!(["oven"]));
    assert_eq!(updated["ingredients"].as_array().unwrap().len(), 2);

    let new_image = updated["image"].as_str().unwrap();
    assert_ne!(new_image, old_image);
    assert!(new_image.ends_with(".jpg"));

    let old_file = old_image.trim_start_matches("/uploads/");
    assert!(!context.upload_dir().join(old_file).exists());
}

#[tokio::test]
async fn test_failed_update_removes_new_image() {
    let context = create_test_context().await.unwrap();
    let user = create_user(&context, "alice").await.unwrap();
    let created = create_recipe(&context, &user.token, recipe_form()).await;
    let id = created["_id"].as_str().unwrap();

    sqlx::query(
        "CREATE TRIGGER recipes_read_only BEFORE UPDATE ON recipes \
         BEGIN SELECT RAISE(FAIL, 'recipes are read-only'); END",
    )
    .execute(context.database().pool())
    .await
    .unwrap();

    AxumTestRequest::put(&format!("/api/recipes/my-recipes/{id}"))
        .bearer(&user.token)
        .multipart(MultipartBody::new().file("image", "new.png", "image/png", PNG_BYTES))
        .send(context.router())
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let stored = std::fs::read_dir(context.upload_dir()).unwrap().count();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_update_and_delete_enforce_ownership() {
    let context = create_test_context().await.unwrap();
    let alice = create_user(&context, "alice").await.unwrap();
    let mallory = create_user(&context, "mallory").await.unwrap();
    let created = create_recipe(&context, &alice.token, recipe_form()).await;
    let uri = format!("/api/recipes/my-recipes/{}", created["_id"].as_str().unwrap());

    let body: Value = AxumTestRequest::put(&uri)
        .bearer(&mallory.token)
        .multipart(MultipartBody::new().text("title", "Stolen"))
        .send(context.router())
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .json();
    assert_eq!(body["message"], "Not authorized to update this recipe");

    let body: Value = AxumTestRequest::delete(&uri)
        .bearer(&mallory.token)
        .send(context.router())
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .json();
    assert_eq!(body["message"], "Not authorized to delete this recipe");

    let body: Value = AxumTestRequest::delete(&uri)
        .bearer(&alice.token)
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["message"], "Recipe deleted successfully");

    AxumTestRequest::delete(&uri)
        .bearer(&alice.token)
        .send(context.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_recipe_by_id() {
    let context = create_test_context().await.unwrap();
    let user = create_user(&context, "alice").await.unwrap();
    let created = create_recipe(&context, &user.token, recipe_form()).await;
    let id = created["_id"].as_str().unwrap();

    let recipe: Value = AxumTestRequest::get(&format!("/api/recipes/{id}"))
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(recipe["title"], "Garlic Bread");
    assert_eq!(recipe["author"]["email"], "alice@example.com");

    let body: Value = AxumTestRequest::get("/api/recipes/not-an-id")
        .send(context.router())
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();
    assert_eq!(body["message"], "Recipe not found");

    AxumTestRequest::get(&format!("/api/recipes/{}", uuid::Uuid::new_v4()))
        .send(context.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_system_recipes() {
    let context = create_test_context().await.unwrap();
    let user = create_user(&context, "alice").await.unwrap();
    insert_system_recipe(context.database(), "Omelette", &["pan"], &["egg"], Some("breakfast"))
        .await
        .unwrap();
    create_recipe(&context, &user.token, recipe_form()).await;

    let recipes: Vec<Value> = AxumTestRequest::get("/api/recipes")
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["title"], "Omelette");
    assert_eq!(recipes[0]["isSystem"], true);
}

#[tokio::test]
async fn test_suggest_search() {
    let context = create_test_context().await.unwrap();
    for title in ["Pancakes", "Pan Pizza", "Pasta"] {
        insert_system_recipe(context.database(), title, &[], &["flour"], None)
            .await
            .unwrap();
    }

    let suggestions: Vec<Value> = AxumTestRequest::get("/api/recipes/suggest/search?query=pan")
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let titles: Vec<&str> = suggestions
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Pancakes", "Pan Pizza"]);
    assert!(suggestions[0]["_id"].is_string());
    assert!(suggestions[0].get("description").is_none());

    let empty: Vec<Value> = AxumTestRequest::get("/api/recipes/suggest/search")
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_filter_endpoint_relaxes_tiers() {
    let context = create_test_context().await.unwrap();
    insert_system_recipe(
        context.database(),
        "R1",
        &["oven", "pan"],
        &["egg"],
        Some("breakfast"),
    )
    .await
    .unwrap();

    let recipes: Vec<Value> = AxumTestRequest::post("/api/recipes/filter")
        .json(&json!({ "tools": ["Oven", "pan", "knife"] }))
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["title"], "R1");

    let recipes: Vec<Value> = AxumTestRequest::post("/api/recipes/filter")
        .json(&json!({ "tools": ["oven"], "mealTime": "dinner" }))
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert!(recipes.is_empty());

    let recipes: Vec<Value> = AxumTestRequest::post("/api/recipes/filter")
        .json(&json!({}))
        .send(context.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(recipes.len(), 1);
}

#[tokio::test]
async fn test_filter_rejects_malformed_bodies() {
    let context = create_test_context().await.unwrap();

    let body: Value = AxumTestRequest::post("/api/recipes/filter")
        .json(&json!({ "tools": "oven" }))
        .send(context.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["code"], "INVALID_INPUT");

    AxumTestRequest::post("/api/recipes/filter")
        .raw("application/json", "{not json")
        .send(context.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let context = create_test_context().await.unwrap();
    let response = AxumTestRequest::get("/api/nothing-here")
        .send(context.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert!(response.header("x-request-id").is_some());
    let body: Value = response.json();
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(body["message"], "Route not found");
}
