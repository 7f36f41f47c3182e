// ABOUTME: Recipe business logic: user CRUD, system catalog reads, filtering and suggestions
// ABOUTME: Parses form-encoded ingredient and tool lists and ingests system recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

use super::MessageResponse;
use crate::constants::{messages, recipes::DEFAULT_SERVINGS};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{Ingredient, MealTime, Recipe, RecipeQuery, RecipeSuggestion};
use crate::resources::ServerResources;
use crate::uploads::MultipartForm;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

/// Body of the filter endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    /// Desired tools
    #[serde(default)]
    pub tools: Option<Vec<String>>,
    /// Required meal time
    #[serde(default)]
    pub meal_time: Option<String>,
    /// Desired ingredient names
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
}

impl FilterRequest {
    /// Normalize into a matcher query
    #[must_use]
    pub fn into_query(self) -> RecipeQuery {
        RecipeQuery::new(
            self.tools.unwrap_or_default(),
            self.ingredients.unwrap_or_default(),
            self.meal_time.as_deref(),
        )
    }
}

/// A system recipe as supplied to ingestion
///
/// `ingredients` may be an array or a JSON string; `tools` may be an array,
/// a JSON string or a comma-separated string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSystemRecipe {
    /// Title
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Ingredient list
    pub ingredients: Option<Value>,
    /// Tool list
    pub tools: Option<Value>,
    /// Meal time name
    pub meal_time: Option<String>,
    /// Servings as a number or numeric string
    pub servings: Option<Value>,
    /// Image path or URL
    pub image: Option<String>,
    /// Video URL
    pub video_url: Option<String>,
}

/// Outcome of a seed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Recipes inserted
    pub inserted: usize,
    /// Recipes skipped because a system recipe with the title exists
    pub skipped: usize,
}

/// Create a recipe owned by `user_id` from a multipart form
///
/// # Errors
///
/// - `MissingRequiredField` when title or description is blank or ingredients are absent
/// - `InvalidInput` for unparseable ingredients, tools or meal time
/// - `StorageError` when the image cannot be written
pub async fn create_recipe(
    resources: &ServerResources,
    user_id: Uuid,
    mut form: MultipartForm,
) -> AppResult<Recipe> {
    let (Some(title), Some(description), Some(ingredients)) = (
        form.non_empty("title"),
        form.non_empty("description"),
        form.non_empty("ingredients"),
    ) else {
        return Err(AppError::missing_field(messages::RECIPE_FIELDS_REQUIRED));
    };

    let now = Utc::now();
    let mut recipe = Recipe {
        id: Uuid::new_v4(),
        title: clean_title(title),
        description: description.trim().to_owned(),
        ingredients: parse_ingredients(ingredients)?,
        tools: form.non_empty("tools").map(parse_tools).transpose()?.unwrap_or_default(),
        meal_time: form.non_empty("mealTime").map(parse_meal_time).transpose()?,
        servings: form
            .text("servings")
            .and_then(parse_servings)
            .unwrap_or(DEFAULT_SERVINGS),
        image: String::new(),
        video_url: form.text("videoUrl").map(str::trim).unwrap_or_default().to_owned(),
        created_by: Some(user_id),
        author: None,
        is_system: false,
        created_at: now,
        updated_at: now,
    };

    if let Some(image) = form.take_image() {
        recipe.image = resources.images.save(&image).await?;
    }

    if let Err(error) = resources.database.create_recipe(&recipe).await {
        if !recipe.image.is_empty() {
            resources.images.remove(&recipe.image).await;
        }
        return Err(error);
    }

    info!(recipe_id = %recipe.id, user_id = %user_id, "Recipe created");
    reload(&resources.database, recipe.id).await
}

/// Apply the provided fields of a multipart form to a recipe owned by `user_id`
///
/// # Errors
///
/// - `ResourceNotFound` for unknown or malformed IDs
/// - `PermissionDenied` when the caller does not own the recipe
/// - `InvalidInput` for unparseable ingredients, tools or meal time
pub async fn update_recipe(
    resources: &ServerResources,
    user_id: Uuid,
    recipe_id: &str,
    mut form: MultipartForm,
) -> AppResult<Recipe> {
    let mut recipe = owned_recipe(
        &resources.database,
        user_id,
        recipe_id,
        messages::NOT_RECIPE_OWNER_UPDATE,
    )
    .await?;

    if let Some(title) = form.non_empty("title") {
        recipe.title = clean_title(title);
    }
    if let Some(description) = form.non_empty("description") {
        description.trim().clone_into(&mut recipe.description);
    }
    if let Some(ingredients) = form.non_empty("ingredients") {
        recipe.ingredients = parse_ingredients(ingredients)?;
    }
    if let Some(tools) = form.non_empty("tools") {
        recipe.tools = parse_tools(tools)?;
    }
    if let Some(meal_time) = form.non_empty("mealTime") {
        recipe.meal_time = Some(parse_meal_time(meal_time)?);
    }
    if let Some(servings) = form.text("servings").and_then(parse_servings) {
        recipe.servings = servings;
    }
    if let Some(video_url) = form.text("videoUrl") {
        video_url.trim().clone_into(&mut recipe.video_url);
    }

    let previous_image = recipe.image.clone();
    let replaced_image = match form.take_image() {
        Some(image) => {
            recipe.image = resources.images.save(&image).await?;
            true
        }
        None => false,
    };

    recipe.updated_at = Utc::now();
    if let Err(error) = resources.database.update_recipe(&recipe).await {
        if replaced_image {
            resources.images.remove(&recipe.image).await;
        }
        return Err(error);
    }

    if replaced_image && !previous_image.is_empty() {
        resources.images.remove(&previous_image).await;
    }

    info!(recipe_id = %recipe.id, user_id = %user_id, "Recipe updated");
    reload(&resources.database, recipe.id).await
}

/// Delete a recipe owned by `user_id`
///
/// # Errors
///
/// - `ResourceNotFound` for unknown or malformed IDs
/// - `PermissionDenied` when the caller does not own the recipe
pub async fn delete_recipe(
    resources: &ServerResources,
    user_id: Uuid,
    recipe_id: &str,
) -> AppResult<MessageResponse> {
    let recipe = owned_recipe(
        &resources.database,
        user_id,
        recipe_id,
        messages::NOT_RECIPE_OWNER_DELETE,
    )
    .await?;

    if !resources.database.delete_recipe(recipe.id).await? {
        return Err(AppError::not_found("Recipe"));
    }
    if !recipe.image.is_empty() {
        resources.images.remove(&recipe.image).await;
    }

    info!(recipe_id = %recipe.id, user_id = %user_id, "Recipe deleted");
    Ok(MessageResponse::new(messages::RECIPE_DELETED))
}

/// The caller's own (non-system) recipes
///
/// # Errors
///
/// Returns `DatabaseError` on query failure
pub async fn list_my_recipes(resources: &ServerResources, user_id: Uuid) -> AppResult<Vec<Recipe>> {
    resources.database.list_recipes_by_owner(user_id).await
}

/// Every system recipe with its author populated
///
/// # Errors
///
/// Returns `DatabaseError` on query failure
pub async fn list_system_recipes(resources: &ServerResources) -> AppResult<Vec<Recipe>> {
    resources.database.list_system_recipes().await
}

/// Any recipe by ID
///
/// # Errors
///
/// Returns `ResourceNotFound` for unknown or malformed IDs
pub async fn get_recipe(resources: &ServerResources, recipe_id: &str) -> AppResult<Recipe> {
    let id = parse_recipe_id(recipe_id)?;
    resources
        .database
        .get_recipe(id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))
}

/// System recipe titles starting with `query`
///
/// # Errors
///
/// Returns `DatabaseError` on query failure
pub async fn suggest_recipes(
    resources: &ServerResources,
    query: Option<&str>,
) -> AppResult<Vec<RecipeSuggestion>> {
    match query.map(str::trim).filter(|query| !query.is_empty()) {
        Some(prefix) => resources.database.suggest_recipes(prefix).await,
        None => Ok(Vec::new()),
    }
}

/// Run the tiered matcher for a filter request
///
/// # Errors
///
/// Propagates catalog failures
pub async fn filter_recipes(
    resources: &ServerResources,
    request: FilterRequest,
) -> AppResult<Vec<Recipe>> {
    let query = request.into_query();
    let recipes = resources.matcher.find_matches(&query).await?;
    debug!(
        tools = query.tools.len(),
        ingredients = query.ingredients.len(),
        meal_time = query.meal_time.as_deref().unwrap_or("-"),
        results = recipes.len(),
        "Recipe filter finished"
    );
    Ok(recipes)
}

/// Insert a curated system recipe
///
/// # Errors
///
/// - `MissingRequiredField` when title or description is blank or ingredients are absent
/// - `InvalidInput` for unparseable ingredients or meal time
pub async fn add_system_recipe(database: &Database, input: NewSystemRecipe) -> AppResult<Recipe> {
    let (Some(title), Some(description), Some(ingredients)) = (
        input.title.as_deref().map(clean_title).filter(|title| !title.is_empty()),
        input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty()),
        input.ingredients.as_ref().filter(|value| !value.is_null()),
    ) else {
        return Err(AppError::missing_field(messages::RECIPE_FIELDS_REQUIRED));
    };

    let ingredients = match ingredients {
        Value::String(raw) => parse_ingredients(raw)?,
        value => ingredients_from_value(value.clone())?,
    };
    let servings = match &input.servings {
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|servings| u32::try_from(servings).ok())
            .filter(|servings| *servings > 0),
        Some(Value::String(raw)) => parse_servings(raw),
        _ => None,
    };

    let now = Utc::now();
    let recipe = Recipe {
        id: Uuid::new_v4(),
        title,
        description: description.to_owned(),
        ingredients,
        tools: input.tools.as_ref().map(lenient_tools).unwrap_or_default(),
        meal_time: input
            .meal_time
            .as_deref()
            .filter(|meal_time| !meal_time.trim().is_empty())
            .map(parse_meal_time)
            .transpose()?,
        servings: servings.unwrap_or(DEFAULT_SERVINGS),
        image: input.image.unwrap_or_default(),
        video_url: input.video_url.unwrap_or_default(),
        created_by: None,
        author: None,
        is_system: true,
        created_at: now,
        updated_at: now,
    };

    database.create_recipe(&recipe).await?;
    info!(recipe_id = %recipe.id, title = %recipe.title, "System recipe added");
    Ok(recipe)
}

/// Insert each recipe whose title is not already a system recipe
///
/// # Errors
///
/// Stops at the first invalid recipe or database failure
pub async fn seed_system_recipes(
    database: &Database,
    recipes: Vec<NewSystemRecipe>,
) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();
    for input in recipes {
        let title = input.title.as_deref().map(clean_title).unwrap_or_default();
        if database.find_system_recipe_by_title(&title).await?.is_some() {
            debug!(title = %title, "System recipe already present");
            report.skipped += 1;
            continue;
        }
        add_system_recipe(database, input).await?;
        report.inserted += 1;
    }
    Ok(report)
}

async fn owned_recipe(
    database: &Database,
    user_id: Uuid,
    recipe_id: &str,
    denied_message: &str,
) -> AppResult<Recipe> {
    let id = parse_recipe_id(recipe_id)?;
    let recipe = database
        .get_recipe(id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

    if !recipe.is_owned_by(user_id) {
        AppLogger::log_security_event(
            "recipe_ownership",
            &format!("Recipe {id} modified by non-owner"),
            Some(&user_id.to_string()),
        );
        return Err(AppError::permission_denied(denied_message));
    }
    Ok(recipe)
}

async fn reload(database: &Database, recipe_id: Uuid) -> AppResult<Recipe> {
    database
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::internal(format!("Recipe {recipe_id} vanished after write")))
}

fn parse_recipe_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::not_found("Recipe"))
}

#[derive(Deserialize)]
struct RawIngredient {
    name: String,
    #[serde(default)]
    quantity: Value,
}

/// Parse a JSON array of `{name, quantity}` objects
///
/// Quantities may be strings or numbers.
///
/// # Errors
///
/// Returns `InvalidInput` when the text is not such an array
pub fn parse_ingredients(raw: &str) -> AppResult<Vec<Ingredient>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|_| AppError::invalid_input(messages::INVALID_INGREDIENTS))?;
    ingredients_from_value(value)
}

fn ingredients_from_value(value: Value) -> AppResult<Vec<Ingredient>> {
    let raw: Vec<RawIngredient> = serde_json::from_value(value)
        .map_err(|_| AppError::invalid_input(messages::INVALID_INGREDIENTS))?;

    Ok(raw
        .into_iter()
        .filter(|ingredient| !ingredient.name.trim().is_empty())
        .map(|ingredient| Ingredient {
            name: ingredient.name.trim().to_owned(),
            quantity: match ingredient.quantity {
                Value::String(quantity) => quantity.trim().to_owned(),
                Value::Null => String::new(),
                other => other.to_string(),
            },
        })
        .collect())
}

/// Parse a JSON array of tool names
///
/// # Errors
///
/// Returns `InvalidInput` when the text is not a JSON array of strings
pub fn parse_tools(raw: &str) -> AppResult<Vec<String>> {
    let tools: Vec<String> =
        serde_json::from_str(raw).map_err(|_| AppError::invalid_input(messages::INVALID_TOOLS))?;
    Ok(clean_tools(tools))
}

/// Accept tools as an array, a JSON string or a comma-separated string
#[must_use]
pub fn lenient_tools(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => clean_tools(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned),
        ),
        Value::String(raw) => parse_tools(raw)
            .unwrap_or_else(|_| clean_tools(raw.split(',').map(str::to_owned))),
        _ => Vec::new(),
    }
}

fn clean_tools(tools: impl IntoIterator<Item = String>) -> Vec<String> {
    tools
        .into_iter()
        .map(|tool| strip_wrapping_quotes(&tool).to_owned())
        .filter(|tool| !tool.is_empty())
        .collect()
}

/// Trim a title and strip wrapping quotes left by form encoders
#[must_use]
pub fn clean_title(raw: &str) -> String {
    strip_wrapping_quotes(raw).to_owned()
}

fn strip_wrapping_quotes(raw: &str) -> &str {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
}

/// Positive servings count, or `None` for anything else
#[must_use]
pub fn parse_servings(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|servings| *servings > 0)
}

fn parse_meal_time(raw: &str) -> AppResult<MealTime> {
    MealTime::parse(raw).ok_or_else(|| {
        let allowed: Vec<&str> = MealTime::ALL.iter().map(MealTime::as_str).collect();
        AppError::invalid_input(format!(
            "Invalid meal time '{}'. Allowed values: {}",
            raw.trim(),
            allowed.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_parse_ingredients_accepts_numbers_and_drops_blank_names() {
        let ingredients =
            parse_ingredients(r#"[{"name":" Egg ","quantity":2},{"name":"","quantity":"1"},{"name":"salt"}]"#)
                .unwrap();
        assert_eq!(
            ingredients,
            vec![
                Ingredient {
                    name: "Egg".to_owned(),
                    quantity: "2".to_owned()
                },
                Ingredient {
                    name: "salt".to_owned(),
                    quantity: String::new()
                },
            ]
        );
    }

    #[test]
    fn test_parse_ingredients_rejects_non_arrays() {
        let error = parse_ingredients("eggs, flour").unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInput);
        assert_eq!(error.message, messages::INVALID_INGREDIENTS);
        assert!(parse_ingredients(r#"{"name":"egg"}"#).is_err());
    }

    #[test]
    fn test_parse_tools_is_strict() {
        assert_eq!(
            parse_tools(r#"["Oven", " \"pan\" ", ""]"#).unwrap(),
            vec!["Oven".to_owned(), "pan".to_owned()]
        );
        let error = parse_tools("oven, pan").unwrap_err();
        assert_eq!(error.message, messages::INVALID_TOOLS);
    }

    #[test]
    fn test_lenient_tools_accepts_every_shape() {
        let expected = vec!["oven".to_owned(), "pan".to_owned()];
        assert_eq!(lenient_tools(&serde_json::json!(["oven", "pan"])), expected);
        assert_eq!(lenient_tools(&Value::from(r#"["oven","pan"]"#)), expected);
        assert_eq!(lenient_tools(&Value::from("\"oven\", 'pan'")), expected);
        assert!(lenient_tools(&Value::Null).is_empty());
    }

    #[test]
    fn test_clean_title_strips_wrapping_quotes() {
        assert_eq!(clean_title("  \"Pancakes\" "), "Pancakes");
        assert_eq!(clean_title("'Tea'"), "Tea");
        assert_eq!(clean_title("Mom's Pie"), "Mom's Pie");
    }

    #[test]
    fn test_parse_servings() {
        assert_eq!(parse_servings("4"), Some(4));
        assert_eq!(parse_servings(" 2 "), Some(2));
        assert_eq!(parse_servings("0"), None);
        assert_eq!(parse_servings("-3"), None);
        assert_eq!(parse_servings("many"), None);
    }

    #[test]
    fn test_parse_meal_time_lists_allowed_values() {
        assert_eq!(parse_meal_time("Dinner").unwrap(), MealTime::Dinner);
        let error = parse_meal_time("brunch").unwrap_err();
        assert!(error.message.contains("special occasion"));
    }

    #[test]
    fn test_filter_request_normalizes() {
        let request: FilterRequest =
            serde_json::from_str(r#"{"tools":["Oven","oven"],"mealTime":" Breakfast "}"#).unwrap();
        let query = request.into_query();
        assert_eq!(query.tools, vec!["oven".to_owned()]);
        assert!(query.ingredients.is_empty());
        assert_eq!(query.meal_time.as_deref(), Some("breakfast"));
    }

    #[test]
    fn test_filter_request_rejects_wrong_types() {
        assert!(serde_json::from_str::<FilterRequest>(r#"{"tools":"oven"}"#).is_err());
        assert!(serde_json::from_str::<FilterRequest>(r#"{"ingredients":[1,2]}"#).is_err());
    }
}
