// ABOUTME: Recipe database operations and the SQLite implementation of the catalog port
// ABOUTME: Tools and ingredients are JSON columns filtered with json_each over lowercased copies

use super::{parse_uuid, Database};
use crate::constants::recipes::DEFAULT_SERVINGS;
use crate::errors::AppResult;
use crate::models::{Ingredient, MealTime, Recipe, RecipeAuthor, RecipeSuggestion};
use crate::recipes::{AxisConstraint, CatalogFilter, RecipeCatalog};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

const RECIPE_SELECT: &str = r"
    SELECT r.id, r.title, r.description, r.ingredients, r.tools, r.meal_time, r.servings,
           r.image, r.video_url, r.created_by, r.is_system, r.created_at, r.updated_at,
           u.username AS author_username, u.email AS author_email
    FROM recipes r
    LEFT JOIN users u ON u.id = r.created_by
";

// SQLite lower() only folds ASCII, so selectors are matched against columns
// folded in Rust when the recipe is written
const TOOL_MATCH: &str = "SELECT 1 FROM json_each(r.tools_lc) WHERE json_each.value";
const INGREDIENT_MATCH: &str = "SELECT 1 FROM json_each(r.ingredient_names_lc) WHERE json_each.value";

impl Database {
    pub(super) async fn migrate_recipes(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                ingredients TEXT NOT NULL DEFAULT '[]',
                tools TEXT NOT NULL DEFAULT '[]',
                meal_time TEXT,
                servings INTEGER NOT NULL DEFAULT 1,
                image TEXT NOT NULL DEFAULT '',
                video_url TEXT NOT NULL DEFAULT '',
                created_by TEXT REFERENCES users(id) ON DELETE SET NULL,
                is_system BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                title_lc TEXT NOT NULL DEFAULT '',
                tools_lc TEXT NOT NULL DEFAULT '[]',
                ingredient_names_lc TEXT NOT NULL DEFAULT '[]'
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_is_system ON recipes(is_system)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_created_by ON recipes(created_by)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new recipe
    pub async fn create_recipe(&self, recipe: &Recipe) -> AppResult<Uuid> {
        let folded = FoldedSelectors::from_recipe(recipe)?;
        sqlx::query(
            r"
            INSERT INTO recipes (id, title, description, ingredients, tools, meal_time, servings,
                                 image, video_url, created_by, is_system, created_at, updated_at,
                                 title_lc, tools_lc, ingredient_names_lc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ",
        )
        .bind(recipe.id.to_string())
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(serde_json::to_string(&recipe.ingredients)?)
        .bind(serde_json::to_string(&recipe.tools)?)
        .bind(recipe.meal_time.map(|meal_time| meal_time.as_str()))
        .bind(i64::from(recipe.servings))
        .bind(&recipe.image)
        .bind(&recipe.video_url)
        .bind(recipe.created_by.map(|id| id.to_string()))
        .bind(recipe.is_system)
        .bind(recipe.created_at)
        .bind(recipe.updated_at)
        .bind(folded.title)
        .bind(folded.tools)
        .bind(folded.ingredient_names)
        .execute(&self.pool)
        .await?;

        Ok(recipe.id)
    }

    /// Overwrite the editable fields of an existing recipe
    pub async fn update_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        let folded = FoldedSelectors::from_recipe(recipe)?;
        sqlx::query(
            r"
            UPDATE recipes SET
                title = $2,
                description = $3,
                ingredients = $4,
                tools = $5,
                meal_time = $6,
                servings = $7,
                image = $8,
                video_url = $9,
                updated_at = $10,
                title_lc = $11,
                tools_lc = $12,
                ingredient_names_lc = $13
            WHERE id = $1
            ",
        )
        .bind(recipe.id.to_string())
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(serde_json::to_string(&recipe.ingredients)?)
        .bind(serde_json::to_string(&recipe.tools)?)
        .bind(recipe.meal_time.map(|meal_time| meal_time.as_str()))
        .bind(i64::from(recipe.servings))
        .bind(&recipe.image)
        .bind(&recipe.video_url)
        .bind(recipe.updated_at)
        .bind(folded.title)
        .bind(folded.tools)
        .bind(folded.ingredient_names)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a recipe, returning whether it existed
    pub async fn delete_recipe(&self, recipe_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get any recipe (system or user) with its author populated
    pub async fn get_recipe(&self, recipe_id: Uuid) -> AppResult<Option<Recipe>> {
        let query = format!("{RECIPE_SELECT} WHERE r.id = $1");
        let row = sqlx::query(&query)
            .bind(recipe_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| row_to_recipe(&row)).transpose()
    }

    /// List the user-authored recipes of `user_id`
    pub async fn list_recipes_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Recipe>> {
        let query =
            format!("{RECIPE_SELECT} WHERE r.created_by = $1 AND r.is_system = 0 ORDER BY r.rowid");
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_recipe).collect()
    }

    /// List every system recipe
    pub async fn list_system_recipes(&self) -> AppResult<Vec<Recipe>> {
        self.find_recipes(&CatalogFilter::system()).await
    }

    /// Find a system recipe by exact title
    pub async fn find_system_recipe_by_title(&self, title: &str) -> AppResult<Option<Recipe>> {
        let query = format!("{RECIPE_SELECT} WHERE r.is_system = 1 AND r.title = $1 LIMIT 1");
        let row = sqlx::query(&query)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| row_to_recipe(&row)).transpose()
    }

    /// System recipes whose title starts with `prefix`, case-insensitively
    ///
    /// The prefix is matched literally; `%` and `_` carry no wildcard meaning.
    pub async fn suggest_recipes(&self, prefix: &str) -> AppResult<Vec<RecipeSuggestion>> {
        let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
        let rows = sqlx::query(
            r"
            SELECT id, title FROM recipes
            WHERE is_system = 1 AND title_lc LIKE $1 ESCAPE '\'
            ORDER BY rowid
            ",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> AppResult<RecipeSuggestion> {
                let id: String = row.try_get("id")?;
                Ok(RecipeSuggestion {
                    id: parse_uuid(&id)?,
                    title: row.try_get("title")?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl RecipeCatalog for Database {
    async fn find_recipes(&self, filter: &CatalogFilter) -> AppResult<Vec<Recipe>> {
        let mut builder = QueryBuilder::<Sqlite>::new(RECIPE_SELECT);
        builder.push(" WHERE 1 = 1");

        if filter.system_only {
            builder.push(" AND r.is_system = 1");
        }
        // Stored meal times are always the canonical MealTime strings, which the
        // filter already carries, so no folding happens in SQL
        if let Some(meal_time) = &filter.meal_time {
            builder.push(" AND r.meal_time = ").push_bind(meal_time.clone());
        }
        push_axis(&mut builder, TOOL_MATCH, &filter.tools);
        push_axis(&mut builder, INGREDIENT_MATCH, &filter.ingredients);

        builder.push(" ORDER BY r.rowid");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_recipe).collect()
    }
}

fn push_axis(builder: &mut QueryBuilder<'_, Sqlite>, element_match: &str, constraint: &AxisConstraint) {
    match constraint {
        AxisConstraint::Unconstrained => {}
        AxisConstraint::All(values) => {
            for value in values {
                builder
                    .push(" AND EXISTS (")
                    .push(element_match)
                    .push(" = ")
                    .push_bind(value.to_lowercase())
                    .push(")");
            }
        }
        AxisConstraint::Any(values) if values.is_empty() => {
            builder.push(" AND 0");
        }
        AxisConstraint::Any(values) => {
            builder.push(" AND EXISTS (").push(element_match).push(" IN (");
            let mut separated = builder.separated(", ");
            for value in values {
                separated.push_bind(value.to_lowercase());
            }
            separated.push_unseparated("))");
        }
    }
}

/// Lowercased copies of the searchable recipe fields
struct FoldedSelectors {
    title: String,
    tools: String,
    ingredient_names: String,
}

impl FoldedSelectors {
    fn from_recipe(recipe: &Recipe) -> AppResult<Self> {
        let tools: Vec<String> = recipe.tools.iter().map(|tool| tool.to_lowercase()).collect();
        let ingredient_names: Vec<String> =
            recipe.ingredient_names().map(str::to_lowercase).collect();
        Ok(Self {
            title: recipe.title.to_lowercase(),
            tools: serde_json::to_string(&tools)?,
            ingredient_names: serde_json::to_string(&ingredient_names)?,
        })
    }
}

/// Escape LIKE wildcards so the value is matched literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let id: String = row.try_get("id")?;
    let ingredients: String = row.try_get("ingredients")?;
    let tools: String = row.try_get("tools")?;
    let meal_time: Option<String> = row.try_get("meal_time")?;
    let servings: i64 = row.try_get("servings")?;
    let created_by: Option<String> = row.try_get("created_by")?;
    let created_by = created_by.as_deref().map(parse_uuid).transpose()?;

    let author_username: Option<String> = row.try_get("author_username")?;
    let author_email: Option<String> = row.try_get("author_email")?;
    let author = match (created_by, author_username, author_email) {
        (Some(id), Some(username), Some(email)) => Some(RecipeAuthor {
            id,
            username,
            email,
        }),
        _ => None,
    };

    Ok(Recipe {
        id: parse_uuid(&id)?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        ingredients: serde_json::from_str::<Vec<Ingredient>>(&ingredients)?,
        tools: serde_json::from_str::<Vec<String>>(&tools)?,
        meal_time: meal_time.as_deref().and_then(MealTime::parse),
        servings: u32::try_from(servings)
            .ok()
            .filter(|servings| *servings > 0)
            .unwrap_or(DEFAULT_SERVINGS),
        image: row.try_get("image")?,
        video_url: row.try_get("video_url")?,
        created_by,
        author,
        is_system: row.try_get("is_system")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
