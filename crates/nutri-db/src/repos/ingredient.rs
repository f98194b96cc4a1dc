use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use nutri_common::models::food::Ingredient;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IngredientRow {
    pub ingredient_id: Uuid,
    pub name: String,
    pub nutritional_information: Option<String>,
    pub calories: i32,
    pub created_at: DateTime<Utc>,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            ingredient_id: row.ingredient_id,
            name: row.name,
            nutritional_information: row.nutritional_information,
            calories: row.calories,
        }
    }
}

pub struct IngredientRepo;

impl IngredientRepo {
    /// Insert a new ingredient. Returns None when the name already exists.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        nutritional_information: Option<&str>,
        calories: i32,
    ) -> Result<Option<IngredientRow>> {
        let row = sqlx::query_as::<_, IngredientRow>(
            "INSERT INTO ingredient (ingredient_id, name, nutritional_information, calories) VALUES ($1, $2, $3, $4)
             ON CONFLICT (name) DO NOTHING
             RETURNING ingredient_id, name, nutritional_information, calories, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(nutritional_information)
        .bind(calories)
        .fetch_optional(pool)
        .await
        .context("Failed to create ingredient")?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, ingredient_id: Uuid) -> Result<Option<IngredientRow>> {
        let row = sqlx::query_as::<_, IngredientRow>(
            "SELECT ingredient_id, name, nutritional_information, calories, created_at FROM ingredient WHERE ingredient_id = $1",
        )
        .bind(ingredient_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get ingredient")?;
        Ok(row)
    }

    pub async fn get_by_name(pool: &PgPool, name: &str) -> Result<Option<IngredientRow>> {
        let row = sqlx::query_as::<_, IngredientRow>(
            "SELECT ingredient_id, name, nutritional_information, calories, created_at FROM ingredient WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
        .context("Failed to get ingredient by name")?;
        Ok(row)
    }

    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<IngredientRow>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            "SELECT ingredient_id, name, nutritional_information, calories, created_at FROM ingredient ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list ingredients")?;
        Ok(rows)
    }

    /// Look up each name, creating a bare ingredient (0 calories) for names not
    /// seen before. Existing rows are returned untouched, so recorded calorie
    /// data survives. Output order follows `names`.
    pub async fn resolve_names(
        conn: &mut PgConnection,
        names: &[String],
    ) -> Result<Vec<IngredientRow>> {
        let mut rows = Vec::with_capacity(names.len());
        for name in names {
            // The no-op update makes RETURNING yield the existing row on conflict
            let row = sqlx::query_as::<_, IngredientRow>(
                "INSERT INTO ingredient (ingredient_id, name) VALUES ($1, $2)
                 ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                 RETURNING ingredient_id, name, nutritional_information, calories, created_at",
            )
            .bind(Uuid::new_v4())
            .bind(name)
            .fetch_one(&mut *conn)
            .await
            .with_context(|| format!("Failed to resolve ingredient '{}'", name))?;
            rows.push(row);
        }
        Ok(rows)
    }
}
