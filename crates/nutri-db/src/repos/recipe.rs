use crate::repos::ingredient::{IngredientRepo, IngredientRow};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use nutri_common::models::food::{MealType, Recipe};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRow {
    pub recipe_id: Uuid,
    pub name: String,
    pub preparation: Option<String>,
    pub meal_type: Option<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = anyhow::Error;

    fn try_from(row: RecipeRow) -> Result<Self> {
        let meal_type = row.meal_type.as_deref().map(str::parse).transpose()?;
        Ok(Recipe {
            recipe_id: row.recipe_id,
            name: row.name,
            preparation: row.preparation,
            meal_type,
            instructions: row.instructions,
            created_at: row.created_at,
        })
    }
}

/// Ingredient row tagged with the recipe it belongs to
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeIngredientRow {
    pub recipe_id: Uuid,
    #[sqlx(flatten)]
    pub ingredient: IngredientRow,
}

/// New recipe data for insertion
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub preparation: Option<String>,
    pub meal_type: Option<MealType>,
    pub instructions: Option<String>,
}

pub struct RecipeRepo;

impl RecipeRepo {
    /// Insert a recipe and attach the named ingredients (created if unknown)
    /// in one transaction. Returns the new recipe id.
    pub async fn create(
        pool: &PgPool,
        recipe: &NewRecipe,
        ingredient_names: &[String],
    ) -> Result<Uuid> {
        let recipe_id = Uuid::new_v4();
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query(
            "INSERT INTO recipe (recipe_id, name, preparation, meal_type, instructions) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(recipe_id)
        .bind(&recipe.name)
        .bind(recipe.preparation.as_deref())
        .bind(recipe.meal_type.map(|m| m.as_str()))
        .bind(recipe.instructions.as_deref())
        .execute(&mut *tx)
        .await
        .context("Failed to create recipe")?;

        Self::attach_ingredients(&mut tx, recipe_id, ingredient_names).await?;

        tx.commit().await.context("Failed to commit transaction")?;
        Ok(recipe_id)
    }

    pub async fn get(pool: &PgPool, recipe_id: Uuid) -> Result<Option<RecipeRow>> {
        let row = sqlx::query_as::<_, RecipeRow>(
            "SELECT recipe_id, name, preparation, meal_type, instructions, created_at FROM recipe WHERE recipe_id = $1",
        )
        .bind(recipe_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get recipe")?;
        Ok(row)
    }

    pub async fn get_by_name(pool: &PgPool, name: &str) -> Result<Vec<RecipeRow>> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            "SELECT recipe_id, name, preparation, meal_type, instructions, created_at FROM recipe WHERE name = $1 ORDER BY created_at",
        )
        .bind(name)
        .fetch_all(pool)
        .await
        .context("Failed to get recipes by name")?;
        Ok(rows)
    }

    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<RecipeRow>> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            "SELECT recipe_id, name, preparation, meal_type, instructions, created_at FROM recipe ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list recipes")?;
        Ok(rows)
    }

    pub async fn ingredients_for(pool: &PgPool, recipe_id: Uuid) -> Result<Vec<IngredientRow>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            "SELECT i.ingredient_id, i.name, i.nutritional_information, i.calories, i.created_at
             FROM recipe_ingredient ri
             JOIN ingredient i ON i.ingredient_id = ri.ingredient_id
             WHERE ri.recipe_id = $1
             ORDER BY i.name",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await
        .context("Failed to list recipe ingredients")?;
        Ok(rows)
    }

    /// Ingredients of several recipes at once, ordered by ingredient name
    pub async fn ingredients_for_recipes(
        pool: &PgPool,
        recipe_ids: &[Uuid],
    ) -> Result<Vec<RecipeIngredientRow>> {
        let rows = sqlx::query_as::<_, RecipeIngredientRow>(
            "SELECT ri.recipe_id, i.ingredient_id, i.name, i.nutritional_information, i.calories, i.created_at
             FROM recipe_ingredient ri
             JOIN ingredient i ON i.ingredient_id = ri.ingredient_id
             WHERE ri.recipe_id = ANY($1)
             ORDER BY i.name",
        )
        .bind(recipe_ids)
        .fetch_all(pool)
        .await
        .context("Failed to list ingredients for recipes")?;
        Ok(rows)
    }

    /// Replace the recipe's ingredient set. Returns false if the recipe does not exist.
    pub async fn set_ingredients(
        pool: &PgPool,
        recipe_id: Uuid,
        ingredient_names: &[String],
    ) -> Result<bool> {
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT recipe_id FROM recipe WHERE recipe_id = $1 FOR UPDATE")
                .bind(recipe_id)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to lock recipe")?;
        if exists.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM recipe_ingredient WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear recipe ingredients")?;

        Self::attach_ingredients(&mut tx, recipe_id, ingredient_names).await?;

        tx.commit().await.context("Failed to commit transaction")?;
        Ok(true)
    }

    async fn attach_ingredients(
        conn: &mut PgConnection,
        recipe_id: Uuid,
        ingredient_names: &[String],
    ) -> Result<()> {
        let ingredients = IngredientRepo::resolve_names(conn, ingredient_names).await?;
        let ids: Vec<Uuid> = ingredients.iter().map(|i| i.ingredient_id).collect();

        sqlx::query(
            "INSERT INTO recipe_ingredient (recipe_id, ingredient_id)
             SELECT $1, UNNEST($2::uuid[])
             ON CONFLICT DO NOTHING",
        )
        .bind(recipe_id)
        .bind(&ids)
        .execute(&mut *conn)
        .await
        .context("Failed to attach recipe ingredients")?;
        Ok(())
    }
}
