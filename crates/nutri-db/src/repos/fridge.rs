use crate::repos::ingredient::{IngredientRepo, IngredientRow};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FridgeRow {
    pub fridge_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

pub struct FridgeRepo;

impl FridgeRepo {
    pub async fn get_for_user(pool: &PgPool, user_id: Uuid) -> Result<Option<FridgeRow>> {
        let row = sqlx::query_as::<_, FridgeRow>(
            "SELECT fridge_id, user_id, created_at FROM fridge WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get fridge")?;
        Ok(row)
    }

    /// Return the user's fridge, creating it on first use
    pub async fn get_or_create(conn: &mut PgConnection, user_id: Uuid) -> Result<FridgeRow> {
        let row = sqlx::query_as::<_, FridgeRow>(
            "INSERT INTO fridge (fridge_id, user_id) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING fridge_id, user_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to get or create fridge")?;
        Ok(row)
    }

    /// Resolve `names` to ingredients (creating unknown ones) and add them to
    /// the user's fridge in a single transaction. Membership is a set: names
    /// already in the fridge are ignored.
    pub async fn add_ingredients_by_name(
        pool: &PgPool,
        user_id: Uuid,
        names: &[String],
    ) -> Result<FridgeRow> {
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        let fridge = Self::get_or_create(&mut tx, user_id).await?;
        let ingredients = IngredientRepo::resolve_names(&mut tx, names).await?;
        let ids: Vec<Uuid> = ingredients.iter().map(|i| i.ingredient_id).collect();

        sqlx::query(
            "INSERT INTO fridge_ingredient (fridge_id, ingredient_id)
             SELECT $1, UNNEST($2::uuid[])
             ON CONFLICT DO NOTHING",
        )
        .bind(fridge.fridge_id)
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .context("Failed to add ingredients to fridge")?;

        tx.commit().await.context("Failed to commit transaction")?;
        Ok(fridge)
    }

    pub async fn list_ingredients(pool: &PgPool, fridge_id: Uuid) -> Result<Vec<IngredientRow>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            "SELECT i.ingredient_id, i.name, i.nutritional_information, i.calories, i.created_at
             FROM fridge_ingredient fi
             JOIN ingredient i ON i.ingredient_id = fi.ingredient_id
             WHERE fi.fridge_id = $1
             ORDER BY i.name",
        )
        .bind(fridge_id)
        .fetch_all(pool)
        .await
        .context("Failed to list fridge ingredients")?;
        Ok(rows)
    }

    /// Remove one ingredient from the user's fridge. The ingredient itself is kept.
    pub async fn remove_ingredient(
        pool: &PgPool,
        user_id: Uuid,
        ingredient_id: Uuid,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM fridge_ingredient fi USING fridge f
             WHERE fi.fridge_id = f.fridge_id AND f.user_id = $1 AND fi.ingredient_id = $2",
        )
        .bind(user_id)
        .bind(ingredient_id)
        .execute(pool)
        .await
        .context("Failed to remove ingredient from fridge")?;
        Ok(result.rows_affected() > 0)
    }
}
