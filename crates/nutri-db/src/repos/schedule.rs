use crate::repos::recipe::RecipeRow;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use nutri_common::models::food::MealType;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScheduleRow {
    pub schedule_id: Uuid,
    pub user_id: Uuid,
    pub meal_type: String,
    pub date_and_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Recipe row tagged with the schedule referencing it
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScheduleRecipeRow {
    pub schedule_id: Uuid,
    #[sqlx(flatten)]
    pub recipe: RecipeRow,
}

pub struct ScheduleRepo;

impl ScheduleRepo {
    /// Create a schedule linked to `recipe_ids` in one transaction.
    /// Returns None (and writes nothing) if any recipe id is unknown.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        meal_type: MealType,
        date_and_time: DateTime<Utc>,
        recipe_ids: &[Uuid],
    ) -> Result<Option<Uuid>> {
        let mut ids = recipe_ids.to_vec();
        ids.sort();
        ids.dedup();

        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        let found: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM recipe WHERE recipe_id = ANY($1)")
                .bind(&ids)
                .fetch_one(&mut *tx)
                .await
                .context("Failed to check recipe ids")?;
        if found != ids.len() as i64 {
            return Ok(None);
        }

        let schedule_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO schedule (schedule_id, user_id, meal_type, date_and_time) VALUES ($1, $2, $3, $4)",
        )
        .bind(schedule_id)
        .bind(user_id)
        .bind(meal_type.as_str())
        .bind(date_and_time)
        .execute(&mut *tx)
        .await
        .context("Failed to create schedule")?;

        sqlx::query(
            "INSERT INTO schedule_recipe (schedule_id, recipe_id)
             SELECT $1, UNNEST($2::uuid[])",
        )
        .bind(schedule_id)
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .context("Failed to link schedule recipes")?;

        tx.commit().await.context("Failed to commit transaction")?;
        Ok(Some(schedule_id))
    }

    /// Get a schedule owned by `user_id`
    pub async fn get_for_user(
        pool: &PgPool,
        user_id: Uuid,
        schedule_id: Uuid,
    ) -> Result<Option<ScheduleRow>> {
        let row = sqlx::query_as::<_, ScheduleRow>(
            "SELECT schedule_id, user_id, meal_type, date_and_time, created_at FROM schedule WHERE schedule_id = $1 AND user_id = $2",
        )
        .bind(schedule_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get schedule")?;
        Ok(row)
    }

    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ScheduleRow>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(
            "SELECT schedule_id, user_id, meal_type, date_and_time, created_at FROM schedule WHERE user_id = $1 ORDER BY date_and_time",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list schedules")?;
        Ok(rows)
    }

    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schedule WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .context("Failed to count schedules")?;
        Ok(count)
    }

    /// Recipes referenced by the given schedules, ordered by recipe name
    pub async fn recipes_for_schedules(
        pool: &PgPool,
        schedule_ids: &[Uuid],
    ) -> Result<Vec<ScheduleRecipeRow>> {
        let rows = sqlx::query_as::<_, ScheduleRecipeRow>(
            "SELECT sr.schedule_id, r.recipe_id, r.name, r.preparation, r.meal_type, r.instructions, r.created_at
             FROM schedule_recipe sr
             JOIN recipe r ON r.recipe_id = sr.recipe_id
             WHERE sr.schedule_id = ANY($1)
             ORDER BY r.name",
        )
        .bind(schedule_ids)
        .fetch_all(pool)
        .await
        .context("Failed to list schedule recipes")?;
        Ok(rows)
    }

    /// Delete a schedule owned by `user_id`. Referenced recipes are kept.
    pub async fn delete_for_user(pool: &PgPool, user_id: Uuid, schedule_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM schedule WHERE schedule_id = $1 AND user_id = $2")
            .bind(schedule_id)
            .bind(user_id)
            .execute(pool)
            .await
            .context("Failed to delete schedule")?;
        Ok(result.rows_affected() > 0)
    }
}
