use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use nutri_common::models::user::{ProfileUpdate, UserProfile};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub target_weight: Option<f64>,
    pub current_weight: Option<f64>,
    pub height: Option<i32>,
    pub weekly_physical_activity: Option<i32>,
    pub gender: Option<String>,
    pub dietary_restriction: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            user_id: row.user_id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            target_weight: row.target_weight,
            current_weight: row.current_weight,
            height: row.height,
            weekly_physical_activity: row.weekly_physical_activity,
            gender: row.gender,
            dietary_restriction: row.dietary_restriction,
            birthday: row.birthday,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user. Returns false when the username is already taken.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"INSERT INTO "user" (user_id, username, email, password_hash) VALUES ($1, $2, $3, $4)
               ON CONFLICT (username) DO NOTHING"#,
        )
        .bind(user_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .execute(pool)
        .await
        .context("Failed to create user")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT user_id, username, email, password_hash, first_name, last_name, target_weight, current_weight, height, weekly_physical_activity, gender, dietary_restriction, birthday, created_at, last_login_at FROM "user" WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by username")?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT user_id, username, email, password_hash, first_name, last_name, target_weight, current_weight, height, weekly_physical_activity, gender, dietary_restriction, birthday, created_at, last_login_at FROM "user" WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by id")?;
        Ok(row)
    }

    pub async fn touch_last_login(pool: &PgPool, user_id: Uuid) -> Result<()> {
        sqlx::query(r#"UPDATE "user" SET last_login_at = NOW() WHERE user_id = $1"#)
            .bind(user_id)
            .execute(pool)
            .await
            .context("Failed to update last_login_at")?;
        Ok(())
    }

    /// Apply the present fields of `update`; absent fields keep their value.
    /// Returns the updated row, or None if the user does not exist.
    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"UPDATE "user" SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                target_weight = COALESCE($4, target_weight),
                current_weight = COALESCE($5, current_weight),
                height = COALESCE($6, height),
                weekly_physical_activity = COALESCE($7, weekly_physical_activity),
                gender = COALESCE($8, gender),
                dietary_restriction = COALESCE($9, dietary_restriction),
                birthday = COALESCE($10, birthday)
               WHERE user_id = $1
               RETURNING user_id, username, email, password_hash, first_name, last_name, target_weight, current_weight, height, weekly_physical_activity, gender, dietary_restriction, birthday, created_at, last_login_at"#,
        )
        .bind(user_id)
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.target_weight)
        .bind(update.current_weight)
        .bind(update.height)
        .bind(update.weekly_physical_activity)
        .bind(update.gender.as_deref())
        .bind(update.dietary_restriction.as_deref())
        .bind(update.birthday)
        .fetch_optional(pool)
        .await
        .context("Failed to update user profile")?;
        Ok(row)
    }

    pub async fn set_password_hash(
        pool: &PgPool,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool> {
        let result = sqlx::query(r#"UPDATE "user" SET password_hash = $2 WHERE user_id = $1"#)
            .bind(user_id)
            .bind(password_hash)
            .execute(pool)
            .await
            .context("Failed to update password hash")?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user. Foreign keys remove the user's fridge, schedules and
    /// refresh tokens; ingredients and recipes are left alone.
    pub async fn delete(pool: &PgPool, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM "user" WHERE user_id = $1"#)
            .bind(user_id)
            .execute(pool)
            .await
            .context("Failed to delete user")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_username(pool: &PgPool, username: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user" WHERE username = $1"#)
            .bind(username)
            .fetch_one(pool)
            .await
            .context("Failed to count users")?;
        Ok(count)
    }
}
