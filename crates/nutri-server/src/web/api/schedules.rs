use crate::state::AppState;
use crate::web::api::extract::Json;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::api::middleware::AuthUser;
use crate::web::api::parse_id;
use crate::web::api::recipes::load_recipe_details;
use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use nutri_common::models::food::{MealType, RecipeDetail, Schedule};
use nutri_db::{ScheduleRepo, ScheduleRow};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub meal_type: String,
    pub date_and_time: DateTime<Utc>,
    pub recipe_ids: Vec<Uuid>,
}

/// Resolve each schedule's recipes (with their ingredients)
async fn load_schedules(pool: &PgPool, rows: Vec<ScheduleRow>) -> Result<Vec<Schedule>> {
    let ids: Vec<Uuid> = rows.iter().map(|s| s.schedule_id).collect();
    let links = ScheduleRepo::recipes_for_schedules(pool, &ids).await?;

    // A recipe may appear in several schedules; load each one once
    let mut unique = Vec::new();
    let mut seen = HashSet::new();
    for link in &links {
        if seen.insert(link.recipe.recipe_id) {
            unique.push(link.recipe.clone());
        }
    }
    let details: HashMap<Uuid, RecipeDetail> = load_recipe_details(pool, unique)
        .await?
        .into_iter()
        .map(|d| (d.recipe.recipe_id, d))
        .collect();

    let mut by_schedule: HashMap<Uuid, Vec<RecipeDetail>> = HashMap::new();
    for link in links {
        if let Some(detail) = details.get(&link.recipe.recipe_id) {
            by_schedule
                .entry(link.schedule_id)
                .or_default()
                .push(detail.clone());
        }
    }

    rows.into_iter()
        .map(|row| -> Result<Schedule> {
            Ok(Schedule {
                schedule_id: row.schedule_id,
                user_id: row.user_id,
                meal_type: row.meal_type.parse()?,
                date_and_time: row.date_and_time,
                recipes: by_schedule.remove(&row.schedule_id).unwrap_or_default(),
            })
        })
        .collect()
}

fn schedule_not_found() -> ApiError {
    ApiError::NotFound("Schedule not found".to_string())
}

/// GET /api/schedules - caller's schedules in time order
#[tracing::instrument(skip(state))]
pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;
    let rows = ScheduleRepo::list_for_user(&state.pool, user_id).await?;
    Ok(Json(load_schedules(&state.pool, rows).await?))
}

/// POST /api/schedules
#[tracing::instrument(skip(state))]
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateScheduleRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;
    let meal_type: MealType = req.meal_type.parse().map_err(ApiError::invalid)?;
    if req.recipe_ids.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one recipe is required".to_string(),
        ));
    }

    let schedule_id = ScheduleRepo::create(
        &state.pool,
        user_id,
        meal_type,
        req.date_and_time,
        &req.recipe_ids,
    )
    .await?
    .ok_or_else(|| ApiError::BadRequest("Unknown recipe ID".to_string()))?;

    let row = ScheduleRepo::get_for_user(&state.pool, user_id, schedule_id)
        .await?
        .ok_or_else(schedule_not_found)?;
    let schedule = load_schedules(&state.pool, vec![row])
        .await?
        .pop()
        .ok_or_else(schedule_not_found)?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

/// GET /api/schedules/{id}
#[tracing::instrument(skip(state))]
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;
    let schedule_id = parse_id(&id, "schedule")?;

    let row = ScheduleRepo::get_for_user(&state.pool, user_id, schedule_id)
        .await?
        .ok_or_else(schedule_not_found)?;
    let schedule = load_schedules(&state.pool, vec![row])
        .await?
        .pop()
        .ok_or_else(schedule_not_found)?;

    Ok(Json(schedule))
}

/// DELETE /api/schedules/{id} - referenced recipes are kept
#[tracing::instrument(skip(state))]
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;
    let schedule_id = parse_id(&id, "schedule")?;

    if !ScheduleRepo::delete_for_user(&state.pool, user_id, schedule_id).await? {
        return Err(schedule_not_found());
    }

    Ok(Json(json!({"deleted": true})))
}
