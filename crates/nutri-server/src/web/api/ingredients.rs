use crate::state::AppState;
use crate::web::api::extract::{Json, Query};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::api::middleware::AuthUser;
use crate::web::api::{parse_id, ListQuery};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use nutri_common::models::food::Ingredient;
use nutri_common::validation::{validate_calories, validate_ingredient_name};
use nutri_db::IngredientRepo;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub nutritional_information: Option<String>,
    #[serde(default)]
    pub calories: i32,
}

/// GET /api/ingredients
#[tracing::instrument(skip(state, _auth))]
pub async fn list_ingredients(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    query.validate()?;
    let rows = IngredientRepo::list(&state.pool, query.limit, query.offset).await?;
    let ingredients: Vec<Ingredient> = rows.into_iter().map(Ingredient::from).collect();
    Ok(Json(ingredients))
}

/// POST /api/ingredients
#[tracing::instrument(skip(state, _auth))]
pub async fn create_ingredient(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(req): Json<CreateIngredientRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = req.name.trim();
    validate_ingredient_name(name).map_err(ApiError::invalid)?;
    validate_calories(req.calories).map_err(ApiError::invalid)?;

    let row = IngredientRepo::create(
        &state.pool,
        name,
        req.nutritional_information.as_deref(),
        req.calories,
    )
    .await?
    .ok_or_else(|| ApiError::Conflict(format!("Ingredient '{}' already exists", name)))?;

    Ok((StatusCode::CREATED, Json(Ingredient::from(row))))
}

/// GET /api/ingredients/{id}
#[tracing::instrument(skip(state, _auth))]
pub async fn get_ingredient(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let ingredient_id = parse_id(&id, "ingredient")?;
    let row = IngredientRepo::get(&state.pool, ingredient_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ingredient not found".to_string()))?;
    Ok(Json(Ingredient::from(row)))
}
