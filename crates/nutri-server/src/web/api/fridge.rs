use crate::state::AppState;
use crate::web::api::extract::Json;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::api::middleware::AuthUser;
use crate::web::api::parse_id;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use nutri_common::models::food::{Fridge, Ingredient};
use nutri_common::validation::normalize_ingredient_names;
use nutri_db::FridgeRepo;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AddIngredientsRequest {
    pub ingredients: Vec<String>,
}

/// GET /api/fridge
#[tracing::instrument(skip(state))]
pub async fn get_fridge(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;

    let fridge = match FridgeRepo::get_for_user(&state.pool, user_id).await? {
        Some(f) => f,
        None => {
            return Ok(Json(Fridge {
                fridge_id: None,
                ingredients: Vec::new(),
            }))
        }
    };

    let ingredients = FridgeRepo::list_ingredients(&state.pool, fridge.fridge_id).await?;
    Ok(Json(Fridge {
        fridge_id: Some(fridge.fridge_id),
        ingredients: ingredients.into_iter().map(Ingredient::from).collect(),
    }))
}

/// POST /api/fridge/ingredients - add ingredients by name
#[tracing::instrument(skip(state))]
pub async fn add_ingredients_to_fridge(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<AddIngredientsRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;

    let names = normalize_ingredient_names(&req.ingredients).map_err(ApiError::invalid)?;
    if names.is_empty() {
        return Err(ApiError::BadRequest("No ingredients provided".to_string()));
    }

    let fridge = FridgeRepo::add_ingredients_by_name(&state.pool, user_id, &names).await?;
    let ingredients = FridgeRepo::list_ingredients(&state.pool, fridge.fridge_id).await?;

    Ok(Json(Fridge {
        fridge_id: Some(fridge.fridge_id),
        ingredients: ingredients.into_iter().map(Ingredient::from).collect(),
    }))
}

/// DELETE /api/fridge/ingredients/{id}
#[tracing::instrument(skip(state))]
pub async fn remove_ingredient_from_fridge(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;
    let ingredient_id = parse_id(&id, "ingredient")?;

    if !FridgeRepo::remove_ingredient(&state.pool, user_id, ingredient_id).await? {
        return Err(ApiError::NotFound(
            "Ingredient not in fridge".to_string(),
        ));
    }

    Ok(Json(json!({"removed": true})))
}
