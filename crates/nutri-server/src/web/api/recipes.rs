use crate::state::AppState;
use crate::web::api::extract::{Json, Query};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::api::middleware::AuthUser;
use crate::web::api::{parse_id, ListQuery};
use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use nutri_common::models::food::{Ingredient, MealType, Recipe, RecipeDetail};
use nutri_common::validation::{normalize_ingredient_names, validate_recipe_name};
use nutri_db::{NewRecipe, RecipeRepo, RecipeRow};
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub preparation: Option<String>,
    pub meal_type: Option<String>,
    pub instructions: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetIngredientsRequest {
    pub ingredients: Vec<String>,
}

/// Attach ingredient sets to recipe rows, preserving row order
pub(crate) async fn load_recipe_details(
    pool: &PgPool,
    rows: Vec<RecipeRow>,
) -> Result<Vec<RecipeDetail>> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.recipe_id).collect();
    let mut by_recipe: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
    for row in RecipeRepo::ingredients_for_recipes(pool, &ids).await? {
        by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(Ingredient::from(row.ingredient));
    }

    rows.into_iter()
        .map(|row| -> Result<RecipeDetail> {
            let ingredients = by_recipe.remove(&row.recipe_id).unwrap_or_default();
            Ok(RecipeDetail::new(Recipe::try_from(row)?, ingredients))
        })
        .collect()
}

async fn load_recipe_detail(pool: &PgPool, recipe_id: Uuid) -> ApiResult<RecipeDetail> {
    let row = RecipeRepo::get(pool, recipe_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;
    let mut details = load_recipe_details(pool, vec![row]).await?;
    details
        .pop()
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))
}

/// GET /api/recipes
#[tracing::instrument(skip(state, _auth))]
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    query.validate()?;
    let rows = RecipeRepo::list(&state.pool, query.limit, query.offset).await?;
    let recipes = rows
        .into_iter()
        .map(Recipe::try_from)
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(recipes))
}

/// POST /api/recipes
#[tracing::instrument(skip(state, _auth))]
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(req): Json<CreateRecipeRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_recipe_name(&req.name).map_err(ApiError::invalid)?;
    let meal_type = req
        .meal_type
        .as_deref()
        .map(str::parse::<MealType>)
        .transpose()
        .map_err(ApiError::invalid)?;
    let names = normalize_ingredient_names(&req.ingredients).map_err(ApiError::invalid)?;

    let recipe = NewRecipe {
        name: req.name.trim().to_string(),
        preparation: req.preparation,
        meal_type,
        instructions: req.instructions,
    };
    let recipe_id = RecipeRepo::create(&state.pool, &recipe, &names).await?;
    tracing::info!("Created recipe {} with {} ingredient(s)", recipe_id, names.len());

    let detail = load_recipe_detail(&state.pool, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/recipes/{id}
#[tracing::instrument(skip(state, _auth))]
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let recipe_id = parse_id(&id, "recipe")?;
    Ok(Json(load_recipe_detail(&state.pool, recipe_id).await?))
}

/// PUT /api/recipes/{id}/ingredients - replace the ingredient set
#[tracing::instrument(skip(state, _auth))]
pub async fn set_recipe_ingredients(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SetIngredientsRequest>,
) -> ApiResult<impl IntoResponse> {
    let recipe_id = parse_id(&id, "recipe")?;
    let names = normalize_ingredient_names(&req.ingredients).map_err(ApiError::invalid)?;

    if !RecipeRepo::set_ingredients(&state.pool, recipe_id, &names).await? {
        return Err(ApiError::NotFound("Recipe not found".to_string()));
    }

    Ok(Json(load_recipe_detail(&state.pool, recipe_id).await?))
}
