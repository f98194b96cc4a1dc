use crate::auth::{hash_password, verify_password};
use crate::state::AppState;
use crate::web::api::extract::Json;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::api::middleware::AuthUser;
use axum::{extract::State, response::IntoResponse};
use chrono::Utc;
use nutri_common::models::user::{ProfileUpdate, UserProfile};
use nutri_common::validation::{validate_password, validate_profile};
use nutri_db::UserRepo;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// Validate and persist a profile update for the caller, returning the new profile
pub(crate) async fn apply_profile_update(
    state: &AppState,
    auth: &AuthUser,
    update: &ProfileUpdate,
) -> ApiResult<Json<UserProfile>> {
    let user_id = auth.user_id()?;
    if update.is_empty() {
        return Err(ApiError::BadRequest("No profile fields provided".to_string()));
    }
    validate_profile(update, Utc::now().date_naive()).map_err(ApiError::invalid)?;

    let row = UserRepo::update_profile(&state.pool, user_id, update)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(UserProfile::from(row)))
}

/// GET /api/user
#[tracing::instrument(skip(state))]
pub async fn get_user_info(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;
    let row = UserRepo::get_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(UserProfile::from(row)))
}

/// POST /api/user/info
#[tracing::instrument(skip(state, req))]
pub async fn update_user_info(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<ProfileUpdate>,
) -> ApiResult<impl IntoResponse> {
    apply_profile_update(&state, &auth, &req).await
}

/// POST /api/user/password
#[tracing::instrument(skip(state, req))]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;
    validate_password(&req.new_password).map_err(ApiError::invalid)?;

    let password_hash = hash_password(&req.new_password)?;
    if !UserRepo::set_password_hash(&state.pool, user_id, &password_hash).await? {
        return Err(user_not_found());
    }

    tracing::info!("Password changed for {}", user_id);
    Ok(Json(json!({"status": "ok"})))
}

/// DELETE /api/user - requires the current password
#[tracing::instrument(skip(state, req))]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<DeleteAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;
    let user = UserRepo::get_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(user_not_found)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Forbidden("Incorrect password".to_string()));
    }

    if !UserRepo::delete(&state.pool, user_id).await? {
        return Err(user_not_found());
    }

    tracing::info!("Deleted account {}", user_id);
    Ok(Json(json!({"deleted": true})))
}
