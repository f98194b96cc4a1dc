use crate::auth::{
    create_access_token, generate_refresh_token, hash_password, hash_refresh_token,
    verify_dummy_password, verify_password,
};
use crate::state::AppState;
use crate::web::api::account::apply_profile_update;
use crate::web::api::extract::Json;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::api::middleware::AuthUser;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use nutri_common::models::auth::TokenPair;
use nutri_common::models::user::ProfileUpdate;
use nutri_common::validation::{validate_email, validate_password, validate_username};
use nutri_db::{RefreshTokenRepo, UserRepo};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Issue an access token and store a fresh refresh token for the user
async fn issue_tokens(state: &AppState, user_id: Uuid, username: &str) -> ApiResult<TokenPair> {
    let auth = &state.config.auth;
    let access_token = create_access_token(
        &user_id.to_string(),
        username,
        &auth.jwt_secret,
        auth.access_token_ttl_secs,
    )?;

    let (raw_refresh, refresh_hash) = generate_refresh_token();
    let expires_at = Utc::now() + Duration::days(auth.refresh_token_ttl_days);
    RefreshTokenRepo::create(&state.pool, &refresh_hash, user_id, expires_at).await?;

    Ok(TokenPair {
        access_token,
        refresh_token: raw_refresh,
    })
}

/// POST /api/auth/signup
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_username(&req.username).map_err(ApiError::invalid)?;
    validate_email(&req.email).map_err(ApiError::invalid)?;
    validate_password(&req.password).map_err(ApiError::invalid)?;

    let password_hash = hash_password(&req.password)?;
    let user_id = Uuid::new_v4();

    let created =
        UserRepo::create(&state.pool, user_id, &req.username, &req.email, &password_hash).await?;
    if !created {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    tracing::info!("Created user {}", user_id);
    Ok((
        StatusCode::CREATED,
        Json(json!({"created": true, "user_id": user_id})),
    ))
}

/// POST /api/auth/signup/follow - extended profile after signup
#[tracing::instrument(skip(state, req))]
pub async fn signup_follow(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<ProfileUpdate>,
) -> ApiResult<impl IntoResponse> {
    apply_profile_update(&state, &auth, &req).await
}

/// POST /api/auth/signin
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SigninRequest>,
) -> ApiResult<impl IntoResponse> {
    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let Some(user) = UserRepo::get_by_username(&state.pool, &req.username).await? else {
        verify_dummy_password(&req.password);
        return Err(invalid());
    };

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    if let Err(e) = UserRepo::touch_last_login(&state.pool, user.user_id).await {
        tracing::warn!("Failed to record login for {}: {:#}", user.user_id, e);
    }

    let tokens = issue_tokens(&state, user.user_id, &user.username).await?;
    Ok(Json(tokens))
}

/// POST /api/auth/refresh
#[tracing::instrument(skip(state, req))]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<impl IntoResponse> {
    let token_hash = hash_refresh_token(&req.refresh_token);

    let token_row = RefreshTokenRepo::get_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

    // Rotation: the old token is single-use
    let deleted = RefreshTokenRepo::delete(&state.pool, &token_hash).await?;
    if !deleted {
        return Err(ApiError::Unauthorized("Invalid refresh token".to_string()));
    }

    if token_row.expires_at < Utc::now() {
        return Err(ApiError::Unauthorized("Refresh token expired".to_string()));
    }

    let user = UserRepo::get_by_id(&state.pool, token_row.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    let tokens = issue_tokens(&state, user.user_id, &user.username).await?;
    Ok(Json(tokens))
}

/// POST /api/auth/signout - revoke every refresh token of the caller
#[tracing::instrument(skip(state))]
pub async fn signout(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id()?;
    let revoked = RefreshTokenRepo::delete_all_for_user(&state.pool, user_id).await?;
    tracing::debug!("Revoked {} refresh token(s) for {}", revoked, user_id);
    Ok(Json(json!({"status": "ok"})))
}
