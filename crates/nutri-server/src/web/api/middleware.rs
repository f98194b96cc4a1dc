use crate::auth::validate_access_token;
use crate::state::AppState;
use crate::web::api::error::ApiError;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use nutri_common::models::auth::Claims;
use std::sync::Arc;
use uuid::Uuid;

/// Extractor that validates a JWT Bearer token and provides the claims.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        self.0
            .sub
            .parse()
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid authorization header format".to_string())
        })?;

        validate_access_token(token, &state.config.auth.jwt_secret)
            .map(AuthUser)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))
    }
}
