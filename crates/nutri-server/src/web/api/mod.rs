pub mod account;
pub mod auth;
pub mod error;
pub mod extract;
pub mod fridge;
pub mod ingredients;
pub mod middleware;
pub mod recipes;
pub mod schedules;

use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use error::ApiError;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

impl ListQuery {
    /// Paging values must be non-negative
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.limit < 0 || self.offset < 0 {
            return Err(ApiError::BadRequest(
                "limit and offset must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a path id, reporting which kind of id was malformed
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    raw.parse::<Uuid>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} ID", what)))
}

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth routes
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signup/follow", post(auth::signup_follow))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/signout", post(auth::signout))
        // Current user
        .route(
            "/user",
            get(account::get_user_info).delete(account::delete_account),
        )
        .route("/user/info", post(account::update_user_info))
        .route("/user/password", post(account::change_password))
        // Fridge
        .route("/fridge", get(fridge::get_fridge))
        .route("/fridge/ingredients", post(fridge::add_ingredients_to_fridge))
        .route(
            "/fridge/ingredients/{id}",
            axum::routing::delete(fridge::remove_ingredient_from_fridge),
        )
        // Shared catalog
        .route(
            "/ingredients",
            get(ingredients::list_ingredients).post(ingredients::create_ingredient),
        )
        .route("/ingredients/{id}", get(ingredients::get_ingredient))
        .route(
            "/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route("/recipes/{id}", get(recipes::get_recipe))
        .route(
            "/recipes/{id}/ingredients",
            put(recipes::set_recipe_ingredients),
        )
        // Meal schedule
        .route(
            "/schedules",
            get(schedules::list_schedules).post(schedules::create_schedule),
        )
        .route(
            "/schedules/{id}",
            get(schedules::get_schedule).delete(schedules::delete_schedule),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "recipe").unwrap(), id);
        let err = parse_id("not-a-uuid", "recipe").unwrap_err();
        assert_eq!(err.to_string(), "Invalid recipe ID");
    }

    #[test]
    fn test_list_query_rejects_negative_paging() {
        let query = |limit, offset| ListQuery { limit, offset };
        assert!(query(50, 0).validate().is_ok());
        assert!(query(0, 0).validate().is_ok());
        assert!(query(-1, 0).validate().is_err());
        assert!(query(10, -5).validate().is_err());
    }
}
