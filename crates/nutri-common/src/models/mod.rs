pub mod auth;
pub mod food;
pub mod user;
