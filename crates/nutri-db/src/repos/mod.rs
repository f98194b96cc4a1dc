pub mod fridge;
pub mod ingredient;
pub mod recipe;
pub mod refresh_token;
pub mod schedule;
pub mod user;
