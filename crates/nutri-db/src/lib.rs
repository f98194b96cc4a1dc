pub mod pool;
pub mod repos;

// Re-export commonly used items
pub use pool::{create_pool, run_migrations};
pub use repos::fridge::{FridgeRepo, FridgeRow};
pub use repos::ingredient::{IngredientRepo, IngredientRow};
pub use repos::recipe::{NewRecipe, RecipeIngredientRow, RecipeRepo, RecipeRow};
pub use repos::refresh_token::{RefreshTokenRepo, RefreshTokenRow};
pub use repos::schedule::{ScheduleRecipeRow, ScheduleRepo, ScheduleRow};
pub use repos::user::{UserRepo, UserRow};
