use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Meal slot a recipe or schedule belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match MealType::ALL.iter().find(|m| m.as_str() == s) {
            Some(m) => Ok(*m),
            None => bail!(
                "Invalid meal_type '{}' (expected one of Breakfast, Lunch, Dinner, Snack)",
                s
            ),
        }
    }
}

/// Shared ingredient with its nutritional data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub ingredient_id: Uuid,
    pub name: String,
    pub nutritional_information: Option<String>,
    pub calories: i32,
}

/// Recipe without its ingredient set (used in listings)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub recipe_id: Uuid,
    pub name: String,
    pub preparation: Option<String>,
    pub meal_type: Option<MealType>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Recipe together with its full ingredient set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
    pub total_calories: i64,
}

impl RecipeDetail {
    pub fn new(recipe: Recipe, ingredients: Vec<Ingredient>) -> Self {
        let total_calories = ingredients.iter().map(|i| i64::from(i.calories)).sum();
        Self {
            recipe,
            ingredients,
            total_calories,
        }
    }
}

/// A user's fridge contents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fridge {
    pub fridge_id: Option<Uuid>,
    pub ingredients: Vec<Ingredient>,
}

/// Planned meal with the recipes it references
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub schedule_id: Uuid,
    pub user_id: Uuid,
    pub meal_type: MealType,
    pub date_and_time: DateTime<Utc>,
    pub recipes: Vec<RecipeDetail>,
}
