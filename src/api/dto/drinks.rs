/*
 * Responsibility
 * - drink request/response DTOs and recipe validation
 * - the two projections of a drink:
 *   - short: color/parts per ingredient, for the public listing
 *   - long: name/color/parts, for authorized callers
 *
 * The short projection must never expose ingredient names; that is the one
 * product rule this service actually has.
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::repos::drink_repo::DrinkRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: i64,
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl DrinkLong {
    pub fn from_row(row: DrinkRow) -> Result<Self, AppError> {
        let recipe = stored_recipe(&row.recipe)?;

        Ok(Self {
            id: row.drink_id,
            title: row.title,
            recipe,
        })
    }
}

impl DrinkShort {
    pub fn from_row(row: DrinkRow) -> Result<Self, AppError> {
        let recipe = stored_recipe(&row.recipe)?
            .into_iter()
            .map(|i| ShortIngredient {
                color: i.color,
                parts: i.parts,
            })
            .collect();

        Ok(Self {
            id: row.drink_id,
            title: row.title,
            recipe,
        })
    }
}

// A recipe column that does not parse back is corrupt data, not client error.
fn stored_recipe(recipe: &str) -> Result<Vec<Ingredient>, AppError> {
    serde_json::from_str(recipe).map_err(|_| AppError::Internal)
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Value>,
}

impl CreateDrinkRequest {
    /// Both fields are required; the recipe must be a well-formed
    /// ingredient list. Anything else is a 422.
    pub fn validate(self) -> Result<(String, Vec<Ingredient>), AppError> {
        let title = self.title.ok_or(AppError::Unprocessable)?;
        let recipe = self.recipe.ok_or(AppError::Unprocessable)?;

        Ok((title, parse_recipe(recipe)?))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Value>,
}

impl UpdateDrinkRequest {
    /// Either field may be omitted, but not both. A present recipe is
    /// validated like on create.
    pub fn validate(self) -> Result<(Option<String>, Option<Vec<Ingredient>>), AppError> {
        if self.title.is_none() && self.recipe.is_none() {
            return Err(AppError::Unprocessable);
        }

        let recipe = self.recipe.map(parse_recipe).transpose()?;

        Ok((self.title, recipe))
    }
}

// Recipe must be a list and every element must carry name/color/parts.
fn parse_recipe(value: Value) -> Result<Vec<Ingredient>, AppError> {
    let items = match value {
        Value::Array(items) => items,
        _ => return Err(AppError::Unprocessable),
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value::<Ingredient>(item).map_err(|_| AppError::Unprocessable))
        .collect()
}
