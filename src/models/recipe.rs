use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::{GRID_CELLS, GRID_SIZE};
use crate::error::{AppError, Result};
use crate::models::validation::{is_missing, Validation};
use crate::models::Item;

/// Recipe row as stored in the RECIPE table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    #[serde(rename = "ID_Recipe")]
    #[sqlx(rename = "ID_Recipe")]
    pub id: i64,
    #[serde(rename = "ID_Item_Result")]
    #[sqlx(rename = "ID_Item_Result")]
    pub result_item_id: i64,
}

/// One ingredient joined with its item, as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngredientView {
    #[serde(rename = "ID_Item")]
    #[sqlx(rename = "ID_Item")]
    pub item_id: i64,
    #[serde(rename = "Position")]
    #[sqlx(rename = "Position")]
    pub position: i64,
    #[serde(rename = "Name")]
    #[sqlx(rename = "Name")]
    pub name: String,
    #[serde(rename = "Image_Path")]
    #[sqlx(rename = "Image_Path")]
    pub image_path: String,
}

/// Denormalized recipe: the result item plus ingredients ordered by position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(rename = "ID_Recipe")]
    pub id: i64,
    #[serde(rename = "ID_Item_Result")]
    pub result_item_id: i64,
    #[serde(rename = "Result")]
    pub result: Item,
    #[serde(rename = "Ingredients")]
    pub ingredients: Vec<IngredientView>,
}

/// Flat recipe/ingredient join row used by the recipe overview listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecipeIngredientRow {
    #[serde(rename = "ID_Recipe")]
    #[sqlx(rename = "ID_Recipe")]
    pub recipe_id: i64,
    #[serde(rename = "ID_Item_Result")]
    #[sqlx(rename = "ID_Item_Result")]
    pub result_item_id: i64,
    #[serde(rename = "ID_Item")]
    #[sqlx(rename = "ID_Item")]
    pub item_id: i64,
    #[serde(rename = "Name")]
    #[sqlx(rename = "Name")]
    pub name: String,
    #[serde(rename = "Position")]
    #[sqlx(rename = "Position")]
    pub position: i64,
}

/// Recipe body for create and update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePayload {
    /// `None` only when the field is absent; an explicit `null` is kept
    #[serde(rename = "ID_Item_Result", default, deserialize_with = "present")]
    pub result_item_id: Option<Value>,
    pub ingredients: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewIngredient {
    pub item_id: i64,
    pub position: i64,
}

/// A validated recipe with its full ingredient set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub result_item_id: i64,
    pub ingredients: Vec<NewIngredient>,
}

// =============================================================================
// Crafting grid
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid position {0}: must be between 1 and 9")]
pub struct PositionOutOfRange(pub i64);

/// Cell of the 3x3 crafting grid, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i64,
    pub y: i64,
}

impl GridPosition {
    /// Convert a 1-based position into grid coordinates
    pub fn from_position(position: i64) -> std::result::Result<Self, PositionOutOfRange> {
        if !(1..=GRID_CELLS).contains(&position) {
            return Err(PositionOutOfRange(position));
        }

        let index = position - 1;
        Ok(Self {
            x: index % GRID_SIZE,
            y: index / GRID_SIZE,
        })
    }

    /// Inverse of [`GridPosition::from_position`]
    pub fn position(self) -> std::result::Result<i64, PositionOutOfRange> {
        let in_grid = |v: i64| (0..GRID_SIZE).contains(&v);
        if !in_grid(self.x) || !in_grid(self.y) {
            return Err(PositionOutOfRange(self.y * GRID_SIZE + self.x + 1));
        }
        Ok(self.y * GRID_SIZE + self.x + 1)
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Key used to detect duplicate positions; missing positions share one key
fn position_key(position: Option<&Value>) -> String {
    match position {
        None => "undefined".to_string(),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(|f| f.to_string())
            .unwrap_or_else(|| n.to_string()),
        Some(other) => other.to_string(),
    }
}

fn check_result_item(value: Option<&Value>, errors: &mut Vec<String>) -> Option<i64> {
    let Some(value) = value else {
        errors.push("Result item ID is required".to_string());
        return None;
    };

    if !value.is_number() {
        errors.push("Result item ID must be a number".to_string());
        return None;
    }

    match value.as_i64() {
        Some(id) if id > 0 => Some(id),
        Some(_) => {
            errors.push("Result item ID must be a positive number".to_string());
            None
        }
        None => {
            errors.push("Result item ID must be an integer".to_string());
            None
        }
    }
}

fn check_ingredient(ingredient: &Value, number: usize, errors: &mut Vec<String>) -> Option<NewIngredient> {
    let item_id = ingredient.get("ID_Item");
    let item_id = if is_missing(item_id) {
        errors.push(format!("Item ID is required for ingredient #{}", number));
        None
    } else {
        match item_id.and_then(Value::as_i64) {
            Some(id) => Some(id),
            None => {
                errors.push(format!("Item ID must be a number for ingredient #{}", number));
                None
            }
        }
    };

    let position = ingredient.get("Position");
    let position = if is_missing(position) {
        errors.push(format!("Position is required for ingredient #{}", number));
        None
    } else {
        match position.and_then(Value::as_i64) {
            Some(p) if (1..=GRID_CELLS).contains(&p) => Some(p),
            Some(_) => {
                errors.push(format!(
                    "Position must be between 1 and {} for ingredient #{}",
                    GRID_CELLS, number
                ));
                None
            }
            None => {
                errors.push(format!("Position must be a number for ingredient #{}", number));
                None
            }
        }
    };

    Some(NewIngredient {
        item_id: item_id?,
        position: position?,
    })
}

fn check_payload(payload: &RecipePayload, errors: &mut Vec<String>) -> Option<NewRecipe> {
    let result_item_id = check_result_item(payload.result_item_id.as_ref(), errors);

    let ingredients = match payload.ingredients.as_ref().and_then(Value::as_array) {
        None => {
            errors.push("Ingredients must be provided as an array".to_string());
            None
        }
        Some(list) if list.is_empty() => {
            errors.push("The recipe must contain at least one ingredient".to_string());
            None
        }
        Some(list) => {
            let positions: HashSet<String> = list
                .iter()
                .map(|ingredient| position_key(ingredient.get("Position")))
                .collect();
            let has_duplicates = positions.len() != list.len();
            if has_duplicates {
                errors.push("Ingredient positions must be unique".to_string());
            }

            let checked: Vec<Option<NewIngredient>> = list
                .iter()
                .enumerate()
                .map(|(index, ingredient)| check_ingredient(ingredient, index + 1, errors))
                .collect();

            if has_duplicates {
                None
            } else {
                checked.into_iter().collect::<Option<Vec<_>>>()
            }
        }
    };

    Some(NewRecipe {
        result_item_id: result_item_id?,
        ingredients: ingredients?,
    })
}

/// Validate a recipe payload without side effects
pub fn validate_recipe(payload: &RecipePayload) -> Validation {
    let mut errors = Vec::new();
    check_payload(payload, &mut errors);
    Validation::from_errors(errors)
}

impl RecipePayload {
    /// Validate and convert the client's `ingredients` list into a full
    /// ingredient set
    pub fn into_new_recipe(self) -> Result<NewRecipe> {
        let mut errors = Vec::new();
        match check_payload(&self, &mut errors) {
            Some(recipe) => Ok(recipe),
            None => Err(AppError::Validation(errors)),
        }
    }
}

impl NewRecipe {
    /// Result item first, then ingredient items, without repeats
    pub fn referenced_item_ids(&self) -> Vec<i64> {
        let mut seen = HashSet::new();
        std::iter::once(self.result_item_id)
            .chain(self.ingredients.iter().map(|i| i.item_id))
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> RecipePayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_grid_position_corners_and_center() {
        assert_eq!(GridPosition::from_position(1), Ok(GridPosition { x: 0, y: 0 }));
        assert_eq!(GridPosition::from_position(5), Ok(GridPosition { x: 1, y: 1 }));
        assert_eq!(GridPosition::from_position(9), Ok(GridPosition { x: 2, y: 2 }));
    }

    #[test]
    fn test_grid_position_formula() {
        for p in 1..=9 {
            let cell = GridPosition::from_position(p).unwrap();
            assert_eq!(cell.x, (p - 1) % 3);
            assert_eq!(cell.y, (p - 1) / 3);
            assert_eq!(cell.position(), Ok(p));
        }
    }

    #[test]
    fn test_grid_position_out_of_range() {
        assert_eq!(GridPosition::from_position(0), Err(PositionOutOfRange(0)));
        assert_eq!(GridPosition::from_position(10), Err(PositionOutOfRange(10)));
        assert!(GridPosition::from_position(-1).is_err());
        assert!(GridPosition { x: 3, y: 0 }.position().is_err());
    }

    #[test]
    fn test_valid_recipe() {
        let recipe = payload(json!({
            "ID_Item_Result": 11,
            "ingredients": [
                { "ID_Item": 3, "Position": 1 },
                { "ID_Item": 3, "Position": 2 }
            ]
        }))
        .into_new_recipe()
        .unwrap();

        assert_eq!(recipe.result_item_id, 11);
        assert_eq!(
            recipe.ingredients,
            vec![
                NewIngredient { item_id: 3, position: 1 },
                NewIngredient { item_id: 3, position: 2 }
            ]
        );
        assert_eq!(recipe.referenced_item_ids(), vec![11, 3]);
    }

    #[test]
    fn test_duplicate_positions_rejected() {
        let result = validate_recipe(&payload(json!({
            "ID_Item_Result": 11,
            "ingredients": [
                { "ID_Item": 3, "Position": 4 },
                { "ID_Item": 5, "Position": 4 }
            ]
        })));

        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Ingredient positions must be unique"]);
    }

    #[test]
    fn test_duplicate_positions_rejected_with_other_errors() {
        let result = validate_recipe(&payload(json!({
            "ingredients": [
                { "Position": 2 },
                { "ID_Item": "x", "Position": 2 }
            ]
        })));

        assert!(result
            .errors
            .contains(&"Ingredient positions must be unique".to_string()));
        assert!(result.errors.contains(&"Result item ID is required".to_string()));
        assert!(result
            .errors
            .contains(&"Item ID is required for ingredient #1".to_string()));
        assert!(result
            .errors
            .contains(&"Item ID must be a number for ingredient #2".to_string()));
    }

    #[test]
    fn test_result_item_rules() {
        let negative = validate_recipe(&payload(json!({
            "ID_Item_Result": -1,
            "ingredients": [{ "ID_Item": 1, "Position": 1 }]
        })));
        assert_eq!(negative.errors, vec!["Result item ID must be a positive number"]);

        let text = validate_recipe(&payload(json!({
            "ID_Item_Result": "1",
            "ingredients": [{ "ID_Item": 1, "Position": 1 }]
        })));
        assert_eq!(text.errors, vec!["Result item ID must be a number"]);

        let null = validate_recipe(&payload(json!({
            "ID_Item_Result": null,
            "ingredients": [{ "ID_Item": 1, "Position": 1 }]
        })));
        assert_eq!(null.errors, vec!["Result item ID must be a number"]);

        let absent = validate_recipe(&payload(json!({
            "ingredients": [{ "ID_Item": 1, "Position": 1 }]
        })));
        assert_eq!(absent.errors, vec!["Result item ID is required"]);
    }

    #[test]
    fn test_ingredients_shape() {
        let missing = validate_recipe(&payload(json!({ "ID_Item_Result": 1 })));
        assert_eq!(missing.errors, vec!["Ingredients must be provided as an array"]);

        let empty = validate_recipe(&payload(json!({ "ID_Item_Result": 1, "ingredients": [] })));
        assert_eq!(empty.errors, vec!["The recipe must contain at least one ingredient"]);
    }

    #[test]
    fn test_position_range() {
        let result = validate_recipe(&payload(json!({
            "ID_Item_Result": 1,
            "ingredients": [
                { "ID_Item": 1, "Position": 10 },
                { "ID_Item": 1, "Position": 0 }
            ]
        })));

        assert_eq!(
            result.errors,
            vec![
                "Position must be between 1 and 9 for ingredient #1",
                "Position is required for ingredient #2"
            ]
        );
    }
}
