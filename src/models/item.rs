use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{IMAGE_EXTENSIONS, ITEM_NAME_MAX_LEN, ITEM_NAME_MIN_LEN};
use crate::error::{AppError, Result};
use crate::models::validation::{char_len, check_string, Validation};

/// Item row as stored in the ITEM table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    #[serde(rename = "ID_Item")]
    #[sqlx(rename = "ID_Item")]
    pub id: i64,
    #[serde(rename = "Name")]
    #[sqlx(rename = "Name")]
    pub name: String,
    #[serde(rename = "Image_Path")]
    #[sqlx(rename = "Image_Path")]
    pub image_path: String,
}

/// Item body for create and update, kept loose so type errors become
/// validation messages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPayload {
    #[serde(rename = "Name")]
    pub name: Option<Value>,
    #[serde(rename = "Image_Path")]
    pub image_path: Option<Value>,
}

/// A validated item, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub image_path: String,
}

pub fn has_image_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn check_payload(payload: &ItemPayload, errors: &mut Vec<String>) -> Option<NewItem> {
    let name = check_string(
        payload.name.as_ref(),
        errors,
        "Name is required",
        "Name must be a string",
        |name| match char_len(name) {
            len if len < ITEM_NAME_MIN_LEN => Some(format!(
                "Name must be at least {} characters long",
                ITEM_NAME_MIN_LEN
            )),
            len if len > ITEM_NAME_MAX_LEN => Some(format!(
                "Name cannot exceed {} characters",
                ITEM_NAME_MAX_LEN
            )),
            _ => None,
        },
    );

    let image_path = check_string(
        payload.image_path.as_ref(),
        errors,
        "Image path is required",
        "Image path must be a string",
        |path| {
            (!has_image_extension(path)).then(|| {
                "Image path must have a valid extension (.jpg, .png, .gif, .webp)".to_string()
            })
        },
    );

    Some(NewItem {
        name: name?.to_string(),
        image_path: image_path?.to_string(),
    })
}

/// Validate an item payload without side effects
pub fn validate_item(payload: &ItemPayload) -> Validation {
    let mut errors = Vec::new();
    check_payload(payload, &mut errors);
    Validation::from_errors(errors)
}

impl ItemPayload {
    /// Validate and convert, failing with every accumulated message
    pub fn into_new_item(self) -> Result<NewItem> {
        let mut errors = Vec::new();
        match check_payload(&self, &mut errors) {
            Some(item) => Ok(item),
            None => Err(AppError::Validation(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> ItemPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_item() {
        for (name, path) in [
            ("Stone", "images/items/stone.png"),
            ("Ok", "a.JPG"),
            ("Diamond Pickaxe", "pickaxe.webp"),
            ("Torch", "torch.gif"),
        ] {
            let result = validate_item(&payload(json!({ "Name": name, "Image_Path": path })));
            assert!(result.is_valid, "{} should be valid", name);
            assert!(result.errors.is_empty());
        }
    }

    #[test]
    fn test_name_length_bounds() {
        let at_max = "a".repeat(ITEM_NAME_MAX_LEN);
        let over_max = "a".repeat(ITEM_NAME_MAX_LEN + 1);

        assert!(validate_item(&payload(json!({ "Name": at_max, "Image_Path": "x.png" }))).is_valid);

        let result = validate_item(&payload(json!({ "Name": over_max, "Image_Path": "x.png" })));
        assert_eq!(result.errors, vec!["Name cannot exceed 100 characters"]);

        let result = validate_item(&payload(json!({ "Name": "a", "Image_Path": "x.png" })));
        assert_eq!(result.errors, vec!["Name must be at least 2 characters long"]);
    }

    #[test]
    fn test_missing_fields_accumulate() {
        let result = validate_item(&ItemPayload::default());

        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Name is required", "Image path is required"]
        );
    }

    #[test]
    fn test_wrong_types() {
        let result = validate_item(&payload(json!({ "Name": 12, "Image_Path": ["a.png"] })));

        assert_eq!(
            result.errors,
            vec!["Name must be a string", "Image path must be a string"]
        );
    }

    #[test]
    fn test_invalid_extension() {
        let result = validate_item(&payload(json!({ "Name": "Stone", "Image_Path": "stone.bmp" })));

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("valid extension"));
    }

    #[test]
    fn test_into_new_item() {
        let item = payload(json!({ "Name": "Stone", "Image_Path": "stone.png" }))
            .into_new_item()
            .unwrap();

        assert_eq!(item.name, "Stone");
        assert_eq!(item.image_path, "stone.png");
    }
}
