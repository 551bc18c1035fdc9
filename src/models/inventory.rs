use serde::{Deserialize, Serialize};

/// Inventory row; every user owns exactly one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inventory {
    #[serde(rename = "ID_Inventory")]
    #[sqlx(rename = "ID_Inventory")]
    pub id: i64,
    #[serde(rename = "ID_User")]
    #[sqlx(rename = "ID_User")]
    pub user_id: i64,
}

/// One inventory line joined with its item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryEntry {
    #[serde(rename = "ID_Item")]
    #[sqlx(rename = "ID_Item")]
    pub item_id: i64,
    #[serde(rename = "Name")]
    #[sqlx(rename = "Name")]
    pub name: String,
    #[serde(rename = "Image_Path")]
    #[sqlx(rename = "Image_Path")]
    pub image_path: String,
    #[serde(rename = "Quantity")]
    #[sqlx(rename = "Quantity")]
    pub quantity: i64,
}
