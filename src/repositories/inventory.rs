use sqlx::SqliteConnection;

use crate::models::{Inventory, InventoryEntry};

pub async fn create_inventory(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Inventory, sqlx::Error> {
    sqlx::query_as::<_, Inventory>("INSERT INTO INVENTORY (ID_User) VALUES (?) RETURNING *")
        .bind(user_id)
        .fetch_one(conn)
        .await
}

/// Inventory lines of a user joined with their items
pub async fn list_entries_by_user_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<InventoryEntry>, sqlx::Error> {
    sqlx::query_as::<_, InventoryEntry>(
        "SELECT ii.ID_Item, it.Name, it.Image_Path, ii.Quantity
           FROM INVENTORY i
           JOIN ITEM_INV ii ON i.ID_Inventory = ii.ID_Inventory
           JOIN ITEM it ON ii.ID_Item = it.ID_Item
          WHERE i.ID_User = ?
          ORDER BY ii.ID_Item",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}

/// Set the quantity of an item in an inventory, adding the line if needed
pub async fn upsert_line(
    conn: &mut SqliteConnection,
    inventory_id: i64,
    item_id: i64,
    quantity: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO ITEM_INV (ID_Inventory, ID_Item, Quantity) VALUES (?, ?, ?)
         ON CONFLICT (ID_Inventory, ID_Item) DO UPDATE SET Quantity = excluded.Quantity",
    )
    .bind(inventory_id)
    .bind(item_id)
    .bind(quantity)
    .execute(conn)
    .await?;
    Ok(())
}

/// Deletes the inventory; its lines go with it (ON DELETE CASCADE)
pub async fn delete_inventory_by_user_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM INVENTORY WHERE ID_User = ?")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
