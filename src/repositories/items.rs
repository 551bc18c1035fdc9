use sqlx::SqliteConnection;

use crate::models::{Item, NewItem};

pub async fn list_items(conn: &mut SqliteConnection) -> Result<Vec<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>("SELECT * FROM ITEM ORDER BY ID_Item")
        .fetch_all(conn)
        .await
}

pub async fn find_item_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>("SELECT * FROM ITEM WHERE ID_Item = ?")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn insert_item(conn: &mut SqliteConnection, item: &NewItem) -> Result<Item, sqlx::Error> {
    sqlx::query_as::<_, Item>("INSERT INTO ITEM (Name, Image_Path) VALUES (?, ?) RETURNING *")
        .bind(&item.name)
        .bind(&item.image_path)
        .fetch_one(conn)
        .await
}

/// Returns `None` when no row has this id
pub async fn update_item(
    conn: &mut SqliteConnection,
    id: i64,
    item: &NewItem,
) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        "UPDATE ITEM SET Name = ?, Image_Path = ? WHERE ID_Item = ? RETURNING *",
    )
    .bind(&item.name)
    .bind(&item.image_path)
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Returns the number of deleted rows
pub async fn delete_item(conn: &mut SqliteConnection, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ITEM WHERE ID_Item = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn item_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ITEM WHERE ID_Item = ?")
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

/// True when a recipe uses the item as an ingredient or produces it
pub async fn is_item_used_in_recipes(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM ITEM_RECIPE WHERE ID_Item = ?1)
              + (SELECT COUNT(*) FROM RECIPE WHERE ID_Item_Result = ?1)",
    )
    .bind(id)
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}
