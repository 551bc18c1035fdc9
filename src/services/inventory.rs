use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::InventoryEntry;
use crate::repositories::{inventory as repo, users};

/// Items held by a user
///
/// An unknown user is a 404; a known user who owns nothing gets an empty
/// list.
pub async fn get_inventory_by_user_id(db: &Db, user_id: i64) -> Result<Vec<InventoryEntry>> {
    let mut conn = db.acquire().await?;

    if users::find_user_by_id(&mut conn, user_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Inventory for user {} not found",
            user_id
        )));
    }

    Ok(repo::list_entries_by_user_id(&mut conn, user_id).await?)
}
