use crate::constants::ERR_ITEM_USED_IN_RECIPES;
use crate::db::{begin_write, Db};
use crate::error::{AppError, Result};
use crate::models::{Item, ItemPayload, User};
use crate::repositories::items as repo;

pub(crate) fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Item with ID {} not found", id))
}

pub async fn list_items(db: &Db) -> Result<Vec<Item>> {
    let mut conn = db.acquire().await?;
    Ok(repo::list_items(&mut conn).await?)
}

pub async fn get_item(db: &Db, id: i64) -> Result<Item> {
    let mut conn = db.acquire().await?;
    repo::find_item_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn create_item(db: &Db, actor: &User, payload: ItemPayload) -> Result<Item> {
    let item = payload.into_new_item()?;

    let mut conn = db.acquire().await?;
    let created = repo::insert_item(&mut conn, &item).await?;

    tracing::info!(actor = actor.id, item_id = created.id, "Item created");
    Ok(created)
}

/// Existence is checked before the payload is validated
pub async fn update_item(db: &Db, actor: &User, id: i64, payload: ItemPayload) -> Result<Item> {
    let mut conn = db.acquire().await?;
    if !repo::item_exists(&mut conn, id).await? {
        return Err(not_found(id));
    }

    let item = payload.into_new_item()?;
    let updated = repo::update_item(&mut conn, id, &item)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(actor = actor.id, item_id = id, "Item updated");
    Ok(updated)
}

/// Refuses to delete an item any recipe still relies on
pub async fn delete_item(db: &Db, actor: &User, id: i64) -> Result<()> {
    let mut tx = begin_write(db).await?;
    if !repo::item_exists(&mut tx, id).await? {
        return Err(not_found(id));
    }

    if repo::is_item_used_in_recipes(&mut tx, id).await? {
        tracing::warn!(actor = actor.id, item_id = id, "Refusing to delete item used in recipes");
        return Err(AppError::Conflict(ERR_ITEM_USED_IN_RECIPES.to_string()));
    }

    if repo::delete_item(&mut tx, id).await? == 0 {
        return Err(not_found(id));
    }
    tx.commit().await?;

    tracing::info!(actor = actor.id, item_id = id, "Item deleted");
    Ok(())
}
