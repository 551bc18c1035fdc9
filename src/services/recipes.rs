use sqlx::SqliteConnection;

use crate::db::{begin_write, Db};
use crate::error::{AppError, Result};
use crate::models::{NewRecipe, Recipe, RecipeDetail, RecipeIngredientRow, RecipePayload, User};
use crate::repositories::{items, recipes as repo};
use crate::services::items::not_found as item_not_found;

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Recipe with ID {} not found", id))
}

/// Every item the recipe points at must exist
async fn ensure_items_exist(conn: &mut SqliteConnection, recipe: &NewRecipe) -> Result<()> {
    for item_id in recipe.referenced_item_ids() {
        if !items::item_exists(&mut *conn, item_id).await? {
            return Err(item_not_found(item_id));
        }
    }
    Ok(())
}

pub async fn list_recipes(db: &Db) -> Result<Vec<Recipe>> {
    let mut conn = db.acquire().await?;
    Ok(repo::list_recipes(&mut conn).await?)
}

pub async fn get_recipe(db: &Db, id: i64) -> Result<Recipe> {
    let mut conn = db.acquire().await?;
    repo::find_recipe_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn list_recipes_with_ingredients(db: &Db) -> Result<Vec<RecipeIngredientRow>> {
    let mut conn = db.acquire().await?;
    Ok(repo::list_recipes_with_ingredients(&mut conn).await?)
}

pub async fn get_recipe_with_ingredients(db: &Db, id: i64) -> Result<RecipeDetail> {
    let mut conn = db.acquire().await?;
    repo::find_recipe_with_ingredients(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Insert the recipe and its ingredients as one unit
pub async fn create_recipe(db: &Db, actor: &User, payload: RecipePayload) -> Result<RecipeDetail> {
    let recipe = payload.into_new_recipe()?;

    let mut tx = begin_write(db).await?;
    ensure_items_exist(&mut tx, &recipe).await?;

    let id = repo::insert_recipe(&mut tx, recipe.result_item_id).await?;
    repo::insert_ingredients(&mut tx, id, &recipe.ingredients).await?;

    let detail = repo::find_recipe_with_ingredients(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Recipe {} missing after insert", id)))?;
    tx.commit().await?;

    tracing::info!(
        actor = actor.id,
        recipe_id = id,
        ingredients = detail.ingredients.len(),
        "Recipe created"
    );
    Ok(detail)
}

/// Point the recipe at a new result and replace its whole ingredient set
///
/// Runs in one transaction: if anything fails the previous ingredients
/// stay in place.
pub async fn update_recipe(
    db: &Db,
    actor: &User,
    id: i64,
    payload: RecipePayload,
) -> Result<RecipeDetail> {
    let recipe = payload.into_new_recipe()?;

    let mut tx = begin_write(db).await?;
    if repo::find_recipe_by_id(&mut tx, id).await?.is_none() {
        return Err(not_found(id));
    }
    ensure_items_exist(&mut tx, &recipe).await?;

    repo::update_result_item(&mut tx, id, recipe.result_item_id).await?;
    let removed = repo::delete_ingredients(&mut tx, id).await?;
    repo::insert_ingredients(&mut tx, id, &recipe.ingredients).await?;

    let detail = repo::find_recipe_with_ingredients(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tx.commit().await?;

    tracing::info!(
        actor = actor.id,
        recipe_id = id,
        removed,
        inserted = recipe.ingredients.len(),
        "Recipe ingredients replaced"
    );
    Ok(detail)
}

/// Delete ingredients then the recipe row
pub async fn delete_recipe(db: &Db, actor: &User, id: i64) -> Result<()> {
    let mut tx = begin_write(db).await?;
    repo::delete_ingredients(&mut tx, id).await?;

    if repo::delete_recipe(&mut tx, id).await? == 0 {
        return Err(not_found(id));
    }
    tx.commit().await?;

    tracing::info!(actor = actor.id, recipe_id = id, "Recipe deleted");
    Ok(())
}
