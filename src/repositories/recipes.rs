use sqlx::SqliteConnection;

use crate::models::{IngredientView, Item, NewIngredient, Recipe, RecipeDetail, RecipeIngredientRow};

pub async fn list_recipes(conn: &mut SqliteConnection) -> Result<Vec<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>("SELECT * FROM RECIPE ORDER BY ID_Recipe")
        .fetch_all(conn)
        .await
}

pub async fn find_recipe_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>("SELECT * FROM RECIPE WHERE ID_Recipe = ?")
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Every recipe/ingredient pair, flattened
pub async fn list_recipes_with_ingredients(
    conn: &mut SqliteConnection,
) -> Result<Vec<RecipeIngredientRow>, sqlx::Error> {
    sqlx::query_as::<_, RecipeIngredientRow>(
        "SELECT r.ID_Recipe, r.ID_Item_Result, i.ID_Item, i.Name, ir.Position
           FROM RECIPE r
           JOIN ITEM_RECIPE ir ON r.ID_Recipe = ir.ID_Recipe
           JOIN ITEM i ON ir.ID_Item = i.ID_Item
          ORDER BY r.ID_Recipe, ir.Position",
    )
    .fetch_all(conn)
    .await
}

pub async fn list_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> Result<Vec<IngredientView>, sqlx::Error> {
    sqlx::query_as::<_, IngredientView>(
        "SELECT ir.ID_Item, ir.Position, i.Name, i.Image_Path
           FROM ITEM_RECIPE ir
           JOIN ITEM i ON ir.ID_Item = i.ID_Item
          WHERE ir.ID_Recipe = ?
          ORDER BY ir.Position",
    )
    .bind(recipe_id)
    .fetch_all(conn)
    .await
}

/// Recipe with its result item and ingredients, or `None` if absent
pub async fn find_recipe_with_ingredients(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<RecipeDetail>, sqlx::Error> {
    let Some(recipe) = find_recipe_by_id(&mut *conn, id).await? else {
        return Ok(None);
    };

    let result = sqlx::query_as::<_, Item>(
        "SELECT i.*
           FROM RECIPE r
           JOIN ITEM i ON r.ID_Item_Result = i.ID_Item
          WHERE r.ID_Recipe = ?",
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    let ingredients = list_ingredients(&mut *conn, id).await?;

    Ok(Some(RecipeDetail {
        id: recipe.id,
        result_item_id: recipe.result_item_id,
        result,
        ingredients,
    }))
}

/// Returns the new recipe id
pub async fn insert_recipe(
    conn: &mut SqliteConnection,
    result_item_id: i64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO RECIPE (ID_Item_Result) VALUES (?)")
        .bind(result_item_id)
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredients: &[NewIngredient],
) -> Result<(), sqlx::Error> {
    for ingredient in ingredients {
        sqlx::query("INSERT INTO ITEM_RECIPE (ID_Recipe, ID_Item, Position) VALUES (?, ?, ?)")
            .bind(recipe_id)
            .bind(ingredient.item_id)
            .bind(ingredient.position)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Returns the number of updated rows
pub async fn update_result_item(
    conn: &mut SqliteConnection,
    id: i64,
    result_item_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE RECIPE SET ID_Item_Result = ? WHERE ID_Recipe = ?")
        .bind(result_item_id)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Returns the number of deleted ingredient rows
pub async fn delete_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ITEM_RECIPE WHERE ID_Recipe = ?")
        .bind(recipe_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Deletes the recipe row only; returns the number of deleted rows
pub async fn delete_recipe(conn: &mut SqliteConnection, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM RECIPE WHERE ID_Recipe = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
