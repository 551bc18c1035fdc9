use std::collections::HashMap;

use crate::db::{begin_write, Db};
use crate::error::{AppError, Result};
use crate::models::{GridPosition, NewIngredient, NewItem};
use crate::repositories::{inventory, items, recipes, users};
use crate::security::hash_password_blocking;

const DEMO_USERS: [(&str, &str, &str); 3] = [
    ("Steve", "steve@minecraft.com", "password123"),
    ("Alex", "alex@minecraft.com", "password456"),
    ("Notch", "notch@minecraft.com", "password789"),
];

const DEMO_ITEMS: [&str; 12] = [
    "Dirt",
    "Stone",
    "Wood",
    "Diamond",
    "Iron Ingot",
    "Coal",
    "Crafting Table",
    "Furnace",
    "Diamond Pickaxe",
    "Diamond Sword",
    "Wooden Planks",
    "Stick",
];

/// (owner index in DEMO_USERS, item, quantity)
const DEMO_INVENTORY: [(usize, &str, i64); 8] = [
    (0, "Dirt", 64),
    (0, "Stone", 32),
    (0, "Wood", 16),
    (1, "Diamond", 5),
    (1, "Iron Ingot", 20),
    (2, "Diamond Pickaxe", 1),
    (2, "Diamond Sword", 1),
    (0, "Stick", 10),
];

/// Result item and its ingredients as (item, x, y) grid cells
const DEMO_RECIPES: [(&str, &[(&str, i64, i64)]); 4] = [
    (
        "Crafting Table",
        &[
            ("Wooden Planks", 0, 0),
            ("Wooden Planks", 1, 0),
            ("Wooden Planks", 0, 1),
            ("Wooden Planks", 1, 1),
        ],
    ),
    ("Wooden Planks", &[("Wood", 0, 0)]),
    ("Stick", &[("Wooden Planks", 0, 0), ("Wooden Planks", 0, 1)]),
    (
        "Diamond Pickaxe",
        &[
            ("Diamond", 0, 0),
            ("Diamond", 1, 0),
            ("Diamond", 2, 0),
            ("Stick", 1, 1),
            ("Stick", 1, 2),
        ],
    ),
];

fn image_path(name: &str) -> String {
    format!("images/items/{}.png", name.to_lowercase().replace(' ', "_"))
}

fn lookup(ids: &HashMap<&str, i64>, name: &str) -> Result<i64> {
    ids.get(name)
        .copied()
        .ok_or_else(|| AppError::Internal(format!("Seed item {} missing", name)))
}

/// Fill an empty database with demo users, items, inventories and recipes
///
/// Does nothing when at least one user exists, so it is safe to call on
/// every startup.
pub async fn seed_database(db: &Db) -> Result<()> {
    {
        let mut conn = db.acquire().await?;
        if users::count_users(&mut conn).await? > 0 {
            tracing::info!("Database already populated, skipping seed");
            return Ok(());
        }
    }

    tracing::info!("Seeding database...");

    let mut hashed_users = Vec::with_capacity(DEMO_USERS.len());
    for (pseudo, email, password) in DEMO_USERS {
        let hash = hash_password_blocking(password.to_string()).await?;
        hashed_users.push((pseudo, email, hash));
    }

    let mut tx = begin_write(db).await?;

    let mut inventory_ids = Vec::with_capacity(hashed_users.len());
    for (pseudo, email, hash) in &hashed_users {
        let user = users::insert_user(&mut tx, pseudo, email, hash).await?;
        let inventory = inventory::create_inventory(&mut tx, user.id).await?;
        inventory_ids.push(inventory.id);
    }

    let mut item_ids = HashMap::new();
    for name in DEMO_ITEMS {
        let item = NewItem {
            name: name.to_string(),
            image_path: image_path(name),
        };
        let row = items::insert_item(&mut tx, &item).await?;
        item_ids.insert(name, row.id);
    }

    for (owner, name, quantity) in DEMO_INVENTORY {
        let inventory_id = inventory_ids
            .get(owner)
            .copied()
            .ok_or_else(|| AppError::Internal(format!("Seed inventory {} missing", owner)))?;
        inventory::upsert_line(&mut tx, inventory_id, lookup(&item_ids, name)?, quantity).await?;
    }

    for (result, cells) in DEMO_RECIPES {
        let recipe_id = recipes::insert_recipe(&mut tx, lookup(&item_ids, result)?).await?;

        let mut ingredients = Vec::with_capacity(cells.len());
        for &(name, x, y) in cells {
            let position = GridPosition { x, y }
                .position()
                .map_err(|e| AppError::Internal(e.to_string()))?;
            ingredients.push(NewIngredient {
                item_id: lookup(&item_ids, name)?,
                position,
            });
        }
        recipes::insert_ingredients(&mut tx, recipe_id, &ingredients).await?;
    }

    tx.commit().await?;

    tracing::info!(
        users = DEMO_USERS.len(),
        items = DEMO_ITEMS.len(),
        recipes = DEMO_RECIPES.len(),
        "Database seeded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_database;

    #[test]
    fn test_image_path() {
        assert_eq!(image_path("Dirt"), "images/items/dirt.png");
        assert_eq!(image_path("Iron Ingot"), "images/items/iron_ingot.png");
    }

    #[test]
    fn test_recipe_cells_fit_the_grid() {
        for (_, cells) in DEMO_RECIPES {
            for &(_, x, y) in cells {
                assert!(GridPosition { x, y }.position().is_ok());
            }
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = open_database("sqlite::memory:", 1).await.unwrap();

        seed_database(&db).await.unwrap();
        seed_database(&db).await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        assert_eq!(users::count_users(&mut conn).await.unwrap(), 3);
        assert_eq!(items::list_items(&mut conn).await.unwrap().len(), 12);
        assert_eq!(recipes::list_recipes(&mut conn).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_seeded_pickaxe_positions() {
        let db = open_database("sqlite::memory:", 1).await.unwrap();
        seed_database(&db).await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        let pickaxe = recipes::find_recipe_with_ingredients(&mut conn, 4)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(pickaxe.result.name, "Diamond Pickaxe");
        let positions: Vec<i64> = pickaxe.ingredients.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 5, 8]);

        let steve = inventory::list_entries_by_user_id(&mut conn, 1).await.unwrap();
        assert_eq!(steve.len(), 4);
    }
}
