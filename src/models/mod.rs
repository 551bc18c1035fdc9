pub mod inventory;
pub mod item;
pub mod rate_limit;
pub mod recipe;
pub mod user;
pub mod validation;

pub use inventory::{Inventory, InventoryEntry};
pub use item::{Item, ItemPayload, NewItem};
pub use rate_limit::RateLimitWindow;
pub use recipe::{
    GridPosition, IngredientView, NewIngredient, NewRecipe, Recipe, RecipeDetail,
    RecipeIngredientRow, RecipePayload,
};
pub use user::{LoginPayload, NewUser, User, UserPayload, UserRecord};
pub use validation::Validation;
