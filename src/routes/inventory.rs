use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::models::InventoryEntry;
use crate::routes::parse_id;
use crate::services::inventory;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:user_id", get(get_inventory))
}

pub async fn get_inventory(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<InventoryEntry>>> {
    let user_id = parse_id(&user_id)?;
    Ok(Json(
        inventory::get_inventory_by_user_id(&state.db, user_id).await?,
    ))
}
