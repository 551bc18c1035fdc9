use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::error::Result;
use crate::models::{Item, ItemPayload};
use crate::routes::{parse_id, AppJson};
use crate::services::items;
use crate::session::AuthContext;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>> {
    Ok(Json(items::list_items(&state.db).await?))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>> {
    let id = parse_id(&id)?;
    Ok(Json(items::get_item(&state.db, id).await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    context: AuthContext,
    AppJson(payload): AppJson<ItemPayload>,
) -> Result<(StatusCode, Json<Item>)> {
    let item = items::create_item(&state.db, &context.user, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    context: AuthContext,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ItemPayload>,
) -> Result<Json<Item>> {
    let id = parse_id(&id)?;
    Ok(Json(
        items::update_item(&state.db, &context.user, id, payload).await?,
    ))
}

pub async fn delete_item(
    State(state): State<AppState>,
    context: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&id)?;
    items::delete_item(&state.db, &context.user, id).await?;
    Ok(Json(json!({ "message": "Item deleted successfully" })))
}
