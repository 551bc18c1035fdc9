use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::error::Result;
use crate::models::{User, UserPayload};
use crate::routes::{parse_id, AppJson};
use crate::services::users;
use crate::session::AuthContext;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(users::list_users(&state.db).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    let id = parse_id(&id)?;
    Ok(Json(users::get_user(&state.db, id).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    context: AuthContext,
    AppJson(payload): AppJson<UserPayload>,
) -> Result<(StatusCode, Json<User>)> {
    let user = users::create_user(&state.db, payload).await?;
    tracing::info!(actor = context.user.id, user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    context: AuthContext,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UserPayload>,
) -> Result<Json<User>> {
    let id = parse_id(&id)?;
    Ok(Json(
        users::update_user(&state.db, &context.user, id, payload).await?,
    ))
}

/// Deletes the user and their inventory, then ends their sessions
pub async fn delete_user(
    State(state): State<AppState>,
    context: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&id)?;
    users::delete_user(&state.db, &context.user, id).await?;
    state.sessions.remove_user_sessions(id);
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
