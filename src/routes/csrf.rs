use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::constants::ERR_AUTH_REQUIRED;
use crate::error::{AppError, Result};
use crate::middleware::require_session;
use crate::security::csrf_token;
use crate::session::AuthContext;
use crate::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/csrf-token", get(issue_csrf_token))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
}

/// Token the client echoes in `X-CSRF-Token` on state-changing requests
pub async fn issue_csrf_token(
    State(state): State<AppState>,
    context: AuthContext,
) -> Result<Json<Value>> {
    let csrf_secret = state
        .sessions
        .ensure_csrf_secret(&context.session_id)
        .ok_or_else(|| AppError::Unauthorized(ERR_AUTH_REQUIRED.to_string()))?;

    let token = csrf_token(
        &context.session_id,
        &csrf_secret,
        &state.config.session_secret,
    )?;

    Ok(Json(json!({ "csrfToken": token })))
}
