use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::error::Result;
use crate::middleware::require_session;
use crate::models::{LoginPayload, UserPayload};
use crate::routes::AppJson;
use crate::services::{auth, users};
use crate::session::{create_logout_cookie, start_session, AuthContext};
use crate::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let session_routes = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(session_routes)
}

/// Create an account and log it in
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<UserPayload>,
) -> Result<(StatusCode, CookieJar, Json<Value>)> {
    let user = users::create_user(&state.db, payload).await?;

    let jar = start_session(
        jar,
        &state.sessions,
        user.clone(),
        &state.config.session_secret,
        state.config.is_production(),
    )?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(json!({ "message": "Registration successful", "user": user })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginPayload>,
) -> Result<(CookieJar, Json<Value>)> {
    let user = auth::login(&state.db, payload).await?;

    let jar = start_session(
        jar,
        &state.sessions,
        user.clone(),
        &state.config.session_secret,
        state.config.is_production(),
    )?;

    Ok((jar, Json(json!({ "message": "Login successful", "user": user }))))
}

pub async fn logout(
    State(state): State<AppState>,
    context: AuthContext,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    state.sessions.remove_session(&context.session_id);
    tracing::info!(user_id = context.user.id, "User logged out");

    let jar = jar.add(create_logout_cookie(state.config.is_production()));
    (jar, Json(json!({ "message": "Logout successful" })))
}

pub async fn me(context: AuthContext) -> Json<Value> {
    Json(json!({ "user": context.user }))
}
