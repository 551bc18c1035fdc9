pub mod auth;
pub mod csrf;
pub mod health;
pub mod inventory;
pub mod items;
pub mod recipes;
pub mod users;

use axum::{
    extract::{DefaultBodyLimit, FromRequest},
    middleware, Router,
};
use tower_http::services::ServeDir;

use crate::constants::{ERR_INVALID_ID, MAX_REQUEST_BODY_BYTES};
use crate::error::{AppError, Result};
use crate::middleware::{csrf_protection, rate_limit, require_session, security_headers};
use crate::AppState;

pub use health::health_check;

/// `Json` extractor whose rejections render as [`AppError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Parse a numeric path id
pub fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>().map_err(|_| AppError::invalid(ERR_INVALID_ID))
}

/// Routers that need a session, plus a CSRF header on mutations
fn protected(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route_layer(middleware::from_fn_with_state(state.clone(), csrf_protection))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
}

/// Build the full application router
///
/// CORS and HTTP tracing are added by the binary so tests can drive this
/// router directly.
pub fn app_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/auth", auth::router(&state))
        .merge(csrf::router(&state))
        .nest("/items", protected(items::router(), &state))
        .nest("/recipes", protected(recipes::router(), &state))
        .nest("/inventory", protected(inventory::router(), &state))
        .nest("/users", protected(users::router(), &state));

    if let Some(dir) = &state.config.static_dir {
        tracing::info!("Serving static files from {}", dir);
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::Validation(_))));
        assert!(matches!(parse_id(""), Err(AppError::Validation(_))));
        assert!(matches!(parse_id("1.5"), Err(AppError::Validation(_))));
    }
}
