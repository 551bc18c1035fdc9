use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use crate::constants::{CSRF_HEADER, ERR_INVALID_CSRF_TOKEN, RATE_LIMIT_PRUNE_THRESHOLD};
use crate::error::{AppError, Result};
use crate::models::RateLimitWindow;
use crate::security::verify_csrf_token;
use crate::session::{extract_session_from_jar, AuthContext};
use crate::AppState;

// =============================================================================
// Session and CSRF
// =============================================================================

/// Reject requests without a live session; downstream handlers read the
/// resolved [`AuthContext`] from the request extensions
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let context = extract_session_from_jar(&jar, &state.sessions, &state.config.session_secret)
        .map_err(|e| {
            tracing::warn!("{} {}: no valid session", request.method(), request.uri().path());
            e
        })?;

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Require a valid `X-CSRF-Token` header on state-changing requests
///
/// Must run after [`require_session`].
pub async fn csrf_protection(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !is_state_changing(request.method()) {
        return Ok(next.run(request).await);
    }

    let forbidden = || AppError::Forbidden(ERR_INVALID_CSRF_TOKEN.to_string());

    let context = request
        .extensions()
        .get::<AuthContext>()
        .ok_or_else(forbidden)?;

    let token = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!(user_id = context.user.id, "Missing CSRF token");
            forbidden()
        })?;

    let csrf_secret = state
        .sessions
        .csrf_secret(&context.session_id)
        .ok_or_else(forbidden)?;

    if !verify_csrf_token(
        &context.session_id,
        &csrf_secret,
        token,
        &state.config.session_secret,
    ) {
        tracing::warn!(user_id = context.user.id, "Invalid CSRF token");
        return Err(forbidden());
    }

    Ok(next.run(request).await)
}

// =============================================================================
// Security headers
// =============================================================================

pub async fn security_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             img-src 'self' data:; \
             frame-ancestors 'none'; \
             base-uri 'self'; \
             form-action 'self'",
        ),
    );

    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );

    response
}

// =============================================================================
// Rate limiting
// =============================================================================

/// Per-client fixed-window request counters
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<IpAddr, RateLimitWindow>>>,
    max_requests: u64,
    window_secs: i64,
}

impl RateLimiter {
    pub fn new(max_requests: u64, window_secs: i64) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window_secs,
        }
    }

    /// Count one request from `client` at `now`
    pub fn check(&self, client: IpAddr, now: i64) -> Result<()> {
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| AppError::Internal("Rate limiter lock poisoned".to_string()))?;

        if windows.len() > RATE_LIMIT_PRUNE_THRESHOLD {
            windows.retain(|_, window| !window.is_expired(now));
        }

        windows
            .entry(client)
            .or_insert_with(|| RateLimitWindow::new(now, self.window_secs))
            .check_and_increment(now, self.max_requests, self.window_secs)
    }
}

/// Apply the shared [`RateLimiter`] keyed on the peer address
///
/// Requests without connection info (e.g. in-process tests) share one
/// bucket.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Result<Response> {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    state
        .rate_limiter
        .check(client, chrono::Utc::now().timestamp())
        .map_err(|e| {
            tracing::warn!(%client, "Rate limit exceeded");
            e
        })?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_000_000;

    #[test]
    fn test_state_changing_methods() {
        assert!(is_state_changing(&Method::POST));
        assert!(is_state_changing(&Method::PUT));
        assert!(is_state_changing(&Method::PATCH));
        assert!(is_state_changing(&Method::DELETE));
        assert!(!is_state_changing(&Method::GET));
        assert!(!is_state_changing(&Method::HEAD));
        assert!(!is_state_changing(&Method::OPTIONS));
    }

    #[test]
    fn test_rate_limiter_counts_per_client() {
        let limiter = RateLimiter::new(2, 900);
        let alice: IpAddr = "10.0.0.1".parse().unwrap();
        let bob: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(alice, NOW).is_ok());
        assert!(limiter.check(alice, NOW).is_ok());
        assert!(matches!(
            limiter.check(alice, NOW),
            Err(AppError::RateLimitExceeded)
        ));

        assert!(limiter.check(bob, NOW).is_ok());
    }

    #[test]
    fn test_rate_limiter_window_expires() {
        let limiter = RateLimiter::new(1, 900);
        let client: IpAddr = "10.0.0.1".parse().unwrap();

        assert!(limiter.check(client, NOW).is_ok());
        assert!(limiter.check(client, NOW + 1).is_err());
        assert!(limiter.check(client, NOW + 900).is_ok());
    }
}
