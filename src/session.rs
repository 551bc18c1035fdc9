use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::constants::{ERR_AUTH_REQUIRED, SESSION_COOKIE_NAME, SESSION_MAX_AGE_SECS};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::security::{sign_session_id, verify_session_cookie};

#[derive(Debug, Clone)]
pub struct SessionData {
    pub user: User,
    pub created_at: i64,
    /// Per-session secret behind the CSRF token, set on first issuance
    pub csrf_secret: Option<String>,
}

impl SessionData {
    fn is_expired(&self, now: i64) -> bool {
        now - self.created_at >= SESSION_MAX_AGE_SECS
    }
}

/// In-memory session store keyed by session id
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_session(&self, user: User) -> String {
        let session_id = Uuid::new_v4().simple().to_string();
        let session_data = SessionData {
            user,
            created_at: chrono::Utc::now().timestamp(),
            csrf_secret: None,
        };

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session_id.clone(), session_data);
        }

        session_id
    }

    /// Live session data; expired sessions are dropped on access
    pub fn get_session(&self, session_id: &str) -> Option<SessionData> {
        let now = chrono::Utc::now().timestamp();
        let session = self.sessions.read().ok()?.get(session_id).cloned()?;

        if session.is_expired(now) {
            self.remove_session(session_id);
            return None;
        }

        Some(session)
    }

    pub fn remove_session(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(session_id);
        }
    }

    /// Drop every session of a user, e.g. after the account is deleted
    pub fn remove_user_sessions(&self, user_id: i64) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.retain(|_, session| session.user.id != user_id);
        }
    }

    /// The session's CSRF secret, created on first call
    pub fn ensure_csrf_secret(&self, session_id: &str) -> Option<String> {
        let mut sessions = self.sessions.write().ok()?;
        let session = sessions.get_mut(session_id)?;
        let secret = session
            .csrf_secret
            .get_or_insert_with(|| Uuid::new_v4().simple().to_string());
        Some(secret.clone())
    }

    pub fn csrf_secret(&self, session_id: &str) -> Option<String> {
        self.get_session(session_id)?.csrf_secret
    }

    pub fn cleanup_expired_sessions(&self) {
        let now = chrono::Utc::now().timestamp();

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.retain(|_, session| !session.is_expired(now));
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn create_session_cookie(signed_value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, signed_value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_MAX_AGE_SECS))
        .path("/")
        .build()
}

pub fn create_logout_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(0))
        .path("/")
        .build()
}

/// Open a session for `user` and add its signed cookie to the jar
pub fn start_session(
    jar: CookieJar,
    store: &SessionStore,
    user: User,
    secret: &str,
    secure: bool,
) -> Result<CookieJar> {
    let session_id = store.create_session(user);
    let signed = sign_session_id(&session_id, secret)?;
    Ok(jar.add(create_session_cookie(signed, secure)))
}

/// The authenticated principal of the current request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub session_id: String,
    pub user: User,
}

/// Resolve the session cookie into an [`AuthContext`]
pub fn extract_session_from_jar(
    jar: &CookieJar,
    store: &SessionStore,
    secret: &str,
) -> Result<AuthContext> {
    let cookie = jar
        .get(SESSION_COOKIE_NAME)
        .ok_or_else(|| AppError::Unauthorized(ERR_AUTH_REQUIRED.to_string()))?;

    let session_id = verify_session_cookie(cookie.value(), secret)
        .ok_or_else(|| AppError::Unauthorized(ERR_AUTH_REQUIRED.to_string()))?;

    let session = store
        .get_session(&session_id)
        .ok_or_else(|| AppError::Unauthorized(ERR_AUTH_REQUIRED.to_string()))?;

    Ok(AuthContext {
        session_id,
        user: session.user,
    })
}

/// Handlers behind `require_session` receive the context it resolved
#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized(ERR_AUTH_REQUIRED.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn steve() -> User {
        User {
            id: 1,
            pseudo: "Steve".to_string(),
            email: "steve@minecraft.com".to_string(),
        }
    }

    #[test]
    fn test_create_and_get_session() {
        let store = SessionStore::new();
        let session_id = store.create_session(steve());

        let session = store.get_session(&session_id).unwrap();
        assert_eq!(session.user, steve());
        assert!(session.csrf_secret.is_none());
    }

    #[test]
    fn test_expired_session_is_dropped() {
        let store = SessionStore::new();
        let session_id = store.create_session(steve());

        if let Ok(mut sessions) = store.sessions.write() {
            sessions.get_mut(&session_id).unwrap().created_at -= SESSION_MAX_AGE_SECS;
        }

        assert!(store.get_session(&session_id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_csrf_secret_is_stable_per_session() {
        let store = SessionStore::new();
        let session_id = store.create_session(steve());

        let first = store.ensure_csrf_secret(&session_id).unwrap();
        let second = store.ensure_csrf_secret(&session_id).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.csrf_secret(&session_id), Some(first));
        assert!(store.ensure_csrf_secret("missing").is_none());
    }

    #[test]
    fn test_remove_user_sessions() {
        let store = SessionStore::new();
        store.create_session(steve());
        store.create_session(steve());
        let other = store.create_session(User {
            id: 2,
            pseudo: "Alex".to_string(),
            email: "alex@minecraft.com".to_string(),
        });

        store.remove_user_sessions(1);

        assert_eq!(store.len(), 1);
        assert!(store.get_session(&other).is_some());
    }

    #[test]
    fn test_extract_session_from_jar() {
        let store = SessionStore::new();
        let jar = start_session(CookieJar::new(), &store, steve(), SECRET, false).unwrap();

        let context = extract_session_from_jar(&jar, &store, SECRET).unwrap();
        assert_eq!(context.user, steve());

        assert!(matches!(
            extract_session_from_jar(&jar, &store, "other-secret"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            extract_session_from_jar(&CookieJar::new(), &store, SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = create_session_cookie("value".to_string(), true);

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }
}
