use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

const SALT_SIZE: usize = 16; // 128 bits salt for Argon2

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password into an Argon2id PHC string
///
/// CPU-bound: callers on the async runtime should go through
/// [`hash_password_blocking`].
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);

    let salt_string = SaltString::encode_b64(&salt)
        .map_err(|e| AppError::PasswordHash(format!("Failed to encode salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt_string)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC string
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// [`hash_password`] on the blocking pool
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// [`verify_password`] on the blocking pool
pub async fn verify_password_blocking(password: String, stored_hash: String) -> Result<bool> {
    let matches =
        tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await?;
    Ok(matches)
}

// =============================================================================
// HMAC Signing (session cookies, CSRF tokens)
// =============================================================================

/// Compute a hex-encoded HMAC-SHA256 of `data`
pub fn sign(data: &str, secret: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(format!("Failed to create HMAC instance: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify HMAC-SHA256 signature
///
/// The comparison is constant-time. Malformed hex counts as a mismatch.
pub fn verify_hmac(data: &str, signature: &str, secret: &str) -> bool {
    // Create HMAC instance with secret key
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    mac.update(data.as_bytes());

    let sig_bytes = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature format");
            return false;
        }
    };

    mac.verify_slice(&sig_bytes).is_ok()
}

/// Cookie value for a session id: `<session_id>.<signature>`
pub fn sign_session_id(session_id: &str, secret: &str) -> Result<String> {
    Ok(format!("{}.{}", session_id, sign(session_id, secret)?))
}

/// Recover the session id from a signed cookie value
pub fn verify_session_cookie(value: &str, secret: &str) -> Option<String> {
    let (session_id, signature) = value.rsplit_once('.')?;
    if verify_hmac(session_id, signature, secret) {
        Some(session_id.to_string())
    } else {
        tracing::warn!("Session cookie signature mismatch");
        None
    }
}

fn csrf_payload(session_id: &str, csrf_secret: &str) -> String {
    format!("csrf:{}:{}", session_id, csrf_secret)
}

/// Anti-forgery token bound to one session and its per-session secret
pub fn csrf_token(session_id: &str, csrf_secret: &str, secret: &str) -> Result<String> {
    sign(&csrf_payload(session_id, csrf_secret), secret)
}

pub fn verify_csrf_token(session_id: &str, csrf_secret: &str, token: &str, secret: &str) -> bool {
    verify_hmac(&csrf_payload(session_id, csrf_secret), token, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("password123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "password123");
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("password124", &hash));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let first = hash_password("password123").unwrap();
        let second = hash_password("password123").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password_rejects_malformed_hash() {
        assert!(!verify_password("password123", "password123"));
    }

    #[test]
    fn test_verify_hmac() {
        let signature = sign("hello", SECRET).unwrap();

        assert!(verify_hmac("hello", &signature, SECRET));
        assert!(!verify_hmac("hello!", &signature, SECRET));
        assert!(!verify_hmac("hello", &signature, "other-secret"));
        assert!(!verify_hmac("hello", "not-hex", SECRET));
    }

    #[test]
    fn test_session_cookie_signature() {
        let cookie = sign_session_id("abc123", SECRET).unwrap();

        assert_eq!(verify_session_cookie(&cookie, SECRET).as_deref(), Some("abc123"));
        assert!(verify_session_cookie("abc123", SECRET).is_none());
        assert!(verify_session_cookie(&cookie.replace("abc", "abd"), SECRET).is_none());
    }

    #[test]
    fn test_csrf_token_is_bound_to_session() {
        let token = csrf_token("session-a", "salt", SECRET).unwrap();

        assert!(verify_csrf_token("session-a", "salt", &token, SECRET));
        assert!(!verify_csrf_token("session-b", "salt", &token, SECRET));
        assert!(!verify_csrf_token("session-a", "other-salt", &token, SECRET));
    }
}
