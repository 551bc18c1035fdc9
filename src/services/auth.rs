use crate::constants::ERR_INVALID_CREDENTIALS;
use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{LoginPayload, User};
use crate::repositories::users;
use crate::security::verify_password_blocking;

/// Check credentials and return the matching user
///
/// Unknown email and wrong password fail with the same error.
pub async fn login(db: &Db, payload: LoginPayload) -> Result<User> {
    let (email, password) = payload.into_credentials()?;

    let record = {
        let mut conn = db.acquire().await?;
        users::find_user_by_email(&mut conn, &email).await?
    };

    let Some(record) = record else {
        tracing::info!("Login failed: unknown email");
        return Err(AppError::Unauthorized(ERR_INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password_blocking(password, record.password_hash.clone()).await? {
        tracing::info!(user_id = record.id, "Login failed: wrong password");
        return Err(AppError::Unauthorized(ERR_INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!(user_id = record.id, "User logged in");
    Ok(User::from(record))
}
