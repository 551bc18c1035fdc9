use crate::constants::ERR_EMAIL_TAKEN;
use crate::db::{begin_write, Db};
use crate::error::{AppError, Result};
use crate::models::{User, UserPayload};
use crate::repositories::{inventory, users as repo};
use crate::security::hash_password_blocking;

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User with ID {} not found", id))
}

/// A concurrent writer can claim the email after the uniqueness check;
/// the UNIQUE constraint then reports it
fn email_taken(error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            tracing::info!("Email claimed concurrently: {}", db_error);
            AppError::Conflict(ERR_EMAIL_TAKEN.to_string())
        }
        _ => AppError::Database(error),
    }
}

pub async fn list_users(db: &Db) -> Result<Vec<User>> {
    let mut conn = db.acquire().await?;
    let records = repo::list_users(&mut conn).await?;
    Ok(records.into_iter().map(User::from).collect())
}

pub async fn get_user(db: &Db, id: i64) -> Result<User> {
    let mut conn = db.acquire().await?;
    repo::find_user_by_id(&mut conn, id)
        .await?
        .map(User::from)
        .ok_or_else(|| not_found(id))
}

/// Register a user together with their (empty) inventory
pub async fn create_user(db: &Db, payload: UserPayload) -> Result<User> {
    let new_user = payload.into_new_user()?;

    {
        let mut conn = db.acquire().await?;
        if repo::find_user_by_email(&mut conn, &new_user.email)
            .await?
            .is_some()
        {
            tracing::info!("Registration rejected: email already in use");
            return Err(AppError::Conflict(ERR_EMAIL_TAKEN.to_string()));
        }
    }

    let password_hash = hash_password_blocking(new_user.password).await?;

    let mut tx = begin_write(db).await?;
    let record = repo::insert_user(&mut tx, &new_user.pseudo, &new_user.email, &password_hash)
        .await
        .map_err(email_taken)?;
    inventory::create_inventory(&mut tx, record.id).await?;
    tx.commit().await?;

    tracing::info!(user_id = record.id, "User created with inventory");
    Ok(User::from(record))
}

/// Replace pseudo, email and password; the email must stay unique
pub async fn update_user(db: &Db, actor: &User, id: i64, payload: UserPayload) -> Result<User> {
    let new_user = {
        let mut conn = db.acquire().await?;
        if repo::find_user_by_id(&mut conn, id).await?.is_none() {
            return Err(not_found(id));
        }

        let new_user = payload.into_new_user()?;

        if let Some(owner) = repo::find_user_by_email(&mut conn, &new_user.email).await? {
            if owner.id != id {
                return Err(AppError::Conflict(ERR_EMAIL_TAKEN.to_string()));
            }
        }
        new_user
    };

    let password_hash = hash_password_blocking(new_user.password).await?;

    let mut conn = db.acquire().await?;
    let record = repo::update_user(&mut conn, id, &new_user.pseudo, &new_user.email, &password_hash)
        .await
        .map_err(email_taken)?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(actor = actor.id, user_id = id, "User updated");
    Ok(User::from(record))
}

/// Delete a user and their inventory in one transaction
pub async fn delete_user(db: &Db, actor: &User, id: i64) -> Result<()> {
    let mut tx = begin_write(db).await?;

    if repo::find_user_by_id(&mut tx, id).await?.is_none() {
        return Err(not_found(id));
    }

    inventory::delete_inventory_by_user_id(&mut tx, id).await?;
    repo::delete_user(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!(actor = actor.id, user_id = id, "User and inventory deleted");
    Ok(())
}
