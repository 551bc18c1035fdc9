use sqlx::SqliteConnection;

use crate::models::UserRecord;

pub async fn list_users(conn: &mut SqliteConnection) -> Result<Vec<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>("SELECT * FROM USER ORDER BY ID_User")
        .fetch_all(conn)
        .await
}

pub async fn find_user_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>("SELECT * FROM USER WHERE ID_User = ?")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>("SELECT * FROM USER WHERE Email = ?")
        .bind(email)
        .fetch_optional(conn)
        .await
}

pub async fn insert_user(
    conn: &mut SqliteConnection,
    pseudo: &str,
    email: &str,
    password_hash: &str,
) -> Result<UserRecord, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        "INSERT INTO USER (Pseudo, Email, Password) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(pseudo)
    .bind(email)
    .bind(password_hash)
    .fetch_one(conn)
    .await
}

pub async fn update_user(
    conn: &mut SqliteConnection,
    id: i64,
    pseudo: &str,
    email: &str,
    password_hash: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        "UPDATE USER SET Pseudo = ?, Email = ?, Password = ? WHERE ID_User = ? RETURNING *",
    )
    .bind(pseudo)
    .bind(email)
    .bind(password_hash)
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Returns the number of deleted rows
pub async fn delete_user(conn: &mut SqliteConnection, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM USER WHERE ID_User = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count_users(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM USER")
        .fetch_one(conn)
        .await
}
