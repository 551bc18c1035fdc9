pub mod pool;
pub mod seed;

use sqlx::{Sqlite, SqlitePool, Transaction};

pub use pool::create_pool;
pub use seed::seed_database;

/// Database handle type (cheaply cloneable pool shared across handlers)
pub type Db = SqlitePool;

/// Apply the schema from `migrations/`
pub async fn run_migrations(db: &Db) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(db).await?;
    tracing::info!("Migrations complete");
    Ok(())
}

/// Open the pool and bring the schema up to date
pub async fn open_database(database_url: &str, max_connections: u32) -> crate::Result<Db> {
    let db = create_pool(database_url, max_connections).await?;
    run_migrations(&db).await?;
    Ok(db)
}

/// Start a transaction holding the SQLite write lock from its first statement
///
/// Same effect as `BEGIN IMMEDIATE`. A deferred transaction that reads
/// before writing fails with `SQLITE_BUSY` as soon as another connection
/// commits in between; this one waits on the busy timeout instead.
pub async fn begin_write(db: &Db) -> crate::Result<Transaction<'static, Sqlite>> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM RECIPE WHERE 0")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}
