//! Persistence backends for the taskboard.
//!
//! - [`MemoryStore`]: process-local, indexed by generated string ids.
//! - [`PgStore`]: PostgreSQL via sqlx, `BIGSERIAL` ids surfaced as strings.
//!
//! Both implement [`taskboard_core::store::ProjectStore`]; the binary picks
//! one at startup.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
