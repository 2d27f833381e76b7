//! Database module
//!
//! This module handles database connections, migrations, and repositories, and the
//! two implementations of the timing ports.

pub mod connection;
pub mod memory;
pub mod pg_store;
pub mod repositories;

use sqlx::PgPool;

pub use connection::*;
pub use memory::MemoryStore;
pub use pg_store::PgStore;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
