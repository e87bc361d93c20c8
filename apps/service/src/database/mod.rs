/// Result store layer
///
/// Owns the append-only observation log kept in a local LibSQL (SQLite) file.

pub mod repository;
pub mod migrations;
pub mod models;

pub use repository::{Database, DatabaseImpl};

use anyhow::Result;

/// Initialize database with schema
pub async fn initialize_database(conn: &libsql::Connection) -> Result<()> {
    migrations::run_migrations(conn).await
}
