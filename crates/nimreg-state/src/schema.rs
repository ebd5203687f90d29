use nimreg_core::error::StoreError;
use rusqlite::Connection;
use tracing::info;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS students (
    nim TEXT NOT NULL PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    address TEXT NOT NULL
);
";

/// Create the students table if it does not already exist.
/// Idempotent, so it runs unconditionally on every startup.
pub fn create_tables(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA_SQL).map_err(StoreError::sqlite)?;
    info!("SQLite schema ready");
    Ok(())
}
