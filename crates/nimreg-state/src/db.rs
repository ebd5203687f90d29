use nimreg_core::config::StorageConfig;
use nimreg_core::error::StoreError;
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Open the students database with default storage settings.
pub fn open_connection(db_path: &Path) -> Result<Connection, StoreError> {
    open_connection_with_config(db_path, &StorageConfig::default())
}

/// Open the students database, applying the configured SQLite pragmas.
/// The parent directory is created if needed, so a path like
/// `/var/lib/nimreg/students.db` works on first start.
pub fn open_connection_with_config(
    db_path: &Path,
    storage: &StorageConfig,
) -> Result<Connection, StoreError> {
    // A bare filename like `students.db` has an empty parent.
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(StoreError::Io)?;
    }

    let conn = Connection::open(db_path).map_err(StoreError::sqlite)?;

    conn.execute_batch(&format!(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = {};
         PRAGMA cache_size = {};",
        storage.busy_timeout_ms, storage.cache_size
    ))
    .map_err(StoreError::sqlite)?;

    info!(?db_path, "students database opened");
    Ok(conn)
}

/// Run `PRAGMA quick_check` against the students database.
/// Returns Ok(true) when healthy, Ok(false) with detail otherwise.
pub fn check_sqlite_health(conn: &Connection) -> Result<(bool, Option<String>), StoreError> {
    let result: String = conn
        .query_row("PRAGMA quick_check", [], |row| row.get(0))
        .map_err(StoreError::sqlite)?;

    if result == "ok" {
        Ok((true, None))
    } else {
        Ok((false, Some(result)))
    }
}
