use crate::handlers;
use axum::Router;
use axum::routing::{get, post};
use nimreg_core::config::StorageConfig;
use nimreg_core::error::StoreError;
use nimreg_state::{db, schema};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::info;

/// Shared state for the HTTP layer. The SQLite connection is the only
/// mutable state; handlers lock it for the duration of a single statement
/// and concurrency beyond that is delegated to SQLite itself.
#[derive(Clone)]
pub struct AppState {
    pub conn: Arc<Mutex<Connection>>,
    pub server_start: Instant,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            server_start: Instant::now(),
        }
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/students",
            post(handlers::create_student)
                .get(handlers::list_students)
                .put(handlers::update_student),
        )
        .route(
            "/students/{nim}",
            get(handlers::get_student).delete(handlers::delete_student),
        )
        .with_state(state)
}

/// Open the database, ensure the schema exists, and serve HTTP on the
/// given bind address and port until the process is stopped. Bind and
/// serve failures surface as `StoreError::Io`.
pub async fn run_server(
    bind_addr: &str,
    port: u16,
    db_path: &Path,
    storage: &StorageConfig,
) -> Result<(), StoreError> {
    let conn = db::open_connection_with_config(db_path, storage)?;
    schema::create_tables(&conn)?;

    let state = AppState::new(conn);
    let addr = format!("{}:{}", bind_addr, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("nimreg HTTP server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
