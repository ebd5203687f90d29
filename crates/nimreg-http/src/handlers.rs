use crate::server::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nimreg_core::error::StoreError;
use nimreg_core::types::Student;
use nimreg_state::{db, students};
use rusqlite::Connection;
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Lock the shared connection, recovering from a poisoned lock. A poisoned
/// mutex here only means a previous statement panicked; the connection
/// itself is still usable.
fn lock_conn(conn: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Map a storage error to its HTTP response: `NotFound` becomes 404 with
/// the error display string as body, everything else a 500.
fn store_error_response(err: &StoreError) -> Response {
    match err {
        StoreError::NotFound => (StatusCode::NOT_FOUND, err.to_string()).into_response(),
        _ => {
            warn!(error = %err, "storage operation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

fn join_error_response(err: tokio::task::JoinError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("internal error: {}", err),
    )
        .into_response()
}

/// POST /students — insert a new record, echoing the NIM on success.
pub async fn create_student(State(state): State<AppState>, body: Bytes) -> Response {
    let student: Student = match serde_json::from_slice(&body) {
        Ok(student) => student,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let conn = Arc::clone(&state.conn);
    let result = tokio::task::spawn_blocking(move || {
        let guard = lock_conn(&conn);
        students::save(&guard, &student)?;
        drop(guard);
        Ok::<_, StoreError>(student.nim)
    })
    .await;

    match result {
        Ok(Ok(nim)) => (StatusCode::CREATED, nim).into_response(),
        Ok(Err(err)) => store_error_response(&err),
        Err(err) => join_error_response(err),
    }
}

/// GET /students — all records as a JSON array, empty store included.
pub async fn list_students(State(state): State<AppState>) -> Response {
    let conn = Arc::clone(&state.conn);
    let result = tokio::task::spawn_blocking(move || {
        let guard = lock_conn(&conn);
        students::list_all(&guard)
    })
    .await;

    match result {
        Ok(Ok(list)) => (StatusCode::OK, Json(list)).into_response(),
        Ok(Err(err)) => store_error_response(&err),
        Err(err) => join_error_response(err),
    }
}

/// GET /students/{nim} — fetch a single record.
pub async fn get_student(State(state): State<AppState>, Path(nim): Path<String>) -> Response {
    let conn = Arc::clone(&state.conn);
    let result = tokio::task::spawn_blocking(move || {
        let guard = lock_conn(&conn);
        students::find_by_nim(&guard, &nim)
    })
    .await;

    match result {
        Ok(Ok(student)) => (StatusCode::OK, Json(student)).into_response(),
        Ok(Err(err)) => store_error_response(&err),
        Err(err) => join_error_response(err),
    }
}

/// PUT /students — overwrite name/age/address of the record matching the
/// body's NIM. Not an upsert: an absent NIM is a 404.
pub async fn update_student(State(state): State<AppState>, body: Bytes) -> Response {
    let student: Student = match serde_json::from_slice(&body) {
        Ok(student) => student,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let conn = Arc::clone(&state.conn);
    let result = tokio::task::spawn_blocking(move || {
        let guard = lock_conn(&conn);
        students::update_by_nim(&guard, &student)
    })
    .await;

    match result {
        Ok(Ok(())) => StatusCode::OK.into_response(),
        Ok(Err(err)) => store_error_response(&err),
        Err(err) => join_error_response(err),
    }
}

/// DELETE /students/{nim} — hard-delete a single record.
pub async fn delete_student(State(state): State<AppState>, Path(nim): Path<String>) -> Response {
    let conn = Arc::clone(&state.conn);
    let result = tokio::task::spawn_blocking(move || {
        let guard = lock_conn(&conn);
        students::delete_by_nim(&guard, &nim)
    })
    .await;

    match result {
        Ok(Ok(())) => StatusCode::OK.into_response(),
        Ok(Err(err)) => store_error_response(&err),
        Err(err) => join_error_response(err),
    }
}

/// GET /health — service and database health. Always 200; degradation is
/// reported in the payload.
pub async fn health(State(state): State<AppState>) -> Response {
    let uptime_seconds = state.server_start.elapsed().as_secs();

    let conn = Arc::clone(&state.conn);
    let result = tokio::task::spawn_blocking(move || {
        let guard = lock_conn(&conn);
        db::check_sqlite_health(&guard)
    })
    .await;

    let (sqlite_ok, sqlite_error) = match result {
        Ok(Ok((ok, detail))) => (ok, detail),
        Ok(Err(err)) => {
            warn!(error = %err, "sqlite health check failed");
            (false, Some(err.to_string()))
        }
        Err(err) => (false, Some(err.to_string())),
    };

    Json(json!({
        "status": if sqlite_ok { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": uptime_seconds,
        "sqlite_ok": sqlite_ok,
        "sqlite_error": sqlite_error,
    }))
    .into_response()
}
