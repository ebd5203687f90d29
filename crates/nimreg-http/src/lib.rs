//! HTTP transport for the student registry.
//!
//! Routes:
//! - `POST /students`         — create a record, echoing the NIM
//! - `GET /students`          — list all records
//! - `PUT /students`          — overwrite an existing record
//! - `GET /students/{nim}`    — fetch one record
//! - `DELETE /students/{nim}` — delete one record
//! - `GET /health`            — service and database health

pub mod handlers;
pub mod server;
