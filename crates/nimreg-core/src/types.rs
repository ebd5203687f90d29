use serde::{Deserialize, Serialize};

/// A student record. The NIM uniquely identifies the record and is
/// immutable once created; all other fields may be overwritten in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub nim: String,
    pub name: String,
    pub age: u16,
    pub address: String,
}
