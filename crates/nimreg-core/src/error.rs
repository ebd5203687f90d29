use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A lookup matched no row. The display string is the wire body for
    /// 404 responses, so it must stay `data not found`.
    #[error("data not found")]
    NotFound,

    #[error("sqlite error: {0}")]
    Sqlite(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Convenience constructor for SQLite errors — use with `.map_err(StoreError::sqlite)`.
    pub fn sqlite<E: std::fmt::Display>(e: E) -> Self {
        Self::Sqlite(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
