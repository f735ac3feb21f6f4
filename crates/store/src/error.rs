use thiserror::Error;

/// Errors that can occur when interacting with the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached within the configured attempts.
    #[error("store unavailable after {attempts} connection attempts")]
    Unavailable {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A persisted order carries a status string the code does not know.
    #[error("unknown order status: {0:?}")]
    UnknownStatus(String),

    /// The backend reported a failure outside the sqlx error space.
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
