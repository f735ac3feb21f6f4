//! Engine error types.

use domain::DomainError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur while handling an inbound event.
///
/// These never escape the engine: `Engine::handle` catches them, logs,
/// and replies with a generic failure notice.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A domain operation failed.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A store operation failed outside the domain services.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The transport refused an outbound message.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
