//! Common error types for clickloop-platform.

use thiserror::Error;

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to initialize pointer injection: {0}")]
    PointerInit(String),
    #[error("failed to start input listener: {0}")]
    ListenerInit(String),
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
