//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// A container selector matched nothing
    #[error("Container selector did not resolve: {0}")]
    UnresolvedSelector(String),

    /// The element is no longer part of a document and cannot be measured
    #[error("Element <{0}> is detached and cannot be measured")]
    ElementDetached(String),

    /// A registered listener failed while handling an event
    #[error("Listener failed: {0}")]
    Listener(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
