//! Trigger error types

use thiserror::Error;
use waypoint_platform::PlatformError;

/// Errors raised while attaching, reconfiguring or evaluating a trigger
#[derive(Error, Debug)]
pub enum TriggerError {
    /// A platform capability failed (unresolved container, detached element, ...)
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The trigger was re-entered while its state was being updated
    #[error("Scroll trigger is busy: re-entered from a platform capability")]
    Busy,
}

/// Result type for trigger operations
pub type Result<T> = std::result::Result<T, TriggerError>;
