//! Waypoint Scroll Trigger
//!
//! Detects when an element enters, moves through and leaves the visible
//! region of a scrolling container, and reports each step to callbacks with
//! a `{progress, velocity}` payload.
//!
//! - **Listener manager**: one throttled scroll and one throttled resize
//!   handler on the default root or a custom container
//! - **Evaluator**: measures the element, runs the visibility state machine
//!   and estimates scroll velocity
//! - **Element host**: creates or wraps the element being tracked
//!
//! Callback order per pass:
//!
//! | Pass | Callbacks |
//! |---|---|
//! | enters | `on_enter`, `on_progress` |
//! | stays visible | `on_progress` |
//! | leaves | `on_progress`, `on_exit` |
//! | stays hidden | none |
//!
//! On exit, progress is `1.0` when the element left past the top edge and
//! `0.0` when it dropped below the bottom edge.

pub mod config;
pub mod error;
mod evaluator;
pub mod host;
mod listeners;
pub mod state;
mod trigger;

pub use config::{ConfigChanges, ProgressCallback, TriggerConfig};
pub use error::{Result, TriggerError};
pub use host::Component;
pub use state::TriggerState;
pub use trigger::ScrollTrigger;

// Payload and container types callers need alongside the trigger
pub use waypoint_core::ScrollProgress;
pub use waypoint_platform::ContainerRef;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::TriggerConfig;
    pub use crate::error::{Result, TriggerError};
    pub use crate::host::Component;
    pub use crate::state::TriggerState;
    pub use crate::trigger::ScrollTrigger;
    pub use waypoint_core::ScrollProgress;
    pub use waypoint_platform::ContainerRef;
}
