//! Waypoint Core
//!
//! Backend-independent primitives for tracking an element's passage through
//! a scrolling viewport:
//!
//! - **Geometry**: [`ElementRect`] and the viewport extent it is measured against
//! - **Events**: scroll/resize event type constants shared by every backend
//! - **Time**: the [`Clock`] capability with wall-clock and manual implementations
//! - **Throttle**: a leading-edge rate limiter for event handlers
//! - **Visibility**: the two-state enter/exit machine and the per-pass evaluation
//!
//! # Example
//!
//! ```rust
//! use waypoint_core::{evaluate_pass, ElementRect, PassInput, Visibility};
//!
//! let pass = evaluate_pass(PassInput {
//!     previous: Visibility::Out,
//!     rect: ElementRect::new(700.0, 100.0),
//!     viewport_end: 800.0,
//! });
//!
//! assert_eq!(pass.next, Visibility::In);
//! assert!((pass.progress - 0.111).abs() < 1e-3);
//! ```

pub mod events;
pub mod geometry;
pub mod throttle;
pub mod time;
pub mod visibility;

pub use events::{event_types, EventType, ScrollEvent};
pub use geometry::{ElementRect, ViewportExtent};
pub use throttle::Throttle;
pub use time::{Clock, ManualClock, SystemClock};
pub use visibility::{
    estimate_velocity, evaluate_pass, Notification, Pass, PassInput, ScrollProgress, Transition,
    Visibility,
};
