//! Waypoint Platform Abstraction Layer
//!
//! Capability traits the scroll trigger consumes, independent of any
//! particular windowing or document backend.
//!
//! # Architecture
//!
//! - [`ScrollTarget`] - anything that scrolls and accepts scroll/resize listeners
//! - [`Viewport`] - the default scrolling root plus window-level queries
//! - [`Measurable`] - an element whose bounding rect can be queried
//! - [`ElementFactory`] - creates fresh measurable elements by tag
//!
//! The [`headless`] module implements all of them in memory. It backs the
//! test suites and the `waypoint` CLI's scenario runner.
//!
//! # Example
//!
//! ```rust
//! use waypoint_platform::headless::HeadlessDocument;
//! use waypoint_platform::{ContainerRef, ScrollTarget};
//!
//! let document = HeadlessDocument::new(800.0, 600.0);
//! document.add_container("#feed", 400.0);
//!
//! let resolved = ContainerRef::from("#feed").resolve(&document).unwrap();
//! assert!(resolved.custom);
//! assert_eq!(resolved.target.client_height(), 400.0);
//! ```

mod container;
mod element;
mod error;
pub mod headless;
mod target;

pub use container::{ContainerRef, ResolvedContainer, Viewport};
pub use element::{ElementFactory, Measurable, SharedElement};
pub use error::{PlatformError, Result};
pub use target::{same_target, Listener, ListenerId, ScrollTarget, SharedTarget};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::container::{ContainerRef, ResolvedContainer, Viewport};
    pub use crate::element::{ElementFactory, Measurable, SharedElement};
    pub use crate::error::{PlatformError, Result};
    pub use crate::target::{Listener, ListenerId, ScrollTarget, SharedTarget};
}
