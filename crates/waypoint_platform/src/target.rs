//! Scroll targets and their listeners

use std::rc::Rc;

use slotmap::new_key_type;
use waypoint_core::{EventType, ScrollEvent};

use crate::error::Result;

new_key_type! {
    /// Handle returned when registering a listener, used to remove it again
    pub struct ListenerId;
}

/// Callback registered on a scroll target
///
/// Uses Rc since event dispatch is single-threaded. A listener error is
/// handed back to whoever dispatched the event.
pub type Listener = Rc<dyn Fn(&ScrollEvent) -> Result<()>>;

/// Shared handle to a scroll target
pub type SharedTarget = Rc<dyn ScrollTarget>;

/// A scrollable region that delivers scroll and resize events
pub trait ScrollTarget {
    /// Register a listener for one event type
    fn add_listener(&self, event_type: EventType, listener: Listener) -> ListenerId;

    /// Remove a previously registered listener
    ///
    /// Returns false if `id` was not registered for `event_type` here.
    fn remove_listener(&self, event_type: EventType, id: ListenerId) -> bool;

    /// Current vertical scroll offset
    fn scroll_offset(&self) -> f64;

    /// Height of the visible region
    fn client_height(&self) -> f64;

    /// Name used in logs
    fn label(&self) -> String {
        "scroll-target".to_string()
    }
}

/// Identity comparison for shared targets
///
/// Compares the data pointers only, so two handles to the same object
/// compare equal regardless of how they were coerced.
pub fn same_target(a: &SharedTarget, b: &SharedTarget) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}
