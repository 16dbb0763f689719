//! Event types delivered to scroll targets

/// Numeric event type identifier
pub type EventType = u32;

/// Event types a scroll target can deliver to its listeners
pub mod event_types {
    use super::EventType;

    /// Content of the target scrolled
    pub const SCROLL: EventType = 1;
    /// The target (or the window, for the default root) changed size
    pub const RESIZE: EventType = 2;

    /// Human-readable name for logging
    pub fn name(event_type: EventType) -> &'static str {
        match event_type {
            SCROLL => "scroll",
            RESIZE => "resize",
            _ => "unknown",
        }
    }
}

/// An event as seen by a listener
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    /// What happened
    pub event_type: EventType,
    /// Time the event was dispatched (milliseconds)
    pub timestamp_ms: f64,
}

impl ScrollEvent {
    pub fn new(event_type: EventType, timestamp_ms: f64) -> Self {
        Self {
            event_type,
            timestamp_ms,
        }
    }
}
