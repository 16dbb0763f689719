//! Listener manager
//!
//! Keeps exactly one scroll listener and one resize listener registered on
//! the resolved container. Handlers are never mutated in place: changing an
//! interval builds a new throttled handler and swaps it in (detach old,
//! attach new).

use waypoint_core::{event_types, EventType};
use waypoint_platform::{Listener, ListenerId, ResolvedContainer, SharedTarget};

/// Builds a throttled handler for an event type and interval
pub(crate) type HandlerFactory<'a> = &'a dyn Fn(EventType, u64) -> Listener;

/// A registered handler
#[derive(Debug, Clone, Copy)]
struct HandlerSlot {
    id: ListenerId,
    interval_ms: u64,
}

/// The target listeners are currently registered on
struct Attachment {
    container: ResolvedContainer,
    scroll: HandlerSlot,
    resize: HandlerSlot,
}

impl Attachment {
    fn slot_mut(&mut self, event_type: EventType) -> Option<&mut HandlerSlot> {
        match event_type {
            event_types::SCROLL => Some(&mut self.scroll),
            event_types::RESIZE => Some(&mut self.resize),
            _ => None,
        }
    }
}

/// Owns the scroll/resize registrations of one trigger
#[derive(Default)]
pub(crate) struct ListenerManager {
    attached: Option<Attachment>,
}

impl ListenerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Container the listeners are registered on
    pub fn container(&self) -> Option<&ResolvedContainer> {
        self.attached.as_ref().map(|a| &a.container)
    }

    pub fn target(&self) -> Option<&SharedTarget> {
        self.container().map(|c| &c.target)
    }

    /// Register both handlers on `container`
    ///
    /// Any previous registration is removed first, so the manager never
    /// holds more than one listener per event type.
    pub fn attach(
        &mut self,
        container: ResolvedContainer,
        throttle_scroll_ms: u64,
        throttle_resize_ms: u64,
        make_handler: HandlerFactory<'_>,
    ) {
        self.detach();

        let target = &container.target;
        let scroll = HandlerSlot {
            id: target.add_listener(
                event_types::SCROLL,
                make_handler(event_types::SCROLL, throttle_scroll_ms),
            ),
            interval_ms: throttle_scroll_ms,
        };
        let resize = HandlerSlot {
            id: target.add_listener(
                event_types::RESIZE,
                make_handler(event_types::RESIZE, throttle_resize_ms),
            ),
            interval_ms: throttle_resize_ms,
        };

        tracing::debug!(
            target = %target.label(),
            custom = container.custom,
            throttle_scroll_ms,
            throttle_resize_ms,
            "listeners attached"
        );

        self.attached = Some(Attachment {
            container,
            scroll,
            resize,
        });
    }

    /// Replace the handler for `event_type` with one using `interval_ms`
    ///
    /// The swap happens on the current target; the other handler is left
    /// alone. Returns false when nothing is attached.
    pub fn rebuild(
        &mut self,
        event_type: EventType,
        interval_ms: u64,
        make_handler: HandlerFactory<'_>,
    ) -> bool {
        let Some(attachment) = self.attached.as_mut() else {
            return false;
        };
        let target = attachment.container.target.clone();
        let Some(slot) = attachment.slot_mut(event_type) else {
            return false;
        };

        target.remove_listener(event_type, slot.id);
        let id = target.add_listener(event_type, make_handler(event_type, interval_ms));

        tracing::debug!(
            target = %target.label(),
            event = event_types::name(event_type),
            from_ms = slot.interval_ms,
            to_ms = interval_ms,
            "handler rebuilt"
        );

        *slot = HandlerSlot { id, interval_ms };
        true
    }

    /// Remove both handlers from the remembered target
    ///
    /// Safe to call repeatedly; returns whether anything was removed.
    pub fn detach(&mut self) -> bool {
        let Some(attachment) = self.attached.take() else {
            return false;
        };

        let target = &attachment.container.target;
        target.remove_listener(event_types::SCROLL, attachment.scroll.id);
        target.remove_listener(event_types::RESIZE, attachment.resize.id);

        tracing::debug!(target = %target.label(), "listeners detached");
        true
    }

    /// Interval of the registered handler for `event_type`
    pub fn interval_ms(&self, event_type: EventType) -> Option<u64> {
        let attachment = self.attached.as_ref()?;
        match event_type {
            event_types::SCROLL => Some(attachment.scroll.interval_ms),
            event_types::RESIZE => Some(attachment.resize.interval_ms),
            _ => None,
        }
    }
}
