//! Scroll trigger
//!
//! [`ScrollTrigger`] ties the pieces together: it resolves the configured
//! container, keeps a throttled scroll and resize handler registered on it
//! through the listener manager, and runs the evaluator whenever one of them
//! fires.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use waypoint_core::{Clock, ManualClock};
//! use waypoint_platform::headless::HeadlessDocument;
//! use waypoint_trigger::prelude::*;
//!
//! let document = Rc::new(HeadlessDocument::new(800.0, 800.0));
//! let element = document.create_element_in(&document.root_area(), "section", 900.0, 100.0);
//! let clock = ManualClock::new(0.0);
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let config = TriggerConfig::new()
//!     .on_enter({
//!         let log = log.clone();
//!         move |_, _| log.borrow_mut().push("enter")
//!     })
//!     .on_progress({
//!         let log = log.clone();
//!         move |_, _| log.borrow_mut().push("progress")
//!     });
//!
//! let trigger = ScrollTrigger::mount(&document, Rc::new(clock.clone()), element.into(), config)?;
//! assert!(!trigger.in_viewport());
//!
//! document.root_area().scroll_to(200.0, clock.now_ms())?;
//! assert!(trigger.in_viewport());
//! assert_eq!(*log.borrow(), vec!["enter", "progress"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use waypoint_core::{
    event_types, Clock, EventType, Notification, ScrollEvent, SystemClock, Throttle,
};
use waypoint_platform::{
    ElementFactory, Listener, PlatformError, ResolvedContainer, Result as PlatformResult,
    SharedElement, Viewport,
};

use crate::config::{ProgressCallback, TriggerConfig};
use crate::error::{Result, TriggerError};
use crate::evaluator;
use crate::host::Component;
use crate::listeners::ListenerManager;
use crate::state::TriggerState;

/// Everything a trigger owns
struct TriggerInner {
    viewport: Rc<dyn Viewport>,
    clock: Rc<dyn Clock>,
    element: SharedElement,
    config: TriggerConfig,
    state: TriggerState,
    listeners: ListenerManager,
}

impl Drop for TriggerInner {
    fn drop(&mut self) {
        self.listeners.detach();
    }
}

/// Tracks one element through the viewport of a scroll container
///
/// Cloning yields another handle to the same trigger. Registered handlers
/// only hold weak references, so dropping the last handle detaches the
/// listeners.
///
/// Element measurement, selector lookup and callbacks run without the
/// trigger's state borrowed, so they may call back into the trigger. The
/// query methods panic only if a [`ScrollTarget`] calls back into the trigger
/// from `add_listener` or `remove_listener`; mutating methods return
/// [`TriggerError::Busy`] instead.
///
/// [`ScrollTarget`]: waypoint_platform::ScrollTarget
#[derive(Clone)]
pub struct ScrollTrigger {
    inner: Rc<RefCell<TriggerInner>>,
}

impl ScrollTrigger {
    /// Start tracking `element`, timing with the system clock
    pub fn new(
        viewport: Rc<dyn Viewport>,
        element: SharedElement,
        config: TriggerConfig,
    ) -> Result<Self> {
        Self::with_clock(viewport, Rc::new(SystemClock), element, config)
    }

    /// Start tracking `element` with an explicit clock
    ///
    /// Attaches listeners to the configured container and, if
    /// `trigger_on_mount` is set, evaluates once straight away.
    pub fn with_clock(
        viewport: Rc<dyn Viewport>,
        clock: Rc<dyn Clock>,
        element: SharedElement,
        config: TriggerConfig,
    ) -> Result<Self> {
        let container = config.container.resolve(viewport.as_ref())?;
        let trigger_on_mount = config.trigger_on_mount;

        let trigger = Self {
            inner: Rc::new(RefCell::new(TriggerInner {
                viewport,
                clock,
                element,
                config,
                state: TriggerState::default(),
                listeners: ListenerManager::new(),
            })),
        };
        trigger.attach(container)?;

        if trigger_on_mount {
            trigger.evaluate()?;
        }
        Ok(trigger)
    }

    /// Mount a component on `document` and start tracking it
    pub fn mount<D>(
        document: &Rc<D>,
        clock: Rc<dyn Clock>,
        component: Component,
        config: TriggerConfig,
    ) -> Result<Self>
    where
        D: Viewport + ElementFactory + 'static,
    {
        let element = component.into_element(document.as_ref())?;
        let viewport: Rc<dyn Viewport> = document.clone();
        Self::with_clock(viewport, clock, element, config)
    }

    // =========================================================================
    // Listener lifecycle
    // =========================================================================

    fn attach(&self, container: ResolvedContainer) -> Result<()> {
        let make_handler = self.handler_factory();
        let mut inner = self.inner.try_borrow_mut().map_err(|_| TriggerError::Busy)?;
        let scroll_ms = inner.config.throttle_scroll_ms;
        let resize_ms = inner.config.throttle_resize_ms;

        inner.state.uses_custom_container = container.custom;
        inner
            .listeners
            .attach(container, scroll_ms, resize_ms, &make_handler);
        Ok(())
    }

    /// Builds throttled handlers that evaluate this trigger
    ///
    /// Each handler gets its own throttle, so a rebuilt handler starts a
    /// fresh window.
    fn handler_factory(&self) -> impl Fn(EventType, u64) -> Listener {
        let weak: Weak<RefCell<TriggerInner>> = Rc::downgrade(&self.inner);
        let clock = self.inner.borrow().clock.clone();

        move |event_type: EventType, interval_ms: u64| {
            let weak = weak.clone();
            let clock = clock.clone();
            let throttle = Throttle::new(interval_ms);

            let on_event = move |event: &ScrollEvent| -> PlatformResult<()> {
                let Some(inner) = weak.upgrade() else {
                    return Ok(());
                };
                if !throttle.try_fire(clock.now_ms()) {
                    return Ok(());
                }

                tracing::trace!(
                    event = event_types::name(event_type),
                    at = event.timestamp_ms,
                    "evaluate"
                );
                ScrollTrigger { inner }
                    .evaluate()
                    .map_err(|e| PlatformError::Listener(Box::new(e)))
            };
            let listener: Listener = Rc::new(on_event);
            listener
        }
    }

    /// Apply a new configuration
    ///
    /// A changed throttle interval swaps that one handler on the current
    /// target. A changed container moves both handlers to the new target and
    /// forces an evaluation. If the new container cannot be resolved nothing
    /// changes and the error is returned.
    pub fn reconfigure(&self, config: TriggerConfig) -> Result<()> {
        let (changes, viewport) = {
            let inner = self.inner.try_borrow().map_err(|_| TriggerError::Busy)?;
            (inner.config.changes(&config), inner.viewport.clone())
        };
        let container = if changes.container {
            Some(config.container.resolve(viewport.as_ref())?)
        } else {
            None
        };

        if !changes.any() {
            self.inner
                .try_borrow_mut()
                .map_err(|_| TriggerError::Busy)?
                .config = config;
            return Ok(());
        }
        tracing::debug!(changes = ?changes, "reconfigure");

        let make_handler = self.handler_factory();
        {
            let mut inner = self.inner.try_borrow_mut().map_err(|_| TriggerError::Busy)?;
            inner.config = config;

            if changes.throttle_scroll {
                let ms = inner.config.throttle_scroll_ms;
                inner.listeners.rebuild(event_types::SCROLL, ms, &make_handler);
            }
            if changes.throttle_resize {
                let ms = inner.config.throttle_resize_ms;
                inner.listeners.rebuild(event_types::RESIZE, ms, &make_handler);
            }
        }

        if let Some(container) = container {
            tracing::debug!(container = ?container, "container changed");
            if self.is_attached() {
                self.attach(container)?;
            } else {
                self.inner
                    .try_borrow_mut()
                    .map_err(|_| TriggerError::Busy)?
                    .state
                    .uses_custom_container = container.custom;
            }
            self.evaluate()?;
        }
        Ok(())
    }

    /// Remove the scroll and resize listeners
    ///
    /// Idempotent. Evaluation can still be forced afterwards.
    pub fn detach(&self) -> Result<()> {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| TriggerError::Busy)?;
        if inner.listeners.detach() {
            tracing::debug!("scroll trigger detached");
        }
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().listeners.is_attached()
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Run one unthrottled evaluation pass
    ///
    /// State is committed before any callback runs; callbacks observe the
    /// post-pass state and may freely query or reconfigure the trigger.
    pub fn evaluate(&self) -> Result<()> {
        // Platform capabilities are called without a borrow held
        let (viewport, attached, configured, element, clock) = {
            let inner = self.inner.try_borrow().map_err(|_| TriggerError::Busy)?;
            (
                inner.viewport.clone(),
                inner.listeners.container().cloned(),
                inner.config.container.clone(),
                inner.element.clone(),
                inner.clock.clone(),
            )
        };
        let container = match attached {
            Some(container) => container,
            None => configured.resolve(viewport.as_ref())?,
        };
        let measurement = evaluator::measure(viewport.as_ref(), &container, element.as_ref())?;
        let now = clock.now_ms();

        let (outcome, callbacks) = {
            let mut inner = self.inner.try_borrow_mut().map_err(|_| TriggerError::Busy)?;
            let inner = &mut *inner;

            let previous = inner.state.visibility;
            let outcome = evaluator::apply(&mut inner.state, measurement, now);

            tracing::trace!(
                rect = ?measurement.rect,
                viewport_end = measurement.viewport_end,
                transition = ?outcome.transition,
                "evaluated"
            );
            if outcome.transition.target(previous) != previous {
                tracing::debug!(
                    transition = ?outcome.transition,
                    progress = outcome.payload.progress,
                    "visibility changed"
                );
            }

            let callbacks: SmallVec<[ProgressCallback; 2]> = outcome
                .transition
                .notifications()
                .iter()
                .map(|notification| match notification {
                    Notification::Enter => inner.config.on_enter.clone(),
                    Notification::Progress => inner.config.on_progress.clone(),
                    Notification::Exit => inner.config.on_exit.clone(),
                })
                .collect();
            (outcome, callbacks)
        };

        for callback in &callbacks {
            callback(&outcome.payload, self);
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Snapshot of the tracker state
    pub fn state(&self) -> TriggerState {
        self.inner.borrow().state
    }

    pub fn in_viewport(&self) -> bool {
        self.state().in_viewport()
    }

    pub fn progress(&self) -> f64 {
        self.state().progress
    }

    pub fn uses_custom_container(&self) -> bool {
        self.state().uses_custom_container
    }

    /// Current configuration
    pub fn config(&self) -> TriggerConfig {
        self.inner.borrow().config.clone()
    }

    /// Label of the target the listeners are registered on
    pub fn target_label(&self) -> Option<String> {
        self.inner.borrow().listeners.target().map(|t| t.label())
    }

    /// Interval of the registered handler for `event_type`
    pub fn throttle_interval_ms(&self, event_type: EventType) -> Option<u64> {
        self.inner.borrow().listeners.interval_ms(event_type)
    }
}

impl fmt::Debug for ScrollTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("ScrollTrigger")
                .field("config", &inner.config)
                .field("state", &inner.state)
                .field("attached", &inner.listeners.is_attached())
                .finish(),
            Err(_) => f.write_str("ScrollTrigger { <busy> }"),
        }
    }
}
