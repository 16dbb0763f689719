//! Trigger configuration
//!
//! A [`TriggerConfig`] is replaced wholesale; [`ScrollTrigger::reconfigure`]
//! compares the old and new values to decide which listeners to rebuild.
//!
//! [`ScrollTrigger::reconfigure`]: crate::ScrollTrigger::reconfigure

use std::fmt;
use std::rc::Rc;

use waypoint_core::ScrollProgress;
use waypoint_platform::ContainerRef;

use crate::trigger::ScrollTrigger;

/// Default minimum interval between scroll-driven evaluations
pub const DEFAULT_THROTTLE_SCROLL_MS: u64 = 100;
/// Default minimum interval between resize-driven evaluations
pub const DEFAULT_THROTTLE_RESIZE_MS: u64 = 100;

/// Callback for enter, exit and progress notifications
///
/// Receives the payload and the trigger that raised it. Uses Rc since UI is
/// single-threaded.
pub type ProgressCallback = Rc<dyn Fn(&ScrollProgress, &ScrollTrigger)>;

fn noop() -> ProgressCallback {
    Rc::new(|_: &ScrollProgress, _: &ScrollTrigger| {})
}

/// Configuration for a scroll trigger
#[derive(Clone)]
pub struct TriggerConfig {
    /// Region whose scrolling drives the trigger (default: document root)
    pub container: ContainerRef,
    /// Minimum interval between scroll-driven evaluations (default: 100ms)
    pub throttle_scroll_ms: u64,
    /// Minimum interval between resize-driven evaluations (default: 100ms)
    pub throttle_resize_ms: u64,
    /// Evaluate once immediately after mounting (default: true)
    pub trigger_on_mount: bool,
    pub on_enter: ProgressCallback,
    pub on_exit: ProgressCallback,
    pub on_progress: ProgressCallback,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            container: ContainerRef::Root,
            throttle_scroll_ms: DEFAULT_THROTTLE_SCROLL_MS,
            throttle_resize_ms: DEFAULT_THROTTLE_RESIZE_MS,
            trigger_on_mount: true,
            on_enter: noop(),
            on_exit: noop(),
            on_progress: noop(),
        }
    }
}

impl TriggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scroll container
    pub fn container(mut self, container: impl Into<ContainerRef>) -> Self {
        self.container = container.into();
        self
    }

    /// Set the scroll throttle interval in milliseconds
    pub fn throttle_scroll(mut self, ms: u64) -> Self {
        self.throttle_scroll_ms = ms;
        self
    }

    /// Set the resize throttle interval in milliseconds
    pub fn throttle_resize(mut self, ms: u64) -> Self {
        self.throttle_resize_ms = ms;
        self
    }

    /// Set whether to evaluate once on mount
    pub fn trigger_on_mount(mut self, trigger: bool) -> Self {
        self.trigger_on_mount = trigger;
        self
    }

    /// Called when the element enters the viewport, before the first progress
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ScrollProgress, &ScrollTrigger) + 'static,
    {
        self.on_enter = Rc::new(callback);
        self
    }

    /// Called when the element leaves the viewport, after the last progress
    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ScrollProgress, &ScrollTrigger) + 'static,
    {
        self.on_exit = Rc::new(callback);
        self
    }

    /// Called on every pass while the element is (or just was) visible
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ScrollProgress, &ScrollTrigger) + 'static,
    {
        self.on_progress = Rc::new(callback);
        self
    }

    /// Which listener-relevant settings differ between `self` and `next`
    pub fn changes(&self, next: &TriggerConfig) -> ConfigChanges {
        ConfigChanges {
            throttle_scroll: self.throttle_scroll_ms != next.throttle_scroll_ms,
            throttle_resize: self.throttle_resize_ms != next.throttle_resize_ms,
            container: self.container != next.container,
        }
    }
}

impl fmt::Debug for TriggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerConfig")
            .field("container", &self.container)
            .field("throttle_scroll_ms", &self.throttle_scroll_ms)
            .field("throttle_resize_ms", &self.throttle_resize_ms)
            .field("trigger_on_mount", &self.trigger_on_mount)
            .finish_non_exhaustive()
    }
}

/// Listener-relevant differences between two configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigChanges {
    pub throttle_scroll: bool,
    pub throttle_resize: bool,
    pub container: bool,
}

impl ConfigChanges {
    pub fn any(&self) -> bool {
        self.throttle_scroll || self.throttle_resize || self.container
    }
}
