//! Headless in-memory backend
//!
//! A minimal document model with no rendering: a root scroll area standing
//! in for the window, any number of named scroll containers, and elements
//! positioned inside one of them. Events are delivered synchronously by
//! [`HeadlessScrollArea::dispatch`].
//!
//! # Example
//!
//! ```rust
//! use waypoint_core::event_types;
//! use waypoint_platform::headless::HeadlessDocument;
//! use waypoint_platform::Measurable;
//!
//! let document = HeadlessDocument::new(800.0, 800.0);
//! let element = document.create_element_in(&document.root_area(), "section", 900.0, 100.0);
//!
//! document.root_area().scroll_to(200.0, 0.0).unwrap();
//! assert_eq!(element.bounding_rect().unwrap().top, 700.0);
//! assert_eq!(document.root_area().listener_count(event_types::SCROLL), 0);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use waypoint_core::{event_types, ElementRect, EventType, ScrollEvent};

use crate::container::Viewport;
use crate::element::{ElementFactory, Measurable, SharedElement};
use crate::error::{PlatformError, Result};
use crate::target::{Listener, ListenerId, ScrollTarget, SharedTarget};

/// Selectors that name the root scroll area
pub const ROOT_SELECTORS: &[&str] = &["html", ":root"];

pub fn is_root_selector(selector: &str) -> bool {
    ROOT_SELECTORS.contains(&selector)
}

// ============================================================================
// Scroll Area
// ============================================================================

/// An in-memory scrollable region
pub struct HeadlessScrollArea {
    label: String,
    scroll_top: Cell<f64>,
    client_height: Cell<f64>,
    listeners: RefCell<SlotMap<ListenerId, (EventType, Listener)>>,
}

impl HeadlessScrollArea {
    pub fn new(label: impl Into<String>, client_height: f64) -> Rc<Self> {
        Rc::new(Self {
            label: label.into(),
            scroll_top: Cell::new(0.0),
            client_height: Cell::new(client_height),
            listeners: RefCell::new(SlotMap::with_key()),
        })
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top.get()
    }

    /// Move the scroll offset without notifying listeners
    pub fn set_scroll_top(&self, scroll_top: f64) {
        self.scroll_top.set(scroll_top);
    }

    /// Change the visible height without notifying listeners
    pub fn set_client_height(&self, client_height: f64) {
        self.client_height.set(client_height);
    }

    /// Scroll to `scroll_top` and deliver a scroll event
    pub fn scroll_to(&self, scroll_top: f64, timestamp_ms: f64) -> Result<usize> {
        self.set_scroll_top(scroll_top);
        self.dispatch(event_types::SCROLL, timestamp_ms)
    }

    /// Deliver an event to every listener registered for its type
    ///
    /// Returns how many listeners ran. Stops at the first listener error and
    /// returns it.
    pub fn dispatch(&self, event_type: EventType, timestamp_ms: f64) -> Result<usize> {
        // Snapshot so listeners may add or remove listeners while running
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .values()
            .filter(|(ty, _)| *ty == event_type)
            .map(|(_, listener)| listener.clone())
            .collect();

        tracing::trace!(
            target = %self.label,
            event = event_types::name(event_type),
            listeners = listeners.len(),
            "dispatch"
        );

        let event = ScrollEvent::new(event_type, timestamp_ms);
        for listener in &listeners {
            listener(&event)?;
        }
        Ok(listeners.len())
    }

    /// Number of listeners registered for `event_type`
    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.listeners
            .borrow()
            .values()
            .filter(|(ty, _)| *ty == event_type)
            .count()
    }

    /// Number of listeners of any type
    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl ScrollTarget for HeadlessScrollArea {
    fn add_listener(&self, event_type: EventType, listener: Listener) -> ListenerId {
        let id = self.listeners.borrow_mut().insert((event_type, listener));
        tracing::debug!(
            target = %self.label,
            event = event_types::name(event_type),
            "listener added"
        );
        id
    }

    fn remove_listener(&self, event_type: EventType, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let registered = listeners
            .get(id)
            .is_some_and(|(ty, _)| *ty == event_type);
        if !registered {
            return false;
        }

        listeners.remove(id);
        tracing::debug!(
            target = %self.label,
            event = event_types::name(event_type),
            "listener removed"
        );
        true
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_top.get()
    }

    fn client_height(&self) -> f64 {
        self.client_height.get()
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

impl fmt::Debug for HeadlessScrollArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessScrollArea")
            .field("label", &self.label)
            .field("scroll_top", &self.scroll_top.get())
            .field("client_height", &self.client_height.get())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

// ============================================================================
// Element
// ============================================================================

/// An element laid out inside a scroll area
///
/// `top` is the element's offset within its area's content. Its bounding
/// rect is that offset minus the area's current scroll position.
#[derive(Debug)]
pub struct HeadlessElement {
    tag: String,
    top: Cell<f64>,
    height: Cell<f64>,
    parent: RefCell<Option<Weak<HeadlessScrollArea>>>,
}

impl HeadlessElement {
    /// Reposition the element within its area's content
    pub fn set_geometry(&self, top: f64, height: f64) {
        self.top.set(top);
        self.height.set(height);
    }

    /// Move the element into another scroll area
    pub fn attach_to(&self, area: &Rc<HeadlessScrollArea>) {
        *self.parent.borrow_mut() = Some(Rc::downgrade(area));
    }

    /// Remove the element from the document; later measurements fail
    pub fn detach(&self) {
        *self.parent.borrow_mut() = None;
    }
}

impl Measurable for HeadlessElement {
    fn bounding_rect(&self) -> Result<ElementRect> {
        let parent = self
            .parent
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| PlatformError::ElementDetached(self.tag.clone()))?;
        Ok(ElementRect::new(
            self.top.get() - parent.scroll_top(),
            self.height.get(),
        ))
    }
}

// ============================================================================
// Document
// ============================================================================

/// In-memory document: window, root scroll area and named containers
pub struct HeadlessDocument {
    root: Rc<HeadlessScrollArea>,
    inner_height: Cell<f64>,
    containers: RefCell<FxHashMap<String, Rc<HeadlessScrollArea>>>,
}

impl HeadlessDocument {
    /// Create a document with the window's inner height and the root area's visible height
    pub fn new(inner_height: f64, root_height: f64) -> Self {
        Self {
            root: HeadlessScrollArea::new("html", root_height),
            inner_height: Cell::new(inner_height),
            containers: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn root_area(&self) -> Rc<HeadlessScrollArea> {
        self.root.clone()
    }

    /// Register a scroll container reachable through `selector`
    ///
    /// Re-registering a selector replaces the previous container.
    pub fn add_container(
        &self,
        selector: impl Into<String>,
        client_height: f64,
    ) -> Rc<HeadlessScrollArea> {
        let selector = selector.into();
        let area = HeadlessScrollArea::new(selector.clone(), client_height);
        self.containers.borrow_mut().insert(selector, area.clone());
        area
    }

    /// Look up a container registered with [`add_container`](Self::add_container)
    pub fn container(&self, selector: &str) -> Option<Rc<HeadlessScrollArea>> {
        self.containers.borrow().get(selector).cloned()
    }

    /// Root area for a root selector, else the named container
    pub fn area(&self, selector: &str) -> Option<Rc<HeadlessScrollArea>> {
        if is_root_selector(selector) {
            Some(self.root.clone())
        } else {
            self.container(selector)
        }
    }

    pub fn set_inner_height(&self, inner_height: f64) {
        self.inner_height.set(inner_height);
    }

    /// Resize the window and deliver a resize event to root listeners
    pub fn resize(&self, inner_height: f64, timestamp_ms: f64) -> Result<usize> {
        self.set_inner_height(inner_height);
        self.root.dispatch(event_types::RESIZE, timestamp_ms)
    }

    /// Create an element positioned inside `area`
    pub fn create_element_in(
        &self,
        area: &Rc<HeadlessScrollArea>,
        tag: impl Into<String>,
        top: f64,
        height: f64,
    ) -> Rc<HeadlessElement> {
        Rc::new(HeadlessElement {
            tag: tag.into(),
            top: Cell::new(top),
            height: Cell::new(height),
            parent: RefCell::new(Some(Rc::downgrade(area))),
        })
    }
}

impl Viewport for HeadlessDocument {
    fn root(&self) -> SharedTarget {
        self.root.clone()
    }

    fn inner_height(&self) -> f64 {
        self.inner_height.get()
    }

    fn scroll_y(&self) -> f64 {
        self.root.scroll_top()
    }

    fn query_selector(&self, selector: &str) -> Option<SharedTarget> {
        self.area(selector).map(|area| area as SharedTarget)
    }
}

impl ElementFactory for HeadlessDocument {
    /// New elements start empty at the top of the root area
    fn create_element(&self, tag: &str) -> Result<SharedElement> {
        let element: SharedElement = self.create_element_in(&self.root, tag, 0.0, 0.0);
        Ok(element)
    }
}

impl fmt::Debug for HeadlessDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessDocument")
            .field("root", &self.root)
            .field("inner_height", &self.inner_height.get())
            .field("containers", &self.containers.borrow().len())
            .finish()
    }
}
