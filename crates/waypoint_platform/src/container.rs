//! Scroll containers and the default viewport
//!
//! A trigger listens either to the default scrolling root (the window and
//! document) or to a custom container. [`ContainerRef`] names the choice;
//! [`ContainerRef::resolve`] turns it into a concrete target using the
//! injected [`Viewport`].

use std::fmt;

use crate::error::{PlatformError, Result};
use crate::target::{same_target, SharedTarget};

/// The default scrolling root and window-level queries
pub trait Viewport {
    /// The root scroll target; root listeners receive window-level events
    fn root(&self) -> SharedTarget;

    /// Inner height of the window
    fn inner_height(&self) -> f64;

    /// Global vertical scroll offset
    fn scroll_y(&self) -> f64;

    /// Find a scroll target by selector
    fn query_selector(&self, selector: &str) -> Option<SharedTarget>;
}

/// Which region a trigger measures against
#[derive(Clone, Default)]
pub enum ContainerRef {
    /// The document's root scrolling area
    #[default]
    Root,
    /// A specific scroll target
    Target(SharedTarget),
    /// A selector resolved through [`Viewport::query_selector`]
    Selector(String),
}

impl ContainerRef {
    pub fn is_root(&self) -> bool {
        matches!(self, ContainerRef::Root)
    }

    /// Resolve to a concrete target
    ///
    /// A handle or selector that turns out to be the root itself resolves
    /// as the root (`custom == false`).
    pub fn resolve(&self, viewport: &dyn Viewport) -> Result<ResolvedContainer> {
        let root = viewport.root();
        let target = match self {
            ContainerRef::Root => root.clone(),
            ContainerRef::Target(target) => target.clone(),
            ContainerRef::Selector(selector) => viewport
                .query_selector(selector)
                .ok_or_else(|| PlatformError::UnresolvedSelector(selector.clone()))?,
        };
        let custom = !same_target(&target, &root);
        Ok(ResolvedContainer { target, custom })
    }
}

impl PartialEq for ContainerRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ContainerRef::Root, ContainerRef::Root) => true,
            (ContainerRef::Target(a), ContainerRef::Target(b)) => same_target(a, b),
            (ContainerRef::Selector(a), ContainerRef::Selector(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerRef::Root => f.write_str("Root"),
            ContainerRef::Target(target) => f.debug_tuple("Target").field(&target.label()).finish(),
            ContainerRef::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
        }
    }
}

impl From<&str> for ContainerRef {
    fn from(selector: &str) -> Self {
        ContainerRef::Selector(selector.to_string())
    }
}

impl From<String> for ContainerRef {
    fn from(selector: String) -> Self {
        ContainerRef::Selector(selector)
    }
}

impl From<SharedTarget> for ContainerRef {
    fn from(target: SharedTarget) -> Self {
        ContainerRef::Target(target)
    }
}

/// A container resolved against a viewport
#[derive(Clone)]
pub struct ResolvedContainer {
    pub target: SharedTarget,
    /// True unless the target is the default root
    pub custom: bool,
}

impl fmt::Debug for ResolvedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedContainer")
            .field("target", &self.target.label())
            .field("custom", &self.custom)
            .finish()
    }
}
