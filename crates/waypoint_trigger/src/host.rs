//! Element host
//!
//! The trigger only needs something it can measure. A [`Component`] either
//! asks the backend to create a fresh element or wraps one the caller
//! already owns.

use std::fmt;
use std::rc::Rc;

use waypoint_platform::{ElementFactory, Measurable, Result, SharedElement};

/// Tag used when no component is given
pub const DEFAULT_TAG: &str = "div";

/// How the tracked element is obtained
#[derive(Clone)]
pub enum Component {
    /// Create a new element with this tag
    Tag(String),
    /// Track an existing element
    Existing(SharedElement),
}

impl Default for Component {
    fn default() -> Self {
        Component::Tag(DEFAULT_TAG.to_string())
    }
}

impl Component {
    /// Produce the measurable handle for this component
    pub fn into_element(self, factory: &dyn ElementFactory) -> Result<SharedElement> {
        match self {
            Component::Tag(tag) => factory.create_element(&tag),
            Component::Existing(element) => Ok(element),
        }
    }
}

impl From<&str> for Component {
    fn from(tag: &str) -> Self {
        Component::Tag(tag.to_string())
    }
}

impl<M: Measurable + 'static> From<Rc<M>> for Component {
    fn from(element: Rc<M>) -> Self {
        Component::Existing(element)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            Component::Existing(_) => f.write_str("Existing(..)"),
        }
    }
}
