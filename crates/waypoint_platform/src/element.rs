//! Measurable elements

use std::rc::Rc;

use waypoint_core::ElementRect;

use crate::error::Result;

/// An element whose position relative to the viewport can be queried
pub trait Measurable {
    /// Bounding rect in viewport coordinates
    fn bounding_rect(&self) -> Result<ElementRect>;
}

/// Shared handle to a measurable element
pub type SharedElement = Rc<dyn Measurable>;

/// Creates new elements by tag name
pub trait ElementFactory {
    fn create_element(&self, tag: &str) -> Result<SharedElement>;
}
