//! Element and viewport geometry
//!
//! All coordinates are in the viewport's space: `0` is the top edge of the
//! visible region and values grow downwards.

use serde::{Deserialize, Serialize};

/// Vertical extent of an element relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementRect {
    /// Distance from the viewport's top edge to the element's top edge
    pub top: f64,
    /// Distance from the viewport's top edge to the element's bottom edge
    pub bottom: f64,
    /// Element height
    pub height: f64,
}

impl ElementRect {
    /// Create a rect from its top edge and height
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            height,
        }
    }

    /// Create a rect from explicit edges
    pub fn from_edges(top: f64, bottom: f64) -> Self {
        Self {
            top,
            bottom,
            height: bottom - top,
        }
    }

    /// Shift the rect vertically
    pub fn offset(self, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            bottom: self.bottom + dy,
            height: self.height,
        }
    }
}

/// The visible region an element is tested against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportExtent {
    pub start: f64,
    pub end: f64,
}

impl ViewportExtent {
    /// Extent of a custom scroll container: its client height
    pub fn of_container(client_height: f64) -> Self {
        Self {
            start: 0.0,
            end: client_height,
        }
    }

    /// Extent of the default scrolling root
    ///
    /// The larger of the root's visible height and the window's inner
    /// height, never negative.
    pub fn of_root(root_height: f64, inner_height: f64) -> Self {
        Self {
            start: 0.0,
            end: root_height.max(inner_height).max(0.0),
        }
    }

    /// Closed-interval overlap test: flush edges count as visible
    pub fn contains(&self, rect: &ElementRect) -> bool {
        rect.top <= self.end && rect.bottom >= self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_top_and_height() {
        let rect = ElementRect::new(700.0, 100.0);
        assert_eq!(rect.bottom, 800.0);
        assert_eq!(rect.offset(-750.0), ElementRect::new(-50.0, 100.0));
    }

    #[test]
    fn test_rect_from_edges() {
        let rect = ElementRect::from_edges(-150.0, -50.0);
        assert_eq!(rect.height, 100.0);
    }

    #[test]
    fn test_root_extent_takes_larger_height() {
        assert_eq!(ViewportExtent::of_root(600.0, 800.0).end, 800.0);
        assert_eq!(ViewportExtent::of_root(900.0, 800.0).end, 900.0);
        assert_eq!(ViewportExtent::of_root(-5.0, -1.0).end, 0.0);
    }

    #[test]
    fn test_contains_is_edge_inclusive() {
        let viewport = ViewportExtent::of_container(800.0);

        // Flush with the bottom edge
        assert!(viewport.contains(&ElementRect::new(800.0, 100.0)));
        // Flush with the top edge
        assert!(viewport.contains(&ElementRect::from_edges(-100.0, 0.0)));
        // Fully below / fully above
        assert!(!viewport.contains(&ElementRect::new(800.5, 100.0)));
        assert!(!viewport.contains(&ElementRect::from_edges(-100.0, -0.5)));
    }
}
