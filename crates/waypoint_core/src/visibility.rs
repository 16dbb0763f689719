//! Visibility state machine and per-pass evaluation
//!
//! A tracked element is either [`Visibility::Out`] (initial) or
//! [`Visibility::In`]. Each evaluation pass measures the element, decides
//! membership and produces a [`Transition`] that fixes which notifications
//! fire and in what order:
//!
//! | Transition | Notifications |
//! |---|---|
//! | `Out -> In` | enter, progress |
//! | `In -> In` | progress |
//! | `In -> Out` | progress, exit |
//! | `Out -> Out` | none |

use serde::{Deserialize, Serialize};

use crate::geometry::{ElementRect, ViewportExtent};

/// Payload delivered to enter/progress/exit callbacks
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollProgress {
    /// How far the element has moved through the viewport (0 = entering, 1 = gone past the top)
    pub progress: f64,
    /// Scroll speed in position units per millisecond, absent on the first reading
    pub velocity: Option<f64>,
}

/// Membership of the tracked element in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Outside the visible region
    #[default]
    Out,
    /// Inside (or flush with) the visible region
    In,
}

impl Visibility {
    pub fn is_in(&self) -> bool {
        matches!(self, Visibility::In)
    }

    /// Transition taken when a pass observes `in_viewport`
    pub fn on_membership(&self, in_viewport: bool) -> Transition {
        match (self, in_viewport) {
            (Visibility::Out, true) => Transition::Entered,
            (Visibility::In, true) => Transition::Stayed,
            (Visibility::In, false) => Transition::Exited,
            (Visibility::Out, false) => Transition::Idle,
        }
    }
}

/// A notification raised by a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    Enter,
    Progress,
    Exit,
}

/// Outcome of a single evaluation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Entered,
    Stayed,
    Exited,
    Idle,
}

impl Transition {
    /// Notifications to raise, in order
    pub fn notifications(&self) -> &'static [Notification] {
        match self {
            Transition::Entered => &[Notification::Enter, Notification::Progress],
            Transition::Stayed => &[Notification::Progress],
            Transition::Exited => &[Notification::Progress, Notification::Exit],
            Transition::Idle => &[],
        }
    }

    /// Whether the pass updates the stored readings
    pub fn mutates_state(&self) -> bool {
        !matches!(self, Transition::Idle)
    }

    /// Resulting visibility
    pub fn target(&self, previous: Visibility) -> Visibility {
        match self {
            Transition::Entered | Transition::Stayed => Visibility::In,
            Transition::Exited => Visibility::Out,
            Transition::Idle => previous,
        }
    }
}

/// Inputs of a geometry pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassInput {
    pub previous: Visibility,
    pub rect: ElementRect,
    pub viewport_end: f64,
}

/// Result of a geometry pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pass {
    pub next: Visibility,
    pub transition: Transition,
    /// Meaningless for [`Transition::Idle`]
    pub progress: f64,
}

/// Decide membership, transition and progress for one measurement
pub fn evaluate_pass(input: PassInput) -> Pass {
    let viewport = ViewportExtent {
        start: 0.0,
        end: input.viewport_end,
    };
    let rect = input.rect;
    let in_viewport = viewport.contains(&rect);
    let transition = input.previous.on_membership(in_viewport);

    let progress = match transition {
        Transition::Entered | Transition::Stayed => {
            (1.0 - rect.bottom / (viewport.end + rect.height)).clamp(0.0, 1.0)
        }
        // Exit direction: past the top edge reports 1, below the bottom edge 0
        Transition::Exited => {
            if rect.top <= viewport.end {
                1.0
            } else {
                0.0
            }
        }
        Transition::Idle => 0.0,
    };

    Pass {
        next: transition.target(input.previous),
        transition,
        progress,
    }
}

/// Finite-difference scroll velocity
///
/// Absent unless both previous readings exist. The time delta is not
/// guarded: two readings at the same instant give an infinite (or NaN, if
/// the position did not move either) velocity.
pub fn estimate_velocity(
    last_position: Option<f64>,
    last_timestamp: Option<f64>,
    position: f64,
    now_ms: f64,
) -> Option<f64> {
    match (last_position, last_timestamp) {
        (Some(last_position), Some(last_timestamp)) => {
            Some((last_position - position).abs() / (last_timestamp - now_ms).abs())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(previous: Visibility, top: f64, bottom: f64, viewport_end: f64) -> Pass {
        evaluate_pass(PassInput {
            previous,
            rect: ElementRect::from_edges(top, bottom),
            viewport_end,
        })
    }

    #[test]
    fn test_fully_below_stays_out() {
        let p = pass(Visibility::Out, 900.0, 1000.0, 800.0);
        assert_eq!(p.transition, Transition::Idle);
        assert_eq!(p.next, Visibility::Out);
        assert!(p.transition.notifications().is_empty());
        assert!(!p.transition.mutates_state());
    }

    #[test]
    fn test_enter_progress() {
        let p = pass(Visibility::Out, 700.0, 800.0, 800.0);
        assert_eq!(p.transition, Transition::Entered);
        assert!((p.progress - (1.0 - 800.0 / 900.0)).abs() < 1e-9);
        assert_eq!(
            p.transition.notifications(),
            &[Notification::Enter, Notification::Progress]
        );
    }

    #[test]
    fn test_stay_progress() {
        let p = pass(Visibility::In, -50.0, 50.0, 800.0);
        assert_eq!(p.transition, Transition::Stayed);
        assert!((p.progress - (1.0 - 50.0 / 900.0)).abs() < 1e-9);
        assert_eq!(p.transition.notifications(), &[Notification::Progress]);
    }

    #[test]
    fn test_exit_past_top_reports_one() {
        let p = pass(Visibility::In, -150.0, -50.0, 800.0);
        assert_eq!(p.transition, Transition::Exited);
        assert_eq!(p.next, Visibility::Out);
        assert_eq!(p.progress, 1.0);
        assert_eq!(
            p.transition.notifications(),
            &[Notification::Progress, Notification::Exit]
        );
    }

    #[test]
    fn test_exit_below_bottom_reports_zero() {
        let p = pass(Visibility::In, 850.0, 950.0, 800.0);
        assert_eq!(p.transition, Transition::Exited);
        assert_eq!(p.progress, 0.0);
    }

    #[test]
    fn test_progress_clamped() {
        // Element taller than the viewport with its bottom far below:
        // raw ratio is negative
        let p = pass(Visibility::Out, 0.0, 5000.0, 800.0);
        assert_eq!(p.progress, 0.0);

        // Zero-height element flush with the top edge: raw ratio is exactly 1
        let p = pass(Visibility::In, 0.0, 0.0, 800.0);
        assert_eq!(p.progress, 1.0);

        // Negative bottom cannot happen while in viewport, but a negative
        // height can push the raw ratio above 1
        let p = evaluate_pass(PassInput {
            previous: Visibility::In,
            rect: ElementRect {
                top: -10.0,
                bottom: 10.0,
                height: -900.0,
            },
            viewport_end: 800.0,
        });
        assert_eq!(p.progress, 1.0);
    }

    #[test]
    fn test_velocity_absent_without_history() {
        assert_eq!(estimate_velocity(None, None, 10.0, 100.0), None);
        assert_eq!(estimate_velocity(Some(0.0), None, 10.0, 100.0), None);
        assert_eq!(estimate_velocity(None, Some(0.0), 10.0, 100.0), None);
    }

    #[test]
    fn test_velocity_finite_difference() {
        let v = estimate_velocity(Some(100.0), Some(1000.0), 300.0, 1100.0);
        assert_eq!(v, Some(2.0));

        // Scrolling back up gives the same magnitude
        let v = estimate_velocity(Some(300.0), Some(1000.0), 100.0, 1100.0);
        assert_eq!(v, Some(2.0));
    }

    #[test]
    fn test_velocity_zero_time_delta_is_unguarded() {
        let v = estimate_velocity(Some(100.0), Some(1000.0), 200.0, 1000.0);
        assert_eq!(v, Some(f64::INFINITY));

        let v = estimate_velocity(Some(100.0), Some(1000.0), 100.0, 1000.0);
        assert!(v.is_some_and(f64::is_nan));
    }
}
