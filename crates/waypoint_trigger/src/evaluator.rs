//! Visibility evaluator
//!
//! One pass measures the element against its container, runs the
//! visibility state machine, estimates velocity and commits the readings.
//! Deciding which callbacks run is left to the caller, which must not hold
//! the trigger borrowed while they do.

use waypoint_core::{
    estimate_velocity, evaluate_pass, ElementRect, PassInput, ScrollProgress, Transition,
    ViewportExtent,
};
use waypoint_platform::{Measurable, ResolvedContainer, Result, Viewport};

use crate::state::TriggerState;

/// Geometry and scroll position read for one pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Measurement {
    pub rect: ElementRect,
    pub viewport_end: f64,
    pub position: f64,
}

/// Read element, viewport and scroll position
///
/// The default root measures against the larger of its own visible height
/// and the window's inner height, and uses the global scroll offset. A
/// custom container uses its client height and its own scroll offset.
pub(crate) fn measure(
    viewport: &dyn Viewport,
    container: &ResolvedContainer,
    element: &dyn Measurable,
) -> Result<Measurement> {
    let rect = element.bounding_rect()?;
    let target = &container.target;

    let (extent, position) = if container.custom {
        (
            ViewportExtent::of_container(target.client_height()),
            target.scroll_offset(),
        )
    } else {
        (
            ViewportExtent::of_root(target.client_height(), viewport.inner_height()),
            viewport.scroll_y(),
        )
    };

    Ok(Measurement {
        rect,
        viewport_end: extent.end,
        position,
    })
}

/// Result of applying a measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Outcome {
    pub transition: Transition,
    pub payload: ScrollProgress,
}

/// Run the state machine on `measurement` and commit non-idle passes
pub(crate) fn apply(state: &mut TriggerState, measurement: Measurement, now_ms: f64) -> Outcome {
    let pass = evaluate_pass(PassInput {
        previous: state.visibility,
        rect: measurement.rect,
        viewport_end: measurement.viewport_end,
    });
    let velocity = estimate_velocity(
        state.last_scroll_position,
        state.last_scroll_timestamp,
        measurement.position,
        now_ms,
    );

    if pass.transition.mutates_state() {
        state.record(pass.next, pass.progress, measurement.position, now_ms);
    }

    Outcome {
        transition: pass.transition,
        payload: ScrollProgress {
            progress: pass.progress,
            velocity,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::Visibility;
    use waypoint_platform::headless::HeadlessDocument;
    use waypoint_platform::ContainerRef;

    fn at(top: f64, bottom: f64, position: f64) -> Measurement {
        Measurement {
            rect: ElementRect::from_edges(top, bottom),
            viewport_end: 800.0,
            position,
        }
    }

    #[test]
    fn test_idle_pass_leaves_state_untouched() {
        let mut state = TriggerState::default();
        let outcome = apply(&mut state, at(900.0, 1000.0, 0.0), 10.0);

        assert_eq!(outcome.transition, Transition::Idle);
        assert_eq!(state, TriggerState::default());
    }

    #[test]
    fn test_scroll_through_sequence() {
        let mut state = TriggerState::default();

        let enter = apply(&mut state, at(700.0, 800.0, 200.0), 100.0);
        assert_eq!(enter.transition, Transition::Entered);
        assert!((enter.payload.progress - 0.1111).abs() < 1e-3);
        assert_eq!(enter.payload.velocity, None);
        assert_eq!(state.visibility, Visibility::In);
        assert_eq!(state.last_scroll_position, Some(200.0));
        assert_eq!(state.last_scroll_timestamp, Some(100.0));

        let stay = apply(&mut state, at(-50.0, 50.0, 950.0), 400.0);
        assert_eq!(stay.transition, Transition::Stayed);
        assert!((stay.payload.progress - 0.9444).abs() < 1e-3);
        // 750 units over 300ms
        assert_eq!(stay.payload.velocity, Some(2.5));

        let exit = apply(&mut state, at(-150.0, -50.0, 1050.0), 500.0);
        assert_eq!(exit.transition, Transition::Exited);
        assert_eq!(exit.payload.progress, 1.0);
        assert_eq!(exit.payload.velocity, Some(1.0));
        assert_eq!(state.visibility, Visibility::Out);
        assert_eq!(state.progress, 1.0);
        assert_eq!(state.last_scroll_position, Some(1050.0));

        // Further out: idle, readings kept from the exit pass
        let idle = apply(&mut state, at(-250.0, -150.0, 1150.0), 600.0);
        assert_eq!(idle.transition, Transition::Idle);
        assert_eq!(state.last_scroll_timestamp, Some(500.0));
    }

    #[test]
    fn test_zero_position_counts_as_reading() {
        let mut state = TriggerState::default();
        apply(&mut state, at(100.0, 200.0, 0.0), 0.0);
        let next = apply(&mut state, at(90.0, 190.0, 10.0), 10.0);
        assert_eq!(next.payload.velocity, Some(1.0));
    }

    #[test]
    fn test_measure_root_uses_larger_height_and_global_scroll() {
        let document = HeadlessDocument::new(800.0, 600.0);
        let element = document.create_element_in(&document.root_area(), "div", 900.0, 100.0);
        document.root_area().set_scroll_top(250.0);

        let root = ContainerRef::Root.resolve(&document).unwrap();
        let m = measure(&document, &root, element.as_ref()).unwrap();

        assert_eq!(m.viewport_end, 800.0);
        assert_eq!(m.position, 250.0);
        assert_eq!(m.rect, ElementRect::new(650.0, 100.0));
    }

    #[test]
    fn test_measure_custom_container() {
        let document = HeadlessDocument::new(800.0, 600.0);
        let feed = document.add_container("#feed", 300.0);
        let element = document.create_element_in(&feed, "li", 400.0, 40.0);
        feed.set_scroll_top(120.0);
        document.root_area().set_scroll_top(999.0);

        let container = ContainerRef::from("#feed").resolve(&document).unwrap();
        let m = measure(&document, &container, element.as_ref()).unwrap();

        assert_eq!(m.viewport_end, 300.0);
        assert_eq!(m.position, 120.0);
        assert_eq!(m.rect.top, 280.0);
    }

    #[test]
    fn test_measure_detached_element_fails() {
        let document = HeadlessDocument::new(800.0, 600.0);
        let element = document.create_element_in(&document.root_area(), "div", 0.0, 10.0);
        element.detach();

        let root = ContainerRef::Root.resolve(&document).unwrap();
        assert!(measure(&document, &root, element.as_ref()).is_err());
    }
}
