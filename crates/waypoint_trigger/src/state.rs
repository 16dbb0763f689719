//! Mutable tracker state

use waypoint_core::Visibility;

/// Readings kept between evaluation passes
///
/// Starts out of viewport with no scroll history. Only the evaluator
/// mutates the readings; the listener manager owns `uses_custom_container`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggerState {
    /// Whether listeners target a custom container rather than the default root
    pub uses_custom_container: bool,
    /// Membership decided by the last non-idle pass
    pub visibility: Visibility,
    /// Progress reported by the last non-idle pass, in [0, 1]
    pub progress: f64,
    /// Scroll offset at the last non-idle pass
    pub last_scroll_position: Option<f64>,
    /// Clock reading at the last non-idle pass (milliseconds)
    pub last_scroll_timestamp: Option<f64>,
}

impl TriggerState {
    pub fn in_viewport(&self) -> bool {
        self.visibility.is_in()
    }

    /// Store the readings of a non-idle pass
    pub(crate) fn record(
        &mut self,
        visibility: Visibility,
        progress: f64,
        position: f64,
        now_ms: f64,
    ) {
        self.visibility = visibility;
        self.progress = progress;
        self.last_scroll_position = Some(position);
        self.last_scroll_timestamp = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = TriggerState::default();
        assert!(!state.in_viewport());
        assert!(!state.uses_custom_container);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.last_scroll_position, None);
        assert_eq!(state.last_scroll_timestamp, None);
    }

    #[test]
    fn test_record() {
        let mut state = TriggerState::default();
        state.record(Visibility::In, 0.25, 120.0, 16.0);

        assert!(state.in_viewport());
        assert_eq!(state.progress, 0.25);
        assert_eq!(state.last_scroll_position, Some(120.0));
        assert_eq!(state.last_scroll_timestamp, Some(16.0));
    }
}
