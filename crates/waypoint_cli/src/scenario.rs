//! Scenario file handling
//!
//! A scenario describes a headless document, one tracked element, the
//! trigger configuration and a list of steps to replay:
//!
//! ```toml
//! [viewport]
//! inner_height = 800
//! root_height = 800
//!
//! [[containers]]
//! selector = "#feed"
//! client_height = 400
//!
//! [element]
//! top = 900
//! height = 100
//!
//! [trigger]
//! throttle_scroll = 100
//!
//! [[steps]]
//! action = "scroll"
//! to = 200
//! after_ms = 120
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use waypoint_trigger::config::{DEFAULT_THROTTLE_RESIZE_MS, DEFAULT_THROTTLE_SCROLL_MS};
use waypoint_trigger::host::DEFAULT_TAG;
use waypoint_platform::headless::is_root_selector;
use waypoint_trigger::ContainerRef;

/// Selector used when a step names no container
pub const ROOT_SELECTOR: &str = "html";

/// A complete scenario file
#[derive(Debug, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub containers: Vec<ContainerConfig>,
    pub element: ElementConfig,
    #[serde(default)]
    pub trigger: TriggerSettings,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Window and root scroll area
#[derive(Debug, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_height")]
    pub inner_height: f64,
    #[serde(default = "default_height")]
    pub root_height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            inner_height: default_height(),
            root_height: default_height(),
        }
    }
}

fn default_height() -> f64 {
    800.0
}

/// A named scroll container
#[derive(Debug, Deserialize, Serialize)]
pub struct ContainerConfig {
    pub selector: String,
    pub client_height: f64,
}

/// The tracked element
#[derive(Debug, Deserialize, Serialize)]
pub struct ElementConfig {
    /// Offset within the containing scroll area's content
    pub top: f64,
    pub height: f64,
    /// Scroll area the element lives in (default: document root)
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default = "default_tag")]
    pub tag: String,
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

/// Trigger options
#[derive(Debug, Deserialize, Serialize)]
pub struct TriggerSettings {
    /// Container selector (default: document root)
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default = "default_throttle_scroll")]
    pub throttle_scroll: u64,
    #[serde(default = "default_throttle_resize")]
    pub throttle_resize: u64,
    #[serde(default = "default_trigger_on_load")]
    pub trigger_on_load: bool,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            container: None,
            throttle_scroll: default_throttle_scroll(),
            throttle_resize: default_throttle_resize(),
            trigger_on_load: default_trigger_on_load(),
        }
    }
}

fn default_throttle_scroll() -> u64 {
    DEFAULT_THROTTLE_SCROLL_MS
}

fn default_throttle_resize() -> u64 {
    DEFAULT_THROTTLE_RESIZE_MS
}

fn default_trigger_on_load() -> bool {
    true
}

/// One scripted action
///
/// Every step first advances the clock by `after_ms`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Scroll an area to an absolute offset
    Scroll {
        to: f64,
        /// Area to scroll (default: document root)
        #[serde(default)]
        container: Option<String>,
        #[serde(default)]
        after_ms: f64,
    },
    /// Change the window's inner height
    Resize {
        inner_height: f64,
        #[serde(default)]
        after_ms: f64,
    },
    /// Replace parts of the trigger configuration
    Reconfigure {
        #[serde(default)]
        container: Option<String>,
        #[serde(default)]
        throttle_scroll: Option<u64>,
        #[serde(default)]
        throttle_resize: Option<u64>,
        #[serde(default)]
        after_ms: f64,
    },
    /// Force an unthrottled evaluation
    Evaluate {
        #[serde(default)]
        after_ms: f64,
    },
    /// Remove the trigger's listeners
    Detach {
        #[serde(default)]
        after_ms: f64,
    },
}

impl Step {
    pub fn after_ms(&self) -> f64 {
        match self {
            Step::Scroll { after_ms, .. }
            | Step::Resize { after_ms, .. }
            | Step::Reconfigure { after_ms, .. }
            | Step::Evaluate { after_ms }
            | Step::Detach { after_ms } => *after_ms,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::Scroll { .. } => "scroll",
            Step::Resize { .. } => "resize",
            Step::Reconfigure { .. } => "reconfigure",
            Step::Evaluate { .. } => "evaluate",
            Step::Detach { .. } => "detach",
        }
    }
}

/// Map an optional selector to a container reference
///
/// Absent or a root selector means the document root.
pub fn container_ref(selector: Option<&str>) -> ContainerRef {
    match selector {
        Some(selector) if !is_root_selector(selector) => ContainerRef::from(selector),
        _ => ContainerRef::Root,
    }
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check selectors and geometry before running
    pub fn validate(&self) -> Result<()> {
        let mut selectors: HashSet<&str> = HashSet::new();
        for container in &self.containers {
            if is_root_selector(&container.selector) {
                bail!(
                    "Container selector '{}' is reserved for the document root",
                    container.selector
                );
            }
            if !selectors.insert(container.selector.as_str()) {
                bail!("Duplicate container selector '{}'", container.selector);
            }
            if container.client_height < 0.0 {
                bail!(
                    "Container '{}' has negative client height {}",
                    container.selector,
                    container.client_height
                );
            }
        }

        let known = |selector: &Option<String>| match selector.as_deref() {
            None => true,
            Some(s) => is_root_selector(s) || selectors.contains(s),
        };

        if self.element.height <= 0.0 {
            bail!("Element height must be positive, got {}", self.element.height);
        }
        if !known(&self.element.container) {
            bail!("Unknown element container {:?}", self.element.container);
        }
        if !known(&self.trigger.container) {
            bail!("Unknown trigger container {:?}", self.trigger.container);
        }

        for (index, step) in self.steps.iter().enumerate() {
            let number = index + 1;
            if step.after_ms() < 0.0 {
                bail!("Step {} ({}) has negative after_ms", number, step.name());
            }
            match step {
                Step::Scroll { container, .. } | Step::Reconfigure { container, .. }
                    if !known(container) =>
                {
                    bail!(
                        "Step {} ({}) names unknown container {:?}",
                        number,
                        step.name(),
                        container
                    );
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [element]
        top = 900
        height = 100
    "#;

    #[test]
    fn test_defaults() {
        let scenario = Scenario::parse(MINIMAL).unwrap();
        assert_eq!(scenario.viewport.inner_height, 800.0);
        assert_eq!(scenario.viewport.root_height, 800.0);
        assert_eq!(scenario.element.tag, "div");
        assert_eq!(scenario.trigger.throttle_scroll, 100);
        assert_eq!(scenario.trigger.throttle_resize, 100);
        assert!(scenario.trigger.trigger_on_load);
        assert!(scenario.steps.is_empty());
        scenario.validate().unwrap();
    }

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::parse(
            r##"
            [[containers]]
            selector = "#feed"
            client_height = 300

            [element]
            top = 400
            height = 40
            container = "#feed"

            [trigger]
            container = "#feed"
            throttle_scroll = 16

            [[steps]]
            action = "scroll"
            container = "#feed"
            to = 200
            after_ms = 20

            [[steps]]
            action = "resize"
            inner_height = 600

            [[steps]]
            action = "reconfigure"
            container = "html"
            throttle_resize = 50

            [[steps]]
            action = "evaluate"

            [[steps]]
            action = "detach"
            after_ms = 5
            "##,
        )
        .unwrap();

        assert_eq!(scenario.steps.len(), 5);
        assert!(matches!(
            &scenario.steps[0],
            Step::Scroll { to, container: Some(c), after_ms }
                if *to == 200.0 && c == "#feed" && *after_ms == 20.0
        ));
        assert!(matches!(
            &scenario.steps[2],
            Step::Reconfigure { throttle_scroll: None, throttle_resize: Some(50), .. }
        ));
        assert_eq!(scenario.steps[4].after_ms(), 5.0);
        scenario.validate().unwrap();
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result = Scenario::parse(
            r#"
            [element]
            top = 0
            height = 10

            [[steps]]
            action = "teleport"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_unknown_selector() {
        let scenario = Scenario::parse(
            r##"
            [element]
            top = 0
            height = 10

            [trigger]
            container = "#nowhere"
            "##,
        )
        .unwrap();
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("#nowhere"));
    }

    #[test]
    fn test_validate_step_selector_and_height() {
        let scenario = Scenario::parse(
            r##"
            [element]
            top = 0
            height = 10

            [[steps]]
            action = "scroll"
            container = "#nowhere"
            to = 5
            "##,
        )
        .unwrap();
        assert!(scenario.validate().is_err());

        let scenario = Scenario::parse(
            r#"
            [element]
            top = 0
            height = 0
            "#,
        )
        .unwrap();
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_containers() {
        let scenario = Scenario::parse(
            r##"
            [[containers]]
            selector = "#feed"
            client_height = 300

            [[containers]]
            selector = "#feed"
            client_height = 200

            [element]
            top = 0
            height = 10
            "##,
        )
        .unwrap();
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_container_ref_mapping() {
        assert!(container_ref(None).is_root());
        assert!(container_ref(Some("html")).is_root());
        assert!(container_ref(Some(":root")).is_root());
        assert_eq!(container_ref(Some("#feed")), ContainerRef::from("#feed"));
    }

    #[test]
    fn test_every_root_selector_validates() {
        let scenario = Scenario::parse(
            r#"
            [element]
            top = 0
            height = 10
            container = ":root"

            [trigger]
            container = "html"

            [[steps]]
            action = "scroll"
            container = ":root"
            to = 5
            "#,
        )
        .unwrap();
        scenario.validate().unwrap();

        let scenario = Scenario::parse(
            r#"
            [[containers]]
            selector = ":root"
            client_height = 300

            [element]
            top = 0
            height = 10
            "#,
        )
        .unwrap();
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("reserved"), "{err}");
    }
}
