//! Scenario runner
//!
//! Builds a headless document from a [`Scenario`], mounts a scroll trigger
//! on the described element and replays the steps against a manual clock,
//! recording every callback the trigger raises.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::{debug, info};
use waypoint_core::{Clock, ManualClock, ScrollProgress};
use waypoint_platform::headless::{HeadlessDocument, HeadlessScrollArea};
use waypoint_trigger::{Component, ScrollTrigger, TriggerConfig};

use crate::scenario::{container_ref, Scenario, Step, ROOT_SELECTOR};

/// Which callback fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackKind {
    Enter,
    Progress,
    Exit,
}

impl CallbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackKind::Enter => "enter",
            CallbackKind::Progress => "progress",
            CallbackKind::Exit => "exit",
        }
    }
}

/// One recorded callback invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Step that caused it (0 = mount)
    pub step: usize,
    /// Clock reading when it fired
    pub at_ms: f64,
    pub callback: CallbackKind,
    pub progress: f64,
    pub velocity: Option<f64>,
    /// Trigger state as seen from inside the callback
    pub in_viewport: bool,
}

type Records = Rc<RefCell<Vec<Record>>>;

/// Callback that appends to `records`
fn recorder(
    kind: CallbackKind,
    records: Records,
    step: Rc<Cell<usize>>,
    clock: ManualClock,
) -> impl Fn(&ScrollProgress, &ScrollTrigger) + 'static {
    move |payload: &ScrollProgress, trigger: &ScrollTrigger| {
        records.borrow_mut().push(Record {
            step: step.get(),
            at_ms: clock.now_ms(),
            callback: kind,
            progress: payload.progress,
            velocity: payload.velocity,
            in_viewport: trigger.in_viewport(),
        });
    }
}

/// A mounted scenario ready to replay steps
pub struct Simulation {
    document: Rc<HeadlessDocument>,
    clock: ManualClock,
    trigger: ScrollTrigger,
    records: Records,
    step: Rc<Cell<usize>>,
}

impl Simulation {
    /// Build the document and mount the trigger
    pub fn new(scenario: &Scenario) -> Result<Self> {
        let document = Rc::new(HeadlessDocument::new(
            scenario.viewport.inner_height,
            scenario.viewport.root_height,
        ));
        for container in &scenario.containers {
            document.add_container(container.selector.clone(), container.client_height);
        }

        let element_area = area(&document, scenario.element.container.as_deref())?;
        let element = document.create_element_in(
            &element_area,
            scenario.element.tag.clone(),
            scenario.element.top,
            scenario.element.height,
        );

        let clock = ManualClock::new(0.0);
        let records: Records = Rc::new(RefCell::new(Vec::new()));
        let step = Rc::new(Cell::new(0));

        let settings = &scenario.trigger;
        let config = TriggerConfig::new()
            .container(container_ref(settings.container.as_deref()))
            .throttle_scroll(settings.throttle_scroll)
            .throttle_resize(settings.throttle_resize)
            .trigger_on_mount(settings.trigger_on_load)
            .on_enter(recorder(
                CallbackKind::Enter,
                records.clone(),
                step.clone(),
                clock.clone(),
            ))
            .on_progress(recorder(
                CallbackKind::Progress,
                records.clone(),
                step.clone(),
                clock.clone(),
            ))
            .on_exit(recorder(
                CallbackKind::Exit,
                records.clone(),
                step.clone(),
                clock.clone(),
            ));

        let trigger = ScrollTrigger::mount(
            &document,
            Rc::new(clock.clone()),
            Component::from(element),
            config,
        )
        .context("Failed to mount scroll trigger")?;

        debug!(trigger = ?trigger, "mounted");

        Ok(Self {
            document,
            clock,
            trigger,
            records,
            step,
        })
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    /// Replay one step; `number` is 1-based
    pub fn apply(&self, number: usize, step: &Step) -> Result<()> {
        self.step.set(number);
        self.clock.advance(step.after_ms());
        let now = self.clock.now_ms();
        debug!(step = number, action = step.name(), at_ms = now, "step");

        match step {
            Step::Scroll { to, container, .. } => {
                let area = area(&self.document, container.as_deref())?;
                area.scroll_to(*to, now)?;
            }
            Step::Resize { inner_height, .. } => {
                self.document.resize(*inner_height, now)?;
            }
            Step::Reconfigure {
                container,
                throttle_scroll,
                throttle_resize,
                ..
            } => {
                let mut config = self.trigger.config();
                if let Some(selector) = container {
                    config = config.container(container_ref(Some(selector)));
                }
                if let Some(ms) = throttle_scroll {
                    config = config.throttle_scroll(*ms);
                }
                if let Some(ms) = throttle_resize {
                    config = config.throttle_resize(*ms);
                }
                self.trigger.reconfigure(config)?;
            }
            Step::Evaluate { .. } => self.trigger.evaluate()?,
            Step::Detach { .. } => self.trigger.detach()?,
        }
        Ok(())
    }

    /// Everything recorded so far
    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }
}

/// Scroll area for a selector (absent = document root)
fn area(document: &HeadlessDocument, selector: Option<&str>) -> Result<Rc<HeadlessScrollArea>> {
    let selector = selector.unwrap_or(ROOT_SELECTOR);
    document
        .area(selector)
        .ok_or_else(|| anyhow!("Unknown container '{}'", selector))
}

/// Run a whole scenario and return the recorded callbacks
pub fn run(scenario: &Scenario) -> Result<Vec<Record>> {
    let simulation = Simulation::new(scenario)?;

    for (index, step) in scenario.steps.iter().enumerate() {
        let number = index + 1;
        simulation
            .apply(number, step)
            .with_context(|| format!("Step {} ({}) failed", number, step.name()))?;
    }

    let records = simulation.records();
    info!(
        steps = scenario.steps.len(),
        callbacks = records.len(),
        in_viewport = simulation.trigger().in_viewport(),
        "scenario finished"
    );
    Ok(records)
}
