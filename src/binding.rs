//! Reactive binding: control events in, chart spec updates out.
//!
//! Replaces framework-style callback decorators with an explicit observer
//! layer. State transitions are a pure step function
//! `(ControlState, ControlEvent) -> (ControlState, affected slots)`; the
//! binding owns the live state, recomputes affected slots through the filter
//! engine and chart selector, and invokes any registered per-slot handlers.

use crate::charts::{payload_scatter, success_pie, ChartSpec};
use crate::controls::{ControlState, PayloadRange, SiteSelection};
use crate::filter::scatter_rows;
use crate::logging::log_control_event;
use crate::record::Dataset;

/// A change emitted by one of the two controls.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SiteSelected(SiteSelection),
    PayloadAdjusted(PayloadRange),
}

impl ControlEvent {
    fn control_name(&self) -> &'static str {
        match self {
            ControlEvent::SiteSelected(_) => "site-dropdown",
            ControlEvent::PayloadAdjusted(_) => "payload-slider",
        }
    }

    fn value_label(&self) -> String {
        match self {
            ControlEvent::SiteSelected(SiteSelection::All) => "ALL".to_string(),
            ControlEvent::SiteSelected(SiteSelection::Site(s)) => s.clone(),
            ControlEvent::PayloadAdjusted(r) => format!("[{}, {}]", r.low(), r.high()),
        }
    }
}

/// The two chart output slots of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSlot {
    SuccessPie,
    PayloadScatter,
}

/// Slots a control change invalidates. The pie only reads the site selector;
/// the scatter reads both controls.
pub fn affected_slots(event: &ControlEvent) -> &'static [OutputSlot] {
    match event {
        ControlEvent::SiteSelected(_) => &[OutputSlot::SuccessPie, OutputSlot::PayloadScatter],
        ControlEvent::PayloadAdjusted(_) => &[OutputSlot::PayloadScatter],
    }
}

/// Pure step function: apply an event to the control state.
pub fn step(mut controls: ControlState, event: &ControlEvent) -> ControlState {
    match event {
        ControlEvent::SiteSelected(site) => controls.site = site.clone(),
        ControlEvent::PayloadAdjusted(range) => controls.payload = *range,
    }
    controls
}

/// Render one output slot for the given control values. Pure and stateless;
/// identical inputs always produce an identical spec.
pub fn render(dataset: &Dataset, controls: &ControlState, slot: OutputSlot) -> ChartSpec {
    match slot {
        OutputSlot::SuccessPie => success_pie(dataset, &controls.site),
        OutputSlot::PayloadScatter => {
            let rows = scatter_rows(dataset, controls);
            payload_scatter(&rows, &controls.site)
        }
    }
}

type SlotHandler<'d> = Box<dyn FnMut(&ChartSpec) + 'd>;

/// Owns the live control state and the slot subscriptions. The dataset is
/// injected by reference and never mutated.
pub struct DashboardBinding<'d> {
    dataset: &'d Dataset,
    controls: ControlState,
    handlers: Vec<(OutputSlot, SlotHandler<'d>)>,
}

impl<'d> DashboardBinding<'d> {
    pub fn new(dataset: &'d Dataset) -> Self {
        Self {
            dataset,
            controls: ControlState::initial(dataset),
            handlers: Vec::new(),
        }
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    /// Register a handler invoked with every fresh spec for `slot`.
    pub fn subscribe(&mut self, slot: OutputSlot, handler: impl FnMut(&ChartSpec) + 'd) {
        self.handlers.push((slot, Box::new(handler)));
    }

    /// Both slots rendered with the current control values (page load).
    pub fn initial_render(&mut self) -> Vec<(OutputSlot, ChartSpec)> {
        self.emit(&[OutputSlot::SuccessPie, OutputSlot::PayloadScatter])
    }

    /// Apply a control change: advance the state, recompute the invalidated
    /// slots, notify subscribers, and return the updates.
    pub fn dispatch(&mut self, event: ControlEvent) -> Vec<(OutputSlot, ChartSpec)> {
        self.controls = step(self.controls.clone(), &event);
        let slots = affected_slots(&event);
        let updates = self.emit(slots);
        log_control_event(event.control_name(), &event.value_label(), updates.len());
        updates
    }

    fn emit(&mut self, slots: &[OutputSlot]) -> Vec<(OutputSlot, ChartSpec)> {
        let mut updates = Vec::with_capacity(slots.len());
        for &slot in slots {
            let spec = render(self.dataset, &self.controls, slot);
            for (subscribed, handler) in self.handlers.iter_mut() {
                if *subscribed == slot {
                    handler(&spec);
                }
            }
            updates.push((slot, spec));
        }
        updates
    }
}
