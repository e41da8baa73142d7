//! Live control values for the two dashboard inputs, plus process config.
//!
//! Control state is owned by the binding layer; the pure selection functions
//! receive it as plain arguments and retain nothing between calls.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::record::Dataset;

/// Sentinel value the site selector emits for the all-sites view.
pub const ALL_SITES: &str = "ALL";

/// Fixed display scale of the payload slider. Deliberately independent of
/// actual dataset bounds; only the default *value* tracks the data.
pub const SLIDER_MIN_KG: f64 = 0.0;
pub const SLIDER_MAX_KG: f64 = 10_000.0;
pub const SLIDER_STEP_KG: f64 = 1_000.0;
pub const SLIDER_MARKS_KG: [f64; 5] = [0.0, 2_500.0, 5_000.0, 7_500.0, 10_000.0];

/// Site selector value: the ALL sentinel or a concrete site name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSelection {
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a selector value as emitted by the control surface.
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SiteSelection::All)
    }
}

/// Closed payload interval, inclusive on both bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if low > high {
            bail!("invalid payload range: low {} > high {}", low, high);
        }
        Ok(Self { low, high })
    }

    /// Default slider value on load: the actual dataset bounds.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let (low, high) = dataset.payload_bounds();
        Self { low, high }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, payload_kg: f64) -> bool {
        payload_kg >= self.low && payload_kg <= self.high
    }
}

/// The two live input values the reactive core is invoked with.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

impl ControlState {
    /// Initial state on page load: all sites, full dataset payload span.
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            site: SiteSelection::All,
            payload: PayloadRange::from_dataset(dataset),
        }
    }
}

/// Descriptor of the payload slider for the control surface: fixed display
/// scale, dataset-derived default value.
#[derive(Debug, Clone, Serialize)]
pub struct SliderDescriptor {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: Vec<f64>,
    pub value: (f64, f64),
}

pub fn slider_descriptor(dataset: &Dataset) -> SliderDescriptor {
    let (lo, hi) = dataset.payload_bounds();
    SliderDescriptor {
        min: SLIDER_MIN_KG,
        max: SLIDER_MAX_KG,
        step: SLIDER_STEP_KG,
        marks: SLIDER_MARKS_KG.to_vec(),
        value: (lo, hi),
    }
}

#[derive(Clone)]
pub struct Config {
    pub csv_path: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            csv_path: std::env::var("CSV_PATH")
                .unwrap_or_else(|_| "data/launch_records.csv".to_string()),
            port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8050),
        }
    }
}
