//! Typed launch records and the immutable in-memory dataset.
//!
//! The dataset is loaded once at startup and never mutated afterwards;
//! every downstream consumer works on borrowed views.

use serde::Serialize;

/// Binary launch outcome, parsed from the CSV `class` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(Outcome::Failure),
            1 => Some(Outcome::Success),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    /// Category label for the per-site pie chart ("0" / "1").
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Failure => "0",
            Outcome::Success => "1",
        }
    }
}

/// One row of the dataset: a single launch attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub site: String,
    pub payload_mass_kg: f64,
    /// Booster variant grouping, used only as the scatter color dimension.
    pub booster_category: String,
    pub outcome: Outcome,
}

/// Immutable collection of launch records with derived lookups.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    sites: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        for r in &records {
            if !sites.iter().any(|s| s == &r.site) {
                sites.push(r.site.clone());
            }
        }
        Self { records, sites }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct site names in first-seen order.
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }

    /// (min, max) payload over all records; (0.0, 0.0) for an empty dataset.
    pub fn payload_bounds(&self) -> (f64, f64) {
        let mut it = self.records.iter().map(|r| r.payload_mass_kg);
        match it.next() {
            Some(first) => it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))),
            None => (0.0, 0.0),
        }
    }

    pub fn success_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == Outcome::Success)
            .count()
    }
}
