//! Chart selector: pure functions from filtered rows and control values to
//! renderer-agnostic chart specifications.
//!
//! A `ChartSpec` carries only data series and a title; rasterization belongs
//! to whatever rendering collaborator consumes it.

use serde::Serialize;

use crate::controls::SiteSelection;
use crate::record::{Dataset, LaunchRecord, Outcome};

pub const PIE_TITLE_ALL: &str = "Total Success Launches by Site";
pub const SCATTER_TITLE_ALL: &str = "Correlation between Payload and Success for all sites.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: u8,
    pub color_label: String,
}

/// Tagged chart description handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie {
        title: String,
        categories: Vec<PieSlice>,
    },
    Scatter {
        title: String,
        points: Vec<ScatterPoint>,
    },
}

/// Count occurrences of a label, preserving first-seen order within a render.
fn count_grouped<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<PieSlice> {
    let mut slices: Vec<PieSlice> = Vec::new();
    for label in labels {
        if let Some(idx) = slices.iter().position(|s| s.label == label) {
            slices[idx].count += 1;
        } else {
            slices.push(PieSlice { label: label.to_string(), count: 1 });
        }
    }
    slices
}

/// Pie chart selection. Operates on the full dataset: the pie ignores the
/// payload slider by design.
///
/// For `All`, one category per site counting successful launches only; for a
/// concrete site, success/failure counts for that site.
pub fn success_pie(dataset: &Dataset, selection: &SiteSelection) -> ChartSpec {
    match selection {
        SiteSelection::All => {
            let categories = count_grouped(
                dataset
                    .records()
                    .iter()
                    .filter(|r| r.outcome == Outcome::Success)
                    .map(|r| r.site.as_str()),
            );
            ChartSpec::Pie { title: PIE_TITLE_ALL.to_string(), categories }
        }
        SiteSelection::Site(site) => {
            let categories = count_grouped(
                dataset
                    .records()
                    .iter()
                    .filter(|r| &r.site == site)
                    .map(|r| r.outcome.label()),
            );
            ChartSpec::Pie {
                title: format!("Total success launches for site {}", site),
                categories,
            }
        }
    }
}

/// Scatter chart selection over rows the filter engine already reduced.
/// Every surviving row yields exactly one point; duplicates are preserved.
pub fn payload_scatter(rows: &[&LaunchRecord], selection: &SiteSelection) -> ChartSpec {
    let points = rows
        .iter()
        .map(|r| ScatterPoint {
            payload_mass_kg: r.payload_mass_kg,
            outcome: r.outcome.as_u8(),
            color_label: r.booster_category.clone(),
        })
        .collect();
    let title = match selection {
        SiteSelection::All => SCATTER_TITLE_ALL.to_string(),
        SiteSelection::Site(site) => {
            format!("Correlation between Payload and Success for {}.", site)
        }
    };
    ChartSpec::Scatter { title, points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{ControlState, PayloadRange};
    use crate::filter::scatter_rows;

    fn rec(site: &str, payload: f64, class: u8, booster: &str) -> LaunchRecord {
        LaunchRecord {
            site: site.to_string(),
            payload_mass_kg: payload,
            booster_category: booster.to_string(),
            outcome: Outcome::from_class(class).unwrap(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            rec("A", 500.0, 1, "v1"),
            rec("A", 3000.0, 0, "v1"),
            rec("B", 4000.0, 1, "v2"),
        ])
    }

    #[test]
    fn test_all_sites_pie_counts_successes_per_site() {
        let ds = dataset();
        let spec = success_pie(&ds, &SiteSelection::All);
        match spec {
            ChartSpec::Pie { title, categories } => {
                assert_eq!(title, "Total Success Launches by Site");
                assert_eq!(
                    categories,
                    vec![
                        PieSlice { label: "A".to_string(), count: 1 },
                        PieSlice { label: "B".to_string(), count: 1 },
                    ]
                );
            }
            other => panic!("expected pie, got {:?}", other),
        }
    }

    #[test]
    fn test_all_sites_pie_sum_equals_total_successes() {
        let ds = dataset();
        let spec = success_pie(&ds, &SiteSelection::All);
        let ChartSpec::Pie { categories, .. } = spec else { panic!("expected pie") };
        let total: u64 = categories.iter().map(|c| c.count).sum();
        assert_eq!(total as usize, ds.success_count());
    }

    #[test]
    fn test_single_site_pie_groups_by_outcome() {
        let ds = dataset();
        let spec = success_pie(&ds, &SiteSelection::Site("A".to_string()));
        let ChartSpec::Pie { title, categories } = spec else { panic!("expected pie") };
        assert_eq!(title, "Total success launches for site A");
        // First-seen order: site A's first row is a success.
        assert_eq!(
            categories,
            vec![
                PieSlice { label: "1".to_string(), count: 1 },
                PieSlice { label: "0".to_string(), count: 1 },
            ]
        );
        let total: u64 = categories.iter().map(|c| c.count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_unknown_site_pie_is_empty_not_error() {
        let ds = dataset();
        let spec = success_pie(&ds, &SiteSelection::Site("NOWHERE".to_string()));
        let ChartSpec::Pie { categories, .. } = spec else { panic!("expected pie") };
        assert!(categories.is_empty());
    }

    #[test]
    fn test_scatter_all_sites_full_range() {
        let ds = dataset();
        let controls = ControlState {
            site: SiteSelection::All,
            payload: PayloadRange::new(0.0, 5000.0).unwrap(),
        };
        let rows = scatter_rows(&ds, &controls);
        let spec = payload_scatter(&rows, &controls.site);
        let ChartSpec::Scatter { title, points } = spec else { panic!("expected scatter") };
        assert_eq!(title, "Correlation between Payload and Success for all sites.");
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_scatter_site_a_narrow_range() {
        let ds = dataset();
        let controls = ControlState {
            site: SiteSelection::Site("A".to_string()),
            payload: PayloadRange::new(1000.0, 5000.0).unwrap(),
        };
        let rows = scatter_rows(&ds, &controls);
        let spec = payload_scatter(&rows, &controls.site);
        let ChartSpec::Scatter { title, points } = spec else { panic!("expected scatter") };
        assert_eq!(title, "Correlation between Payload and Success for A.");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].payload_mass_kg, 3000.0);
        assert_eq!(points[0].outcome, 0);
        assert_eq!(points[0].color_label, "v1");
    }

    #[test]
    fn test_scatter_preserves_duplicate_payloads() {
        let ds = Dataset::new(vec![
            rec("A", 2500.0, 1, "v1"),
            rec("A", 2500.0, 0, "v2"),
        ]);
        let controls = ControlState {
            site: SiteSelection::All,
            payload: PayloadRange::new(0.0, 5000.0).unwrap(),
        };
        let rows = scatter_rows(&ds, &controls);
        let spec = payload_scatter(&rows, &controls.site);
        let ChartSpec::Scatter { points, .. } = spec else { panic!("expected scatter") };
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_selectors_idempotent() {
        let ds = dataset();
        let sel = SiteSelection::Site("A".to_string());
        assert_eq!(success_pie(&ds, &sel), success_pie(&ds, &sel));

        let controls = ControlState {
            site: sel.clone(),
            payload: PayloadRange::new(0.0, 10_000.0).unwrap(),
        };
        let rows = scatter_rows(&ds, &controls);
        assert_eq!(payload_scatter(&rows, &sel), payload_scatter(&rows, &sel));
    }

    #[test]
    fn test_zero_width_range_gives_empty_well_formed_specs() {
        let ds = dataset();
        let controls = ControlState {
            site: SiteSelection::All,
            payload: PayloadRange::new(0.0, 0.0).unwrap(),
        };
        let rows = scatter_rows(&ds, &controls);
        let spec = payload_scatter(&rows, &controls.site);
        let ChartSpec::Scatter { title, points } = spec else { panic!("expected scatter") };
        assert!(points.is_empty());
        assert!(!title.is_empty());
    }

    #[test]
    fn test_chart_spec_serializes_tagged() {
        let spec = ChartSpec::Pie {
            title: "t".to_string(),
            categories: vec![PieSlice { label: "A".to_string(), count: 3 }],
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "pie");
        assert_eq!(json["categories"][0]["label"], "A");
        assert_eq!(json["categories"][0]["count"], 3);
    }
}
