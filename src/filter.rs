//! Filter engine: pure predicates mapping the dataset and the current
//! control values to a borrowed row subset.
//!
//! Both predicates commute; the scatter path applies payload first, then
//! site, as a logical AND. An empty result is valid and flows through to an
//! empty chart, never an error.

use crate::controls::{ControlState, PayloadRange, SiteSelection};
use crate::record::{Dataset, LaunchRecord};

/// All records with `low <= payload_mass_kg <= high`, inclusive on both bounds.
pub fn filter_by_payload<'a>(
    records: impl IntoIterator<Item = &'a LaunchRecord>,
    range: PayloadRange,
) -> Vec<&'a LaunchRecord> {
    records
        .into_iter()
        .filter(|r| range.contains(r.payload_mass_kg))
        .collect()
}

/// All records matching the site selection. `All` passes the input through
/// unchanged; a site absent from the data yields an empty set.
pub fn filter_by_site<'a>(
    records: impl IntoIterator<Item = &'a LaunchRecord>,
    selection: &SiteSelection,
) -> Vec<&'a LaunchRecord> {
    let records = records.into_iter();
    match selection {
        SiteSelection::All => records.collect(),
        SiteSelection::Site(site) => records.filter(|r| &r.site == site).collect(),
    }
}

/// Scatter-path composition: payload range, then site.
pub fn scatter_rows<'a>(dataset: &'a Dataset, controls: &ControlState) -> Vec<&'a LaunchRecord> {
    let by_payload = filter_by_payload(dataset.records(), controls.payload);
    filter_by_site(by_payload, &controls.site)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Outcome;

    fn rec(site: &str, payload: f64, class: u8) -> LaunchRecord {
        LaunchRecord {
            site: site.to_string(),
            payload_mass_kg: payload,
            booster_category: "v1.1".to_string(),
            outcome: Outcome::from_class(class).unwrap(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            rec("A", 500.0, 1),
            rec("A", 3000.0, 0),
            rec("B", 4000.0, 1),
        ])
    }

    #[test]
    fn test_payload_filter_inclusive_bounds() {
        let ds = dataset();
        let range = PayloadRange::new(500.0, 3000.0).unwrap();
        let rows = filter_by_payload(ds.records(), range);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| range.contains(r.payload_mass_kg)));
    }

    #[test]
    fn test_site_filter_partitions_dataset() {
        let ds = dataset();
        let sel = SiteSelection::Site("A".to_string());
        let matching = filter_by_site(ds.records(), &sel);
        assert!(matching.iter().all(|r| r.site == "A"));
        let complement = ds.records().iter().filter(|r| r.site != "A").count();
        assert_eq!(matching.len() + complement, ds.len());
    }

    #[test]
    fn test_site_filter_all_passthrough() {
        let ds = dataset();
        let rows = filter_by_site(ds.records(), &SiteSelection::All);
        assert_eq!(rows.len(), ds.len());
    }

    #[test]
    fn test_unknown_site_yields_empty() {
        let ds = dataset();
        let sel = SiteSelection::Site("NOWHERE".to_string());
        let rows = filter_by_site(ds.records(), &sel);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_scatter_rows_composed_and() {
        let ds = dataset();
        let controls = ControlState {
            site: SiteSelection::Site("A".to_string()),
            payload: PayloadRange::new(1000.0, 5000.0).unwrap(),
        };
        let rows = scatter_rows(&ds, &controls);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].payload_mass_kg, 3000.0);
        assert_eq!(rows[0].site, "A");
    }

    #[test]
    fn test_predicates_commute() {
        let ds = dataset();
        let range = PayloadRange::new(0.0, 5000.0).unwrap();
        let sel = SiteSelection::Site("B".to_string());
        let payload_then_site = filter_by_site(filter_by_payload(ds.records(), range), &sel);
        let site_then_payload = filter_by_payload(filter_by_site(ds.records(), &sel), range);
        assert_eq!(payload_then_site, site_then_payload);
    }

    #[test]
    fn test_empty_range_is_silent() {
        let ds = dataset();
        let controls = ControlState {
            site: SiteSelection::All,
            payload: PayloadRange::new(0.0, 0.0).unwrap(),
        };
        let rows = scatter_rows(&ds, &controls);
        assert!(rows.is_empty());
    }
}
