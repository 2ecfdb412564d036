use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::model::{LaunchDataset, LaunchRecord, LaunchSite, Outcome};

/// Selector value meaning "every site".
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejected query input. Never partial: a failed query returns no data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid site selector '{0}'")]
    InvalidSelector(String),
    #[error("invalid payload range [{low}, {high}]: bounds must be finite, non-negative and ordered")]
    InvalidRange { low: f64, high: f64 },
}

// ---------------------------------------------------------------------------
// Inputs: site selector and payload range
// ---------------------------------------------------------------------------

/// Which records a query looks at: all of them, or one site's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteSelector {
    All,
    Site(LaunchSite),
}

impl SiteSelector {
    /// Every selectable value in dropdown order, `All` first.
    pub fn options() -> impl Iterator<Item = SiteSelector> {
        std::iter::once(SiteSelector::All)
            .chain(LaunchSite::DISPLAY_ORDER.into_iter().map(SiteSelector::Site))
    }

    /// The wire value, as accepted by [`SiteSelector::from_str`].
    pub fn value(self) -> &'static str {
        match self {
            SiteSelector::All => ALL_SITES,
            SiteSelector::Site(site) => site.id(),
        }
    }

    /// Human-readable label for the dropdown.
    pub fn label(self) -> &'static str {
        match self {
            SiteSelector::All => "All Sites",
            SiteSelector::Site(site) => site.id(),
        }
    }

    pub fn matches(self, site: LaunchSite) -> bool {
        match self {
            SiteSelector::All => true,
            SiteSelector::Site(selected) => selected == site,
        }
    }

    pub fn pie_title(self) -> String {
        match self {
            SiteSelector::All => "Total Success Launches By Site".to_string(),
            SiteSelector::Site(site) => format!("Total Success Launches for site {site}"),
        }
    }

    pub fn scatter_title(self) -> String {
        match self {
            SiteSelector::All => "Correlation between Payload and Success for all Sites".to_string(),
            SiteSelector::Site(site) => format!("Correlation between Payload and Success for {site}"),
        }
    }
}

impl FromStr for SiteSelector {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_SITES {
            return Ok(SiteSelector::All);
        }
        s.parse::<LaunchSite>()
            .map(SiteSelector::Site)
            .map_err(|_| QueryError::InvalidSelector(s.to_string()))
    }
}

impl fmt::Display for SiteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Closed payload-mass interval `[low, high]` in kg.
///
/// Only constructible through [`PayloadRange::new`], so a value of this type
/// is always finite, non-negative and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self, QueryError> {
        let valid_bound = |v: f64| v.is_finite() && v >= 0.0;
        if !valid_bound(low) || !valid_bound(high) || low > high {
            return Err(QueryError::InvalidRange { low, high });
        }
        Ok(PayloadRange { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Inclusive on both ends. A missing payload never matches.
    pub fn contains(&self, payload_mass_kg: Option<f64>) -> bool {
        match payload_mass_kg {
            Some(mass) => self.low <= mass && mass <= self.high,
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Label of one pie slice: a site in overview mode, an outcome in drill-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum SliceLabel {
    Site(LaunchSite),
    Outcome(Outcome),
}

impl fmt::Display for SliceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceLabel::Site(site) => write!(f, "{site}"),
            SliceLabel::Outcome(outcome) => write!(f, "{outcome}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub label: SliceLabel,
    pub value: u64,
}

/// Pie-chart input: ordered label -> value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabeledCounts {
    pub slices: Vec<Slice>,
}

impl LabeledCounts {
    fn from_map(map: BTreeMap<SliceLabel, u64>) -> Self {
        LabeledCounts {
            slices: map
                .into_iter()
                .map(|(label, value)| Slice { label, value })
                .collect(),
        }
    }

    pub fn get(&self, label: SliceLabel) -> Option<u64> {
        self.slices.iter().find(|s| s.label == label).map(|s| s.value)
    }

    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Scatter-chart input: one retained launch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_category: String,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Records at the selected site, or every record for [`SiteSelector::All`].
/// Preserves load order.
pub fn records_for_site(
    dataset: &LaunchDataset,
    selector: SiteSelector,
) -> impl Iterator<Item = &LaunchRecord> {
    dataset
        .records()
        .iter()
        .filter(move |rec| selector.matches(rec.launch_site))
}

/// Pie-chart aggregate for a validated selector.
///
/// * `All`: successes summed per site, one slice per site present.
/// * one site: record count per outcome at that site.
///
/// The overview is a success count per site, not a success/failure split.
pub fn success_counts(dataset: &LaunchDataset, selector: SiteSelector) -> LabeledCounts {
    let mut counts: BTreeMap<SliceLabel, u64> = BTreeMap::new();

    for rec in records_for_site(dataset, selector) {
        match selector {
            SiteSelector::All => {
                *counts.entry(SliceLabel::Site(rec.launch_site)).or_default() +=
                    u64::from(rec.outcome.as_u8());
            }
            SiteSelector::Site(_) => {
                *counts.entry(SliceLabel::Outcome(rec.outcome)).or_default() += 1;
            }
        }
    }

    LabeledCounts::from_map(counts)
}

/// Scatter points for a validated selector and range, in load order.
pub fn payload_scatter(
    dataset: &LaunchDataset,
    selector: SiteSelector,
    range: PayloadRange,
) -> Vec<ScatterPoint> {
    records_for_site(dataset, selector)
        .filter_map(|rec| {
            let mass = rec.payload_mass_kg.filter(|&m| range.contains(Some(m)))?;
            Some(ScatterPoint {
                payload_mass_kg: mass,
                outcome: rec.outcome,
                booster_category: rec.booster_category.clone(),
            })
        })
        .collect()
}

/// Validate a raw site selector and aggregate for the pie chart.
pub fn aggregate(dataset: &LaunchDataset, site_selector: &str) -> Result<LabeledCounts, QueryError> {
    let selector: SiteSelector = site_selector.parse()?;
    Ok(success_counts(dataset, selector))
}

/// Validate a raw site selector and payload range and filter for the scatter plot.
pub fn filter(
    dataset: &LaunchDataset,
    site_selector: &str,
    payload_range: (f64, f64),
) -> Result<Vec<ScatterPoint>, QueryError> {
    let selector: SiteSelector = site_selector.parse()?;
    let range = PayloadRange::new(payload_range.0, payload_range.1)?;
    Ok(payload_scatter(dataset, selector, range))
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: LaunchSite = LaunchSite::KscLc39a;
    const Y: LaunchSite = LaunchSite::VafbSlc4e;

    fn record(site: LaunchSite, payload: Option<f64>, class: u8, cat: &str) -> LaunchRecord {
        LaunchRecord {
            launch_site: site,
            payload_mass_kg: payload,
            outcome: if class == 1 { Outcome::Success } else { Outcome::Failure },
            booster_category: cat.to_string(),
        }
    }

    /// X: 3 successes out of 5, Y: 1 success out of 2.
    fn two_site_dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            record(X, Some(500.0), 1, "FT"),
            record(Y, Some(9600.0), 0, "v1.1"),
            record(X, Some(1500.0), 0, "FT"),
            record(X, Some(3000.0), 1, "B4"),
            record(X, None, 1, "B5"),
            record(Y, Some(475.0), 1, "B4"),
            record(X, Some(2000.0), 0, "v1.1"),
        ])
    }

    fn mixed_dataset() -> LaunchDataset {
        let mut records = Vec::new();
        let cats = ["v1.0", "v1.1", "FT", "B4", "B5"];
        for i in 0..40u32 {
            let site = LaunchSite::ALL[(i as usize * 7) % 4];
            let payload = if i % 9 == 0 { None } else { Some(f64::from(i) * 237.5) };
            records.push(record(site, payload, (i % 3 == 0) as u8, cats[i as usize % 5]));
        }
        LaunchDataset::from_records(records)
    }

    #[test]
    fn all_sites_sums_successes_per_site() {
        let counts = aggregate(&two_site_dataset(), "ALL").unwrap();
        assert_eq!(
            counts.slices,
            vec![
                Slice { label: SliceLabel::Site(X), value: 3 },
                Slice { label: SliceLabel::Site(Y), value: 1 },
            ]
        );
    }

    #[test]
    fn single_site_counts_each_outcome() {
        let counts = aggregate(&two_site_dataset(), X.id()).unwrap();
        assert_eq!(
            counts.slices,
            vec![
                Slice { label: SliceLabel::Outcome(Outcome::Failure), value: 2 },
                Slice { label: SliceLabel::Outcome(Outcome::Success), value: 3 },
            ]
        );
    }

    #[test]
    fn all_sites_keeps_site_without_successes() {
        let ds = LaunchDataset::from_records(vec![
            record(X, Some(100.0), 1, "FT"),
            record(Y, Some(200.0), 0, "FT"),
        ]);
        let counts = success_counts(&ds, SiteSelector::All);
        assert_eq!(counts.get(SliceLabel::Site(Y)), Some(0));
        assert_eq!(counts.get(SliceLabel::Site(LaunchSite::CcafsLc40)), None);
    }

    #[test]
    fn site_without_records_gives_empty_distribution() {
        let counts = aggregate(&two_site_dataset(), "CCAFS SLC-40").unwrap();
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn site_with_only_successes_has_one_slice() {
        let ds = LaunchDataset::from_records(vec![record(X, None, 1, "FT"), record(X, None, 1, "FT")]);
        let counts = success_counts(&ds, SiteSelector::Site(X));
        assert_eq!(counts.slices.len(), 1);
        assert_eq!(counts.get(SliceLabel::Outcome(Outcome::Success)), Some(2));
    }

    #[test]
    fn filter_keeps_inclusive_range_only() {
        let ds = LaunchDataset::from_records(vec![
            record(X, Some(500.0), 1, "FT"),
            record(X, Some(1500.0), 0, "B4"),
            record(X, Some(3000.0), 1, "B5"),
        ]);
        let points = filter(&ds, X.id(), (1000.0, 2000.0)).unwrap();
        assert_eq!(
            points,
            vec![ScatterPoint {
                payload_mass_kg: 1500.0,
                outcome: Outcome::Failure,
                booster_category: "B4".to_string(),
            }]
        );

        let edges = filter(&ds, X.id(), (500.0, 3000.0)).unwrap();
        assert_eq!(edges.len(), 3);
        let point = filter(&ds, "ALL", (1500.0, 1500.0)).unwrap();
        assert_eq!(point.len(), 1);
    }

    #[test]
    fn filter_excludes_missing_payloads() {
        let ds = two_site_dataset();
        let points = filter(&ds, X.id(), (0.0, f64::MAX)).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(
            points.iter().map(|p| p.payload_mass_kg).collect::<Vec<_>>(),
            vec![500.0, 1500.0, 3000.0, 2000.0]
        );
    }

    #[test]
    fn filter_preserves_load_order_across_sites() {
        let points = filter(&two_site_dataset(), "ALL", (0.0, 10000.0)).unwrap();
        assert_eq!(
            points.iter().map(|p| p.payload_mass_kg).collect::<Vec<_>>(),
            vec![500.0, 9600.0, 1500.0, 3000.0, 475.0, 2000.0]
        );
    }

    #[test]
    fn empty_filter_result_is_not_an_error() {
        let points = filter(&two_site_dataset(), Y.id(), (5000.0, 6000.0)).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = filter(&two_site_dataset(), "ALL", (5.0, 1.0)).unwrap_err();
        assert_eq!(err, QueryError::InvalidRange { low: 5.0, high: 1.0 });
    }

    #[test]
    fn non_finite_or_negative_bounds_are_rejected() {
        assert!(PayloadRange::new(-1.0, 10.0).is_err());
        assert!(PayloadRange::new(0.0, f64::INFINITY).is_err());
        assert!(PayloadRange::new(f64::NAN, 10.0).is_err());
        assert!(PayloadRange::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn unknown_selector_is_rejected_by_both_queries() {
        let ds = two_site_dataset();
        assert_eq!(
            aggregate(&ds, "MARS BASE"),
            Err(QueryError::InvalidSelector("MARS BASE".to_string()))
        );
        assert_eq!(
            filter(&ds, "MARS BASE", (0.0, 1.0)),
            Err(QueryError::InvalidSelector("MARS BASE".to_string()))
        );
        // selector matching is exact
        assert!(aggregate(&ds, "all").is_err());
        assert!(aggregate(&ds, "ksc lc-39a").is_err());
    }

    #[test]
    fn selector_is_checked_before_range() {
        let err = filter(&two_site_dataset(), "MARS BASE", (5.0, 1.0)).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSelector(_)));
    }

    #[test]
    fn success_total_matches_successful_records() {
        let ds = mixed_dataset();
        let successes = ds.records().iter().filter(|r| r.outcome.is_success()).count() as u64;
        assert_eq!(success_counts(&ds, SiteSelector::All).total(), successes);
    }

    #[test]
    fn outcome_split_covers_every_record_at_site() {
        let ds = mixed_dataset();
        for site in LaunchSite::ALL {
            let at_site = ds.records().iter().filter(|r| r.launch_site == site).count() as u64;
            assert_eq!(success_counts(&ds, SiteSelector::Site(site)).total(), at_site);
        }
    }

    #[test]
    fn widening_range_never_drops_points() {
        let ds = mixed_dataset();
        for selector in SiteSelector::options() {
            let mut previous = 0;
            for (low, high) in [(4000.0, 5000.0), (3000.0, 5000.0), (3000.0, 7000.0), (0.0, 10000.0)] {
                let range = PayloadRange::new(low, high).unwrap();
                let n = payload_scatter(&ds, selector, range).len();
                assert!(n >= previous, "{selector}: [{low}, {high}] gave {n} < {previous}");
                previous = n;
            }
        }
    }

    #[test]
    fn site_filter_only_returns_that_site() {
        let ds = mixed_dataset();
        let range = PayloadRange::new(0.0, 10000.0).unwrap();
        for site in LaunchSite::ALL {
            let expected: Vec<f64> = ds
                .records()
                .iter()
                .filter(|r| r.launch_site == site)
                .filter_map(|r| r.payload_mass_kg)
                .collect();
            let got: Vec<f64> = payload_scatter(&ds, SiteSelector::Site(site), range)
                .iter()
                .map(|p| p.payload_mass_kg)
                .collect();
            assert_eq!(got, expected);
            assert!(records_for_site(&ds, SiteSelector::Site(site)).all(|r| r.launch_site == site));
        }
    }

    #[test]
    fn repeated_queries_are_identical() {
        let ds = mixed_dataset();
        for selector in SiteSelector::options() {
            assert_eq!(aggregate(&ds, selector.value()), aggregate(&ds, selector.value()));
            assert_eq!(
                filter(&ds, selector.value(), (1000.0, 6000.0)),
                filter(&ds, selector.value(), (1000.0, 6000.0))
            );
        }
    }

    #[test]
    fn selector_options_and_titles() {
        let values: Vec<&str> = SiteSelector::options().map(SiteSelector::value).collect();
        assert_eq!(
            values,
            vec!["ALL", "CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"]
        );
        assert_eq!(SiteSelector::All.label(), "All Sites");
        assert_eq!(SiteSelector::All.pie_title(), "Total Success Launches By Site");
        assert_eq!(
            SiteSelector::Site(X).pie_title(),
            "Total Success Launches for site KSC LC-39A"
        );
        assert_eq!(
            SiteSelector::Site(Y).scatter_title(),
            "Correlation between Payload and Success for VAFB SLC-4E"
        );
    }

    #[test]
    fn results_serialize_for_renderers() {
        let counts = success_counts(&two_site_dataset(), SiteSelector::All);
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "slices": [
                    { "label": "KSC LC-39A", "value": 3 },
                    { "label": "VAFB SLC-4E", "value": 1 }
                ]
            })
        );
    }
}
