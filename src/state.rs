use launch_dash::data::model::LaunchDataset;
use launch_dash::data::query::{
    self, ALL_SITES, LabeledCounts, QueryError, ScatterPoint, SiteSelector,
};

use crate::color::ColorMap;

/// Payload slider limits and step, in kg.
pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 10_000.0;
pub const SLIDER_STEP: f64 = 1_000.0;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every input change recomputes the affected chart data right away, so the
/// cached results always reflect the latest selection.
pub struct AppState {
    /// Loaded once at startup, never modified.
    pub dataset: LaunchDataset,

    /// Dropdown value, passed to the queries unparsed.
    pub site: String,

    /// Search text typed into the dropdown.
    pub site_search: String,

    /// Payload slider values `[low, high]`.
    pub payload: [f64; 2],

    /// Pie chart data for the current site.
    pub pie: Result<LabeledCounts, QueryError>,

    /// Scatter chart data for the current site and payload range.
    pub scatter: Result<Vec<ScatterPoint>, QueryError>,

    /// Booster category colours for the scatter plot.
    pub color_map: ColorMap,
}

impl AppState {
    pub fn new(dataset: LaunchDataset) -> Self {
        let (low, high) = dataset.payload_bounds().unwrap_or((SLIDER_MIN, SLIDER_MAX));
        let color_map = ColorMap::new(dataset.booster_categories());

        let mut state = Self {
            dataset,
            site: ALL_SITES.to_string(),
            site_search: String::new(),
            payload: [low, high],
            pie: Ok(LabeledCounts::default()),
            scatter: Ok(Vec::new()),
            color_map,
        };
        state.refresh_pie();
        state.refresh_scatter();
        state
    }

    /// The current selection, if the dropdown value is a valid selector.
    pub fn selector(&self) -> Option<SiteSelector> {
        self.site.parse().ok()
    }

    /// Dropdown options whose label contains the search text, ignoring case.
    pub fn site_options(&self) -> Vec<SiteSelector> {
        let needle = self.site_search.trim().to_lowercase();
        SiteSelector::options()
            .filter(|option| option.label().to_lowercase().contains(&needle))
            .collect()
    }

    /// Change the site; both charts depend on it.
    pub fn set_site(&mut self, value: &str) {
        if self.site == value {
            return;
        }
        self.site = value.to_string();
        self.refresh_pie();
        self.refresh_scatter();
    }

    /// Change the payload range; only the scatter chart depends on it.
    pub fn set_payload_range(&mut self, low: f64, high: f64) {
        if self.payload == [low, high] {
            return;
        }
        self.payload = [low, high];
        self.refresh_scatter();
    }

    /// First query error to show the user, if any.
    pub fn status_message(&self) -> Option<String> {
        match (&self.pie, &self.scatter) {
            (Err(e), _) | (_, Err(e)) => Some(format!("Error: {e}")),
            _ => None,
        }
    }

    fn refresh_pie(&mut self) {
        self.pie = query::aggregate(&self.dataset, &self.site);
        match &self.pie {
            Ok(counts) => log::debug!(
                "pie for {}: {} slices, total {}",
                self.site,
                counts.slices.len(),
                counts.total()
            ),
            Err(e) => log::warn!("pie query rejected: {e}"),
        }
    }

    fn refresh_scatter(&mut self) {
        let [low, high] = self.payload;
        self.scatter = query::filter(&self.dataset, &self.site, (low, high));
        match &self.scatter {
            Ok(points) => log::debug!(
                "scatter for {} in [{low}, {high}]: {} points",
                self.site,
                points.len()
            ),
            Err(e) => log::warn!("scatter query rejected: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launch_dash::data::model::{LaunchRecord, LaunchSite, Outcome};
    use launch_dash::data::query::SliceLabel;

    fn dataset() -> LaunchDataset {
        let rec = |site, payload, outcome, cat: &str| LaunchRecord {
            launch_site: site,
            payload_mass_kg: payload,
            outcome,
            booster_category: cat.to_string(),
        };
        LaunchDataset::from_records(vec![
            rec(LaunchSite::CcafsLc40, Some(0.0), Outcome::Failure, "v1.0"),
            rec(LaunchSite::CcafsLc40, Some(2500.0), Outcome::Success, "FT"),
            rec(LaunchSite::KscLc39a, Some(5300.0), Outcome::Success, "FT"),
            rec(LaunchSite::KscLc39a, None, Outcome::Success, "B5"),
            rec(LaunchSite::VafbSlc4e, Some(9600.0), Outcome::Failure, "B4"),
        ])
    }

    #[test]
    fn starts_with_all_sites_and_full_payload_range() {
        let state = AppState::new(dataset());
        assert_eq!(state.site, "ALL");
        assert_eq!(state.selector(), Some(SiteSelector::All));
        assert_eq!(state.payload, [0.0, 9600.0]);

        let pie = state.pie.as_ref().unwrap();
        assert_eq!(pie.get(SliceLabel::Site(LaunchSite::KscLc39a)), Some(2));
        assert_eq!(pie.get(SliceLabel::Site(LaunchSite::VafbSlc4e)), Some(0));
        assert_eq!(state.scatter.as_ref().unwrap().len(), 4);
        assert_eq!(state.status_message(), None);
    }

    #[test]
    fn site_change_updates_both_charts() {
        let mut state = AppState::new(dataset());
        state.set_site("CCAFS LC-40");
        let pie = state.pie.as_ref().unwrap();
        assert_eq!(pie.get(SliceLabel::Outcome(Outcome::Failure)), Some(1));
        assert_eq!(pie.get(SliceLabel::Outcome(Outcome::Success)), Some(1));
        assert_eq!(state.scatter.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn range_change_updates_scatter_only() {
        let mut state = AppState::new(dataset());
        let pie_before = state.pie.clone();
        state.set_payload_range(2000.0, 6000.0);
        assert_eq!(state.pie, pie_before);
        let payloads: Vec<f64> = state
            .scatter
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| p.payload_mass_kg)
            .collect();
        assert_eq!(payloads, vec![2500.0, 5300.0]);
    }

    #[test]
    fn rejected_inputs_become_status_messages() {
        let mut state = AppState::new(dataset());
        state.set_payload_range(5000.0, 1000.0);
        assert!(matches!(state.scatter, Err(QueryError::InvalidRange { .. })));
        assert!(state.pie.is_ok());
        assert!(state.status_message().unwrap().contains("invalid payload range"));

        state.set_payload_range(1000.0, 5000.0);
        assert!(state.scatter.is_ok());

        state.set_site("MARS BASE");
        assert_eq!(state.selector(), None);
        assert!(matches!(state.pie, Err(QueryError::InvalidSelector(_))));
        assert!(matches!(state.scatter, Err(QueryError::InvalidSelector(_))));
    }

    #[test]
    fn site_search_narrows_dropdown_options() {
        let mut state = AppState::new(dataset());
        assert_eq!(state.site_options().len(), 5);

        state.site_search = "ccafs".to_string();
        assert_eq!(
            state.site_options(),
            vec![
                SiteSelector::Site(LaunchSite::CcafsLc40),
                SiteSelector::Site(LaunchSite::CcafsSlc40),
            ]
        );

        state.site_search = " all ".to_string();
        assert_eq!(state.site_options(), vec![SiteSelector::All]);

        state.site_search = "MARS".to_string();
        assert!(state.site_options().is_empty());
        assert_eq!(state.site, "ALL");
    }

    #[test]
    fn dataset_without_payloads_uses_slider_limits() {
        let ds = LaunchDataset::from_records(Vec::new());
        let state = AppState::new(ds);
        assert_eq!(state.payload, [SLIDER_MIN, SLIDER_MAX]);
        assert!(state.pie.as_ref().unwrap().is_empty());
    }
}
