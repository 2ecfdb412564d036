use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// LaunchSite – the fixed set of known launch sites
// ---------------------------------------------------------------------------

/// A known launch site.
///
/// Variants are declared in id order, so grouping by `LaunchSite` in a
/// `BTreeMap` yields the same order as grouping by the id string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LaunchSite {
    #[serde(rename = "CCAFS LC-40")]
    CcafsLc40,
    #[serde(rename = "CCAFS SLC-40")]
    CcafsSlc40,
    #[serde(rename = "KSC LC-39A")]
    KscLc39a,
    #[serde(rename = "VAFB SLC-4E")]
    VafbSlc4e,
}

impl LaunchSite {
    pub const ALL: [LaunchSite; 4] = [
        LaunchSite::CcafsLc40,
        LaunchSite::CcafsSlc40,
        LaunchSite::KscLc39a,
        LaunchSite::VafbSlc4e,
    ];

    /// Order in which sites are offered for selection.
    pub const DISPLAY_ORDER: [LaunchSite; 4] = [
        LaunchSite::CcafsLc40,
        LaunchSite::VafbSlc4e,
        LaunchSite::KscLc39a,
        LaunchSite::CcafsSlc40,
    ];

    /// The site id as it appears in the source data.
    pub fn id(self) -> &'static str {
        match self {
            LaunchSite::CcafsLc40 => "CCAFS LC-40",
            LaunchSite::CcafsSlc40 => "CCAFS SLC-40",
            LaunchSite::KscLc39a => "KSC LC-39A",
            LaunchSite::VafbSlc4e => "VAFB SLC-4E",
        }
    }
}

impl FromStr for LaunchSite {
    type Err = UnknownSite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LaunchSite::ALL
            .into_iter()
            .find(|site| site.id() == s)
            .ok_or_else(|| UnknownSite(s.to_string()))
    }
}

impl fmt::Display for LaunchSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a site id is not one of [`LaunchSite::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown launch site '{0}'")]
pub struct UnknownSite(pub String);

// ---------------------------------------------------------------------------
// Outcome – the `class` column
// ---------------------------------------------------------------------------

/// Binary launch outcome. Orders failure before success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// `0` for failure, `1` for success.
    pub fn as_u8(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    /// Interpret a numeric `class` cell. Only exact `0` and `1` are accepted.
    pub fn from_class(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Outcome::Failure)
        } else if value == 1.0 {
            Some(Outcome::Success)
        } else {
            None
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: LaunchSite,
    /// `None` when the source cell is empty, null or NaN.
    pub payload_mass_kg: Option<f64>,
    pub outcome: Outcome,
    /// Display-only grouping key for chart colours.
    pub booster_category: String,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    payload_bounds: Option<(f64, f64)>,
    sites: BTreeSet<LaunchSite>,
    booster_categories: BTreeSet<String>,
}

impl LaunchDataset {
    /// Build the dataset and its derived indices from loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut payload_bounds: Option<(f64, f64)> = None;
        let mut sites = BTreeSet::new();
        let mut booster_categories = BTreeSet::new();

        for rec in &records {
            sites.insert(rec.launch_site);
            booster_categories.insert(rec.booster_category.clone());
            if let Some(mass) = rec.payload_mass_kg {
                payload_bounds = Some(match payload_bounds {
                    Some((lo, hi)) => (lo.min(mass), hi.max(mass)),
                    None => (mass, mass),
                });
            }
        }

        LaunchDataset {
            records,
            payload_bounds,
            sites,
            booster_categories,
        }
    }

    /// All records in load order.
    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// `(min_payload, max_payload)` over records with a known payload.
    pub fn payload_bounds(&self) -> Option<(f64, f64)> {
        self.payload_bounds
    }

    /// Sites that actually occur in the data.
    pub fn sites(&self) -> &BTreeSet<LaunchSite> {
        &self.sites
    }

    /// Distinct booster categories, sorted.
    pub fn booster_categories(&self) -> &BTreeSet<String> {
        &self.booster_categories
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
