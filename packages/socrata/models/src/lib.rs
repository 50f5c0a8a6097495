#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for querying the City of Chicago Socrata portal.
//!
//! A [`SearchArea`] describes the circle every query is restricted to, and
//! [`Dataset`] names the open-data tables the digest is built from.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single row as returned by the SODA API, before any typing.
///
/// Socrata serializes nearly every column as a JSON string, and omits
/// columns that are null for a given row.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// The circular area around a point that all queries are restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArea {
    /// Latitude of the center point (WGS84).
    pub latitude: f64,
    /// Longitude of the center point (WGS84).
    pub longitude: f64,
    /// Radius around the center point, in meters.
    pub radius_meters: u32,
}

impl SearchArea {
    /// Creates a new search area.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, radius_meters: u32) -> Self {
        Self {
            latitude,
            longitude,
            radius_meters,
        }
    }
}

/// The Chicago open-data tables included in the digest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dataset {
    /// Business Licenses
    BusinessLicenses,
    /// Food Inspections
    FoodInspections,
    /// Film Permits
    FilmingPermits,
}

impl Dataset {
    /// Returns the Socrata four-by-four identifier of this dataset.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::BusinessLicenses => "uupf-x98q",
            Self::FoodInspections => "4ijn-s7e5",
            Self::FilmingPermits => "c2az-nhru",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn dataset_ids_are_four_by_four() {
        for dataset in [
            Dataset::BusinessLicenses,
            Dataset::FoodInspections,
            Dataset::FilmingPermits,
        ] {
            let id = dataset.id();
            assert_eq!(id.len(), 9, "{dataset}");
            assert_eq!(id.as_bytes()[4], b'-', "{dataset}");
        }
    }

    #[test]
    fn dataset_names_round_trip_through_strum() {
        assert_eq!(Dataset::FoodInspections.to_string(), "food_inspections");
        assert_eq!(
            Dataset::from_str("filming_permits").unwrap(),
            Dataset::FilmingPermits
        );
    }
}
