//! Restaurant food inspection results.
//!
//! Dataset: <https://data.cityofchicago.org/resource/4ijn-s7e5>

use chi_updates_report_models::{Table, TableRow};
use chi_updates_socrata::filter::{
    DEFAULT_LOCATION_FIELD, DEFAULT_WINDOW_DAYS, FilterError, Predicate, membership_clause,
    spatial_clause, temporal_clause,
};
use chi_updates_socrata_models::{Dataset, SearchArea};
use serde::Deserialize;

use crate::CivicDataset;
use crate::fields::{merge_names, truncate_date};

/// Query parameters for the food inspection section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodInspections {
    /// Accepted `facility_type` values.
    pub facility_types: Vec<String>,
    /// Accepted inspection `results` values.
    pub results: Vec<String>,
    /// Look-back window on `inspection_date`, in days.
    pub window_days: i64,
}

impl Default for FoodInspections {
    fn default() -> Self {
        Self {
            facility_types: vec!["Restaurant".to_string()],
            results: vec![
                "Pass".to_string(),
                "Pass w/ Conditions".to_string(),
                "Fail".to_string(),
            ],
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Raw record shape from the food inspections API.
///
/// `violations` is omitted by the API for inspections that recorded none.
#[derive(Debug, Clone, Deserialize)]
pub struct FoodInspectionRecord {
    pub dba_name: String,
    #[serde(default)]
    pub aka_name: Option<String>,
    pub inspection_date: String,
    pub address: String,
    pub inspection_type: String,
    pub results: String,
    #[serde(default)]
    pub risk: Option<String>,
    #[serde(default)]
    pub violations: Option<String>,
}

/// One row of the food inspection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodInspectionRow {
    pub business_name: String,
    pub address: String,
    pub inspection_date: String,
    pub inspection_type: String,
    pub results: String,
    pub risk_level: Option<String>,
    pub violations: Option<String>,
}

impl From<FoodInspectionRecord> for FoodInspectionRow {
    fn from(record: FoodInspectionRecord) -> Self {
        Self {
            business_name: merge_names(&record.dba_name, record.aka_name.as_deref(), "AKA"),
            address: record.address,
            inspection_date: truncate_date(&record.inspection_date),
            inspection_type: record.inspection_type,
            results: record.results,
            risk_level: record.risk,
            violations: record.violations,
        }
    }
}

impl TableRow for FoodInspectionRow {
    const COLUMNS: &'static [&'static str] = &[
        "Business Name",
        "Address",
        "Inspection Date",
        "Inspection Type",
        "Results",
        "Risk Level",
        "Violations",
    ];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.business_name.clone()),
            Some(self.address.clone()),
            Some(self.inspection_date.clone()),
            Some(self.inspection_type.clone()),
            Some(self.results.clone()),
            self.risk_level.clone(),
            self.violations.clone(),
        ]
    }
}

impl CivicDataset for FoodInspections {
    type Record = FoodInspectionRecord;

    const DATASET: Dataset = Dataset::FoodInspections;
    const HEADING: &'static str = "New Food Inspection Results";

    fn predicate(&self, area: &SearchArea) -> Result<Predicate, FilterError> {
        Ok(Predicate::new()
            .and(spatial_clause(area, DEFAULT_LOCATION_FIELD))
            .and(temporal_clause("inspection_date", self.window_days))
            .and(membership_clause(
                "facility_type",
                self.facility_types.as_slice(),
                false,
            )?)
            .and(membership_clause("results", self.results.as_slice(), false)?))
    }

    fn normalize(records: Vec<Self::Record>) -> Option<Table> {
        normalize(records)
    }
}

/// Builds the food inspection table, most recent inspections first and
/// reverse-alphabetical by name within a day.
///
/// Returns `None` when there are no records.
#[must_use]
pub fn normalize(records: Vec<FoodInspectionRecord>) -> Option<Table> {
    let mut rows: Vec<FoodInspectionRow> = records.into_iter().map(Into::into).collect();

    rows.sort_by(|a, b| {
        (&b.inspection_date, &b.business_name).cmp(&(&a.inspection_date, &a.business_name))
    });

    Table::from_rows(&rows)
}
