//! Newly issued business licenses.
//!
//! Dataset: <https://data.cityofchicago.org/resource/uupf-x98q>

use chi_updates_report_models::{Table, TableRow};
use chi_updates_socrata::filter::{
    DEFAULT_LOCATION_FIELD, DEFAULT_WINDOW_DAYS, FilterError, Predicate, membership_clause,
    spatial_clause, temporal_clause,
};
use chi_updates_socrata_models::{Dataset, SearchArea};
use serde::Deserialize;

use crate::CivicDataset;
use crate::fields::{merge_names, truncate_date};

/// Query parameters for the business license section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessLicenses {
    /// Accepted `application_type` values.
    pub application_types: Vec<String>,
    /// Look-back window on `date_issued`, in days.
    pub window_days: i64,
}

impl Default for BusinessLicenses {
    fn default() -> Self {
        Self {
            application_types: vec!["ISSUE".to_string()],
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Raw record shape from the business licenses API.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessLicenseRecord {
    pub legal_name: String,
    pub doing_business_as_name: String,
    pub license_start_date: String,
    #[serde(default)]
    pub expiration_date: Option<String>,
    pub address: String,
    #[serde(default)]
    pub business_activity: Option<String>,
}

/// One row of the business license table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessLicenseRow {
    pub business_name: String,
    pub address: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub license_type: Option<String>,
}

impl From<BusinessLicenseRecord> for BusinessLicenseRow {
    fn from(record: BusinessLicenseRecord) -> Self {
        Self {
            business_name: merge_names(
                &record.legal_name,
                Some(record.doing_business_as_name.as_str()),
                "DBA",
            ),
            address: record.address,
            start_date: truncate_date(&record.license_start_date),
            end_date: record.expiration_date.as_deref().map(truncate_date),
            license_type: record.business_activity,
        }
    }
}

impl TableRow for BusinessLicenseRow {
    const COLUMNS: &'static [&'static str] = &[
        "Business Name",
        "Address",
        "Start Date",
        "End Date",
        "License Type",
    ];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.business_name.clone()),
            Some(self.address.clone()),
            Some(self.start_date.clone()),
            self.end_date.clone(),
            self.license_type.clone(),
        ]
    }
}

impl CivicDataset for BusinessLicenses {
    type Record = BusinessLicenseRecord;

    const DATASET: Dataset = Dataset::BusinessLicenses;
    const HEADING: &'static str = "New Business Licenses";

    fn predicate(&self, area: &SearchArea) -> Result<Predicate, FilterError> {
        Ok(Predicate::new()
            .and(spatial_clause(area, DEFAULT_LOCATION_FIELD))
            .and(temporal_clause("date_issued", self.window_days))
            .and(membership_clause(
                "application_type",
                self.application_types.as_slice(),
                false,
            )?))
    }

    fn normalize(records: Vec<Self::Record>) -> Option<Table> {
        normalize(records)
    }
}

/// Builds the business license table, newest licenses first.
///
/// Returns `None` when there are no records.
#[must_use]
pub fn normalize(records: Vec<BusinessLicenseRecord>) -> Option<Table> {
    let mut rows: Vec<BusinessLicenseRow> = records.into_iter().map(Into::into).collect();

    // Dates are ISO `YYYY-MM-DD`, so string order is chronological order.
    rows.sort_by(|a, b| (&b.start_date, &b.end_date).cmp(&(&a.start_date, &a.end_date)));

    Table::from_rows(&rows)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(legal: &str, dba: &str, start: &str, end: &str) -> BusinessLicenseRecord {
        serde_json::from_value(json!({
            "legal_name": legal,
            "doing_business_as_name": dba,
            "license_start_date": start,
            "expiration_date": end,
            "address": "100 N STATE ST",
            "business_activity": "Retail Sales of Perishable Foods",
            "account_number": "12345",
        }))
        .unwrap()
    }

    #[test]
    fn empty_input_is_absent() {
        assert!(normalize(Vec::new()).is_none());
    }

    #[test]
    fn projects_onto_fixed_columns() {
        let table = normalize(vec![record(
            "ACME HOLDINGS LLC",
            "ACME TACOS",
            "2024-06-10T00:00:00.000",
            "2026-06-15T00:00:00.000",
        )])
        .unwrap();

        assert_eq!(table.columns(), BusinessLicenseRow::COLUMNS);
        assert_eq!(
            table.rows()[0],
            [
                Some("ACME HOLDINGS LLC (DBA: ACME TACOS)".to_string()),
                Some("100 N STATE ST".to_string()),
                Some("2024-06-10".to_string()),
                Some("2026-06-15".to_string()),
                Some("Retail Sales of Perishable Foods".to_string()),
            ]
        );
    }

    #[test]
    fn sorts_newest_first() {
        let table = normalize(vec![
            record("B", "B", "2024-06-09T00:00:00.000", "2026-06-15T00:00:00.000"),
            record("C", "C", "2024-06-12T00:00:00.000", "2026-06-15T00:00:00.000"),
            record("A", "A", "2024-06-10T00:00:00.000", "2026-06-15T00:00:00.000"),
            record("D", "D", "2024-06-12T00:00:00.000", "2026-07-15T00:00:00.000"),
        ])
        .unwrap();

        assert_eq!(
            table.column("Business Name").unwrap(),
            [Some("D"), Some("C"), Some("A"), Some("B")]
        );
        assert_eq!(
            table.column("Start Date").unwrap(),
            [
                Some("2024-06-12"),
                Some("2024-06-12"),
                Some("2024-06-10"),
                Some("2024-06-09")
            ]
        );
    }

    #[test]
    fn missing_optional_fields_are_empty_cells() {
        let record: BusinessLicenseRecord = serde_json::from_value(json!({
            "legal_name": "ACME LLC",
            "doing_business_as_name": "ACME LLC",
            "license_start_date": "2024-06-10T00:00:00.000",
            "address": "100 N STATE ST",
        }))
        .unwrap();

        let table = normalize(vec![record]).unwrap();
        assert_eq!(table.column("End Date").unwrap(), [None::<&str>]);
        assert_eq!(table.column("License Type").unwrap(), [None::<&str>]);
        assert_eq!(table.column("Business Name").unwrap(), [Some("ACME LLC")]);
    }

    #[test]
    fn predicate_filters_area_window_and_application_type() {
        let area = SearchArea::new(41.9, -87.65, 2750);
        let predicate = BusinessLicenses::default().predicate(&area).unwrap();
        let clauses = predicate.clauses();

        assert_eq!(clauses[0], "within_circle(location, 41.9, -87.65, 2750)");
        assert!(clauses[1].starts_with("date_issued >= '"), "{}", clauses[1]);
        assert_eq!(clauses[2], "application_type  IN ('ISSUE')");
    }
}
