//! Upcoming film permits.
//!
//! Dataset: <https://data.cityofchicago.org/resource/c2az-nhru>

use chi_updates_report_models::{Table, TableRow};
use chi_updates_socrata::filter::{
    DEFAULT_LOCATION_FIELD, FilterError, Predicate, membership_clause, spatial_clause,
    temporal_clause,
};
use chi_updates_socrata_models::{Dataset, SearchArea};
use serde::Deserialize;

use crate::CivicDataset;
use crate::fields::{join_address, text, truncate_date};

/// Query parameters for the filming permit section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmingPermits {
    /// `currentmilestone` values to leave out.
    pub excluded_milestones: Vec<String>,
    /// Window on `applicationstartdate`, in days. Negative values look
    /// ahead, so the default of `-7` selects permits starting this week.
    pub window_days: i64,
}

impl Default for FilmingPermits {
    fn default() -> Self {
        Self {
            excluded_milestones: vec!["Cancelled".to_string()],
            window_days: -7,
        }
    }
}

/// Raw record shape from the film permits API.
#[derive(Debug, Clone, Deserialize)]
pub struct FilmingPermitRecord {
    #[serde(deserialize_with = "text")]
    pub streetnumberfrom: String,
    #[serde(deserialize_with = "text")]
    pub streetnumberto: String,
    #[serde(default)]
    pub direction: Option<String>,
    pub streetname: String,
    #[serde(default)]
    pub suffix: Option<String>,
    pub applicationstartdate: String,
    pub applicationenddate: String,
    #[serde(default)]
    pub primarycontactlast: Option<String>,
    pub applicationname: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// One row of the filming permit table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmingPermitRow {
    pub contact_name: Option<String>,
    pub application_name: String,
    pub address: String,
    pub start_date: String,
    pub end_date: String,
    pub details: Option<String>,
    pub comments: Option<String>,
}

impl From<FilmingPermitRecord> for FilmingPermitRow {
    fn from(record: FilmingPermitRecord) -> Self {
        let street_numbers = format!("{}-{}", record.streetnumberfrom, record.streetnumberto);
        let address = join_address(&[
            Some(street_numbers.as_str()),
            record.direction.as_deref(),
            Some(record.streetname.as_str()),
            record.suffix.as_deref(),
        ]);

        Self {
            contact_name: record.primarycontactlast,
            application_name: record.applicationname,
            address,
            start_date: truncate_date(&record.applicationstartdate),
            end_date: truncate_date(&record.applicationenddate),
            details: record.detail,
            comments: record.comments,
        }
    }
}

impl TableRow for FilmingPermitRow {
    const COLUMNS: &'static [&'static str] = &[
        "Contact Name",
        "Application Name",
        "Address",
        "Start Date",
        "End Date",
        "Details",
        "Comments",
    ];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            self.contact_name.clone(),
            Some(self.application_name.clone()),
            Some(self.address.clone()),
            Some(self.start_date.clone()),
            Some(self.end_date.clone()),
            self.details.clone(),
            self.comments.clone(),
        ]
    }
}

impl CivicDataset for FilmingPermits {
    type Record = FilmingPermitRecord;

    const DATASET: Dataset = Dataset::FilmingPermits;
    const HEADING: &'static str = "New Filming Permits";

    fn predicate(&self, area: &SearchArea) -> Result<Predicate, FilterError> {
        Ok(Predicate::new()
            .and(spatial_clause(area, DEFAULT_LOCATION_FIELD))
            .and(temporal_clause("applicationstartdate", self.window_days))
            .and(membership_clause(
                "currentmilestone",
                self.excluded_milestones.as_slice(),
                true,
            )?))
    }

    fn normalize(records: Vec<Self::Record>) -> Option<Table> {
        normalize(records)
    }
}

/// Builds the filming permit table, soonest permits first.
///
/// This is the opposite order from the other sections: permits are
/// upcoming, so the nearest start date leads.
///
/// Returns `None` when there are no records.
#[must_use]
pub fn normalize(records: Vec<FilmingPermitRecord>) -> Option<Table> {
    let mut rows: Vec<FilmingPermitRow> = records.into_iter().map(Into::into).collect();

    rows.sort_by(|a, b| (&a.start_date, &a.end_date).cmp(&(&b.start_date, &b.end_date)));

    Table::from_rows(&rows)
}
