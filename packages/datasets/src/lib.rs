#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chicago open datasets included in the digest.
//!
//! Each dataset implements [`CivicDataset`]: it knows how to build its
//! `$where` predicate, what its raw rows look like, and how to normalize
//! them into a display [`Table`]. [`gather_report`] runs all of them in
//! order and assembles the [`Report`].

pub mod business_licenses;
pub mod fields;
pub mod filming_permits;
pub mod food_inspections;

use chi_updates_report_models::{Report, Table};
use chi_updates_socrata::filter::{FilterError, Predicate};
use chi_updates_socrata::{RecordSource, SocrataError};
use chi_updates_socrata_models::{Dataset, RawRecord, SearchArea};
use serde::de::DeserializeOwned;

pub use business_licenses::BusinessLicenses;
pub use filming_permits::FilmingPermits;
pub use food_inspections::FoodInspections;

/// Errors that can occur while building a report section.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The query predicate could not be built.
    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    /// Fetching rows from the provider failed.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] SocrataError),

    /// A row did not match the expected record shape.
    #[error("Invalid {dataset} record at row {index}: {source}")]
    Record {
        /// Dataset the row came from.
        dataset: Dataset,
        /// Zero-based position of the row in the response.
        index: usize,
        /// What was wrong with it.
        source: serde_json::Error,
    },
}

/// A dataset that contributes one section to the digest.
pub trait CivicDataset: Sync {
    /// Typed shape of one provider row.
    type Record: DeserializeOwned;

    /// The Socrata dataset to query.
    const DATASET: Dataset;

    /// Section heading in the report.
    const HEADING: &'static str;

    /// Builds the `$where` predicate restricting rows to `area`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if a clause cannot be built.
    fn predicate(&self, area: &SearchArea) -> Result<Predicate, FilterError>;

    /// Normalizes typed rows into the section table, or `None` if there
    /// are no rows.
    fn normalize(records: Vec<Self::Record>) -> Option<Table>;
}

/// Converts raw provider rows into typed records.
///
/// # Errors
///
/// Returns [`DatasetError::Record`] for the first row missing a required
/// field or holding a value of the wrong type.
pub fn parse_records<T: DeserializeOwned>(
    dataset: Dataset,
    raw: Vec<RawRecord>,
) -> Result<Vec<T>, DatasetError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(serde_json::Value::Object(record)).map_err(|source| {
                DatasetError::Record {
                    dataset,
                    index,
                    source,
                }
            })
        })
        .collect()
}

/// Queries one dataset and normalizes the result.
///
/// Returns `Ok(None)` when nothing matched.
///
/// # Errors
///
/// Returns [`DatasetError`] if the predicate cannot be built, the fetch
/// fails, or a row cannot be parsed.
pub async fn fetch_table<D: CivicDataset>(
    source: &dyn RecordSource,
    dataset: &D,
    area: &SearchArea,
) -> Result<Option<Table>, DatasetError> {
    let predicate = dataset.predicate(area)?.to_string();
    let raw = source.fetch_all(D::DATASET, &predicate).await?;

    if raw.is_empty() {
        log::info!("No {} records in the search area", D::DATASET);
        return Ok(None);
    }

    let records = parse_records::<D::Record>(D::DATASET, raw)?;
    let table = D::normalize(records);

    if let Some(table) = &table {
        log::info!("{}: {} row(s)", D::HEADING, table.len());
    }

    Ok(table)
}

/// Query parameters for every section of the digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestQueries {
    /// Newly issued licenses.
    pub business_licenses: BusinessLicenses,
    /// Restaurant inspections.
    pub food_inspections: FoodInspections,
    /// Upcoming film shoots.
    pub filming_permits: FilmingPermits,
}

/// Fetches every dataset in turn and assembles the report.
///
/// Sections appear in a fixed order (business licenses, food inspections,
/// filming permits); datasets with no matching rows are left out.
///
/// # Errors
///
/// Returns the first [`DatasetError`] encountered. No partial report is
/// produced.
pub async fn gather_report(
    source: &dyn RecordSource,
    area: &SearchArea,
    queries: &DigestQueries,
) -> Result<Report, DatasetError> {
    let mut report = Report::new();

    report.push_section(
        BusinessLicenses::HEADING,
        fetch_table(source, &queries.business_licenses, area).await?,
    );
    report.push_section(
        FoodInspections::HEADING,
        fetch_table(source, &queries.food_inspections, area).await?,
    );
    report.push_section(
        FilmingPermits::HEADING,
        fetch_table(source, &queries.filming_permits, area).await?,
    );

    Ok(report)
}
