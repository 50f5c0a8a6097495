#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Socrata SODA API access for the Chicago open-data portal.
//!
//! [`filter`] builds the `$where` predicates, and [`SocrataClient`] pages
//! through every row matching one. The [`RecordSource`] trait is the seam
//! the report is gathered through, so it can run against in-memory data.

pub mod filter;

use async_trait::async_trait;
use chi_updates_socrata_models::{Dataset, RawRecord};

/// Host of the City of Chicago data portal.
pub const CHICAGO_BASE_URL: &str = "https://data.cityofchicago.org";

/// Rows requested per page.
pub const DEFAULT_PAGE_SIZE: u64 = 1_000;

/// Errors that can occur while querying Socrata.
#[derive(Debug, thiserror::Error)]
pub enum SocrataError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can return every row of a dataset matching a predicate.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns all rows of `dataset` matching the SoQL `predicate`.
    ///
    /// An empty vector means nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`SocrataError`] if the rows could not be retrieved.
    async fn fetch_all(
        &self,
        dataset: Dataset,
        predicate: &str,
    ) -> Result<Vec<RawRecord>, SocrataError>;
}

/// Anonymous client for a Socrata portal.
#[derive(Debug, Clone)]
pub struct SocrataClient {
    base_url: String,
    page_size: u64,
}

impl SocrataClient {
    /// Creates a client for the portal at `base_url`
    /// (e.g., `"https://data.cityofchicago.org"`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Creates a client for the City of Chicago portal.
    #[must_use]
    pub fn chicago() -> Self {
        Self::new(CHICAGO_BASE_URL)
    }

    /// Overrides the number of rows requested per page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Returns the resource endpoint for `dataset`.
    #[must_use]
    pub fn resource_url(&self, dataset: Dataset) -> String {
        format!("{}/resource/{}.json", self.base_url, dataset.id())
    }
}

#[async_trait]
impl RecordSource for SocrataClient {
    async fn fetch_all(
        &self,
        dataset: Dataset,
        predicate: &str,
    ) -> Result<Vec<RawRecord>, SocrataError> {
        let url = self.resource_url(dataset);
        let client = reqwest::Client::new();
        let mut all_records: Vec<RawRecord> = Vec::new();
        let mut offset: u64 = 0;

        log::debug!("Querying {dataset} with $where={predicate}");

        loop {
            let limit = self.page_size.to_string();
            let offset_param = offset.to_string();

            log::info!(
                "Fetching {dataset}: offset={offset}, limit={}",
                self.page_size
            );
            let response = client
                .get(&url)
                .query(&[
                    ("$where", predicate),
                    ("$order", ":id"),
                    ("$limit", limit.as_str()),
                    ("$offset", offset_param.as_str()),
                ])
                .send()
                .await?
                .error_for_status()?;
            let body = response.bytes().await?;
            let records: Vec<RawRecord> = serde_json::from_slice(&body)?;

            let count = records.len() as u64;
            all_records.extend(records);
            offset += count;

            if count < self.page_size {
                break;
            }
        }

        log::info!("Downloaded {} {dataset} records total", all_records.len());

        Ok(all_records)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn builds_resource_url() {
        let client = SocrataClient::new("https://data.cityofchicago.org/");
        assert_eq!(
            client.resource_url(Dataset::FoodInspections),
            "https://data.cityofchicago.org/resource/4ijn-s7e5.json"
        );
    }

    #[tokio::test]
    async fn sends_predicate_as_where() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/resource/uupf-x98q.json")
                    .query_param("$where", "application_type  IN ('ISSUE')")
                    .query_param("$offset", "0");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!([{ "legal_name": "ACME LLC" }]));
            })
            .await;

        let client = SocrataClient::new(server.base_url());
        let records = client
            .fetch_all(Dataset::BusinessLicenses, "application_type  IN ('ISSUE')")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["legal_name"], "ACME LLC");
    }

    #[tokio::test]
    async fn pages_until_short_page() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/resource/c2az-nhru.json")
                    .query_param("$limit", "2")
                    .query_param("$offset", "0");
                then.status(200)
                    .json_body(json!([{ "applicationname": "a" }, { "applicationname": "b" }]));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/resource/c2az-nhru.json")
                    .query_param("$limit", "2")
                    .query_param("$offset", "2");
                then.status(200)
                    .json_body(json!([{ "applicationname": "c" }]));
            })
            .await;

        let client = SocrataClient::new(server.base_url()).with_page_size(2);
        let records = client
            .fetch_all(Dataset::FilmingPermits, "1 = 1")
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        let names: Vec<_> = records
            .iter()
            .map(|r| r["applicationname"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn empty_result_is_not_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/resource/4ijn-s7e5.json");
                then.status(200).json_body(json!([]));
            })
            .await;

        let client = SocrataClient::new(server.base_url());
        let records = client
            .fetch_all(Dataset::FoodInspections, "1 = 1")
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn server_error_propagates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/resource/4ijn-s7e5.json");
                then.status(500).body("boom");
            })
            .await;

        let client = SocrataClient::new(server.base_url());
        let err = client
            .fetch_all(Dataset::FoodInspections, "1 = 1")
            .await
            .unwrap_err();
        assert!(matches!(err, SocrataError::Http(_)), "{err}");
    }
}
