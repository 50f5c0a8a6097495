#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tabular report types shared by the normalizers and the renderer.
//!
//! Every dataset normalizes into a [`Table`] with a fixed column order. A
//! [`Report`] only ever holds tables that have at least one row, so an
//! empty dataset is an omitted section rather than an empty one.

use serde::{Deserialize, Serialize};

/// A normalized row with a fixed set of display columns.
pub trait TableRow {
    /// Column headings, in display order.
    const COLUMNS: &'static [&'static str];

    /// Cell values in the same order as [`Self::COLUMNS`]. `None` renders
    /// as an empty cell.
    fn cells(&self) -> Vec<Option<String>>;
}

/// A rectangular table of display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Builds a table from typed rows, keeping their order.
    ///
    /// Returns `None` when `rows` is empty.
    #[must_use]
    pub fn from_rows<R: TableRow>(rows: &[R]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        Some(Self {
            columns: R::COLUMNS.iter().map(ToString::to_string).collect(),
            rows: rows.iter().map(TableRow::cells).collect(),
        })
    }

    /// Column headings.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns every value of the named column, or `None` if no such column
    /// exists.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).and_then(Option::as_deref))
                .collect(),
        )
    }
}

/// A titled table in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section heading (e.g., `"New Business Licenses"`).
    pub heading: String,
    /// The section's rows.
    pub table: Table,
}

/// The ordered set of sections that make up one digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    sections: Vec<ReportSection>,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Appends a section under `heading` if `table` is present. An absent
    /// table leaves the report unchanged.
    pub fn push_section(&mut self, heading: impl Into<String>, table: Option<Table>) {
        if let Some(table) = table {
            self.sections.push(ReportSection {
                heading: heading.into(),
                table,
            });
        }
    }

    /// Sections in insertion order.
    #[must_use]
    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    /// Returns the section with the given heading.
    #[must_use]
    pub fn section(&self, heading: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    /// Whether no dataset produced any rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
