//! SoQL `$where` clause builders.
//!
//! Each builder produces one self-contained boolean clause. Callers collect
//! the clauses they need into a [`Predicate`], which joins them with `AND`.

use std::fmt;

use chi_updates_socrata_models::SearchArea;
use chrono::{Duration, Local, NaiveDateTime, NaiveTime, Timelike as _};

/// Location column used by every Chicago dataset in the digest.
pub const DEFAULT_LOCATION_FIELD: &str = "location";

/// Default look-back for the date window, in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Floating timestamp literal format. Sub-second precision is always
/// written as `.000`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000";

/// Errors produced while building a clause.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// A membership clause was requested with no values to match.
    #[error("membership clause on `{field}` requires at least one value")]
    EmptyValues {
        /// The field the clause would have filtered on.
        field: String,
    },
}

/// Clause matching rows whose `field` point lies inside `area`.
#[must_use]
pub fn spatial_clause(area: &SearchArea, field: &str) -> String {
    format!(
        "within_circle({field}, {}, {}, {})",
        area.latitude, area.longitude, area.radius_meters
    )
}

/// Clause matching rows whose `field` falls in the date window of
/// `window_days` relative to the local wall clock.
///
/// See [`temporal_clause_at`].
#[must_use]
pub fn temporal_clause(field: &str, window_days: i64) -> String {
    temporal_clause_at(field, window_days, Local::now().naive_local())
}

/// Clause matching rows whose `field` falls in the half-open window between
/// `now` and midnight `window_days` days before `now`.
///
/// The two bounds are ordered with min/max rather than assumed, so a
/// positive `window_days` looks back (`[midnight(now - n), now)`) while a
/// negative one looks ahead (`[now, midnight(now + |n|))`). Either way the
/// emitted range is never inverted.
#[must_use]
pub fn temporal_clause_at(field: &str, window_days: i64, now: NaiveDateTime) -> String {
    let now = now.with_nanosecond(0).unwrap_or(now);
    let shifted = (now - Duration::days(window_days))
        .date()
        .and_time(NaiveTime::MIN);

    let lower = now.min(shifted).format(TIMESTAMP_FORMAT);
    let upper = now.max(shifted).format(TIMESTAMP_FORMAT);

    format!("{field} >= '{lower}' AND {field} < '{upper}'")
}

/// Clause matching rows whose `field` is (or, with `negate`, is not) one of
/// `values`.
///
/// Single quotes inside values are doubled, as SoQL string literals expect.
///
/// # Errors
///
/// Returns [`FilterError::EmptyValues`] if `values` is empty.
pub fn membership_clause<S: AsRef<str>>(
    field: &str,
    values: &[S],
    negate: bool,
) -> Result<String, FilterError> {
    if values.is_empty() {
        return Err(FilterError::EmptyValues {
            field: field.to_string(),
        });
    }

    let quoted = values
        .iter()
        .map(|value| value.as_ref().replace('\'', "''"))
        .collect::<Vec<_>>()
        .join("', '");
    let not = if negate { "NOT" } else { "" };

    Ok(format!("{field} {not} IN ('{quoted}')"))
}

/// A conjunction of clauses, rendered as a SoQL `$where` expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<String>,
}

impl Predicate {
    /// Creates an empty predicate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Appends a clause.
    #[must_use]
    pub fn and(mut self, clause: impl Into<String>) -> Self {
        self.clauses.push(clause.into());
        self
    }

    /// Returns the individual clauses in the order they were added.
    #[must_use]
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clauses.join(" AND "))
    }
}
