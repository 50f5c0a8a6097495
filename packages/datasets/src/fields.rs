//! Display-field derivations shared by the dataset normalizers.

use serde::{Deserialize as _, Deserializer, de::Error as _};

/// Length of an ISO-8601 `YYYY-MM-DD` date prefix.
const DATE_LEN: usize = 10;

/// Returns the date part of a Socrata floating timestamp
/// (`"2024-06-15T09:30:00.000"` → `"2024-06-15"`).
///
/// Takes the first ten characters as-is; values shorter than that are
/// returned whole.
#[must_use]
pub fn truncate_date(timestamp: &str) -> String {
    timestamp.chars().take(DATE_LEN).collect()
}

/// Combines a primary name with an alternate one under `label`.
///
/// Returns `primary` unchanged when the alternate is missing or identical,
/// otherwise `"{primary} ({label}: {alternate})"`.
#[must_use]
pub fn merge_names(primary: &str, alternate: Option<&str>, label: &str) -> String {
    match alternate {
        Some(alternate) if alternate != primary => format!("{primary} ({label}: {alternate})"),
        _ => primary.to_string(),
    }
}

/// Joins address parts with single spaces, skipping missing or blank parts.
#[must_use]
pub fn join_address(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deserializes a column Socrata may send as either a string or a number
/// into its text form.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn truncates_to_date() {
        assert_eq!(truncate_date("2024-06-15T09:30:00.000"), "2024-06-15");
    }

    #[test]
    fn truncation_keeps_short_values() {
        assert_eq!(truncate_date("2024-06"), "2024-06");
        assert_eq!(truncate_date(""), "");
    }

    #[test]
    fn equal_names_are_not_merged() {
        assert_eq!(merge_names("ACME LLC", Some("ACME LLC"), "DBA"), "ACME LLC");
    }

    #[test]
    fn different_names_are_merged_with_label() {
        assert_eq!(
            merge_names("ACME HOLDINGS LLC", Some("ACME TACOS"), "DBA"),
            "ACME HOLDINGS LLC (DBA: ACME TACOS)"
        );
        assert_eq!(
            merge_names("ACME TACOS", Some("ACME"), "AKA"),
            "ACME TACOS (AKA: ACME)"
        );
    }

    #[test]
    fn missing_alternate_keeps_primary() {
        assert_eq!(merge_names("ACME TACOS", None, "AKA"), "ACME TACOS");
    }

    #[test]
    fn joins_address_skipping_missing_parts() {
        assert_eq!(
            join_address(&[Some("1200-1258"), None, Some("WACKER"), Some("DR")]),
            "1200-1258 WACKER DR"
        );
        assert_eq!(
            join_address(&[Some("100-110"), Some("N"), Some("STATE"), Some(" ")]),
            "100-110 N STATE"
        );
    }

    #[derive(Deserialize)]
    struct Numbered {
        #[serde(deserialize_with = "text")]
        number: String,
    }

    #[test]
    fn text_accepts_strings_and_numbers() {
        let from_str: Numbered = serde_json::from_value(json!({ "number": "1200" })).unwrap();
        let from_num: Numbered = serde_json::from_value(json!({ "number": 1200 })).unwrap();
        assert_eq!(from_str.number, "1200");
        assert_eq!(from_num.number, "1200");
    }

    #[test]
    fn text_rejects_other_values() {
        assert!(serde_json::from_value::<Numbered>(json!({ "number": true })).is_err());
        assert!(serde_json::from_value::<Numbered>(json!({})).is_err());
    }
}
