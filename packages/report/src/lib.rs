#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTML rendering of the digest.
//!
//! Produces a single self-contained document: a fixed stylesheet followed
//! by one titled table per report section.

use chi_updates_report_models::{Report, Table};

/// Stylesheet embedded in every digest.
pub const STYLE_TAG: &str = r"
<style>
    table {
        font-family: Roboto, Arial, sans-serif;
        font-size: 0.9rem;
        font-weight: 400;
        border: none;
        margin-bottom: 3rem;
        border-spacing: 0;
    }

    thead {
        text-transform: uppercase;
        letter-spacing: 0.075rem;
        font-size: 0.75rem;
        background: #CCCCCC;
        border: none;
        text-align: left;
    }

    td {
        border-top: none;
        border-bottom: 1pt solid #CCCCCC;
        border-left: none;
        border-right: none;
        padding: 1rem 0.75rem;
    }

    th {
        border: none;
        padding: 0.75rem;
    }

    h1.table-title {
        font-family: Roboto, Arial, sans-serif;
        font-size: 1.5rem;
        font-weight: 700;
        margin-bottom: 1rem;
    }

    tr:nth-child(even) {
        background-color: #f2f2f2;
    }
</style>
";

/// Classes applied to every table.
const TABLE_CLASSES: &str = "dataframe table-striped table-hover table";

/// Renders `report` as an HTML document.
///
/// Sections are emitted in report order. A report with no sections renders
/// as a document with an empty body.
#[must_use]
pub fn render_html(report: &Report) -> String {
    let mut html = String::from("<html><head>");
    html.push_str(STYLE_TAG);
    html.push_str("</head><body>");

    for section in report.sections() {
        html.push_str(&format!(
            r#"<h1 class="table-title">{}</h1>"#,
            escape_html(&section.heading)
        ));
        html.push_str(&render_table(&section.table));
    }

    html.push_str("</body></html>");
    html
}

/// Renders a single table. Missing cells are left blank.
#[must_use]
pub fn render_table(table: &Table) -> String {
    let mut html = format!("<table border=\"1\" class=\"{TABLE_CLASSES}\">\n");

    html.push_str("  <thead>\n    <tr>\n");
    for column in table.columns() {
        html.push_str(&format!("      <th>{}</th>\n", escape_html(column)));
    }
    html.push_str("    </tr>\n  </thead>\n");

    html.push_str("  <tbody>\n");
    for row in table.rows() {
        html.push_str("    <tr>\n");
        for cell in row {
            html.push_str(&format!(
                "      <td>{}</td>\n",
                escape_html(cell.as_deref().unwrap_or_default())
            ));
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>");

    html
}

/// Escapes text for use in HTML element content.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use chi_updates_report_models::TableRow;

    use super::*;

    struct Row(&'static str, Option<&'static str>);

    impl TableRow for Row {
        const COLUMNS: &'static [&'static str] = &["Business Name", "Violations"];

        fn cells(&self) -> Vec<Option<String>> {
            vec![Some(self.0.to_string()), self.1.map(ToString::to_string)]
        }
    }

    fn report() -> Report {
        let mut report = Report::new();
        report.push_section(
            "New Food Inspection Results",
            Table::from_rows(&[Row("HAROLD'S CHICKEN", Some("38. INSECTS & RODENTS"))]),
        );
        report.push_section("New Filming Permits", None);
        report.push_section("New Business Licenses", Table::from_rows(&[Row("A <B>", None)]));
        report
    }

    #[test]
    fn wraps_sections_in_styled_document() {
        let html = render_html(&report());
        assert!(html.starts_with("<html><head>\n<style>"));
        assert!(html.contains("</style>\n</head><body>"));
        assert!(html.ends_with("</table></body></html>"));
    }

    #[test]
    fn renders_sections_in_order_and_omits_absent_ones() {
        let html = render_html(&report());
        let food = html
            .find(r#"<h1 class="table-title">New Food Inspection Results</h1>"#)
            .unwrap();
        let licenses = html
            .find(r#"<h1 class="table-title">New Business Licenses</h1>"#)
            .unwrap();
        assert!(food < licenses);
        assert!(!html.contains("New Filming Permits"));
        assert_eq!(html.matches("<table ").count(), 2);
    }

    #[test]
    fn renders_headers_and_escaped_cells() {
        let html = render_html(&report());
        assert!(html.contains("<th>Business Name</th>"));
        assert!(html.contains("<th>Violations</th>"));
        assert!(html.contains("<td>HAROLD&#39;S CHICKEN</td>"));
        assert!(html.contains("<td>38. INSECTS &amp; RODENTS</td>"));
        assert!(html.contains("<td>A &lt;B&gt;</td>"));
    }

    #[test]
    fn absent_cells_are_blank() {
        let table = Table::from_rows(&[Row("ACME", None)]).unwrap();
        let html = render_table(&table);
        assert!(html.contains("<td>ACME</td>\n      <td></td>"), "{html}");
        assert!(!html.contains(r#"style="text-align: right;""#));
    }

    #[test]
    fn empty_report_has_empty_body() {
        let html = render_html(&Report::new());
        assert!(html.ends_with("</head><body></body></html>"));
    }
}
