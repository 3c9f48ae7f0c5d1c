use serde::Serialize;
use tracing::{debug, warn};

use crate::models::DomainRecord;

pub const MISSING_PLACEHOLDER: &str = "?missing?";
pub const ORDINAL_HEADER: &str = "#";

/// What to do with a record that lacks one of the configured columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Leave the record out and warn
    Skip,
    /// Show [`MISSING_PLACEHOLDER`] in the empty cells
    Placeholder,
}

impl MissingFieldPolicy {
    pub fn from_skip_flag(skip_incomplete: bool) -> Self {
        if skip_incomplete {
            MissingFieldPolicy::Skip
        } else {
            MissingFieldPolicy::Placeholder
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub index: usize,
    pub cells: Vec<String>,
}

/// Registrar flags become `x` / `-`; anything else is shown as-is.
pub fn cell_format(cell: Option<&str>) -> String {
    match cell {
        Some("true") | Some("ENABLED") => "x".to_string(),
        Some("false") | Some("DISABLED") => "-".to_string(),
        Some(value) if !value.is_empty() => value.to_string(),
        _ => {
            debug!("Empty cell");
            String::new()
        }
    }
}

pub fn header_row(columns: &[String]) -> Vec<String> {
    std::iter::once(ORDINAL_HEADER.to_string())
        .chain(
            columns
                .iter()
                .filter(|column| !column.is_empty())
                .map(|column| column.strip_prefix('@').unwrap_or(column).to_string()),
        )
        .collect()
}

pub fn build_rows(
    domains: &[DomainRecord],
    columns: &[String],
    policy: MissingFieldPolicy,
) -> Vec<ReportRow> {
    let mut rows = Vec::with_capacity(domains.len());

    for domain in domains {
        let missing: Vec<&str> = columns
            .iter()
            .filter(|column| !domain.contains(column))
            .map(String::as_str)
            .collect();

        if !missing.is_empty() && policy == MissingFieldPolicy::Skip {
            warn!(
                domain = domain.name().unwrap_or("<unnamed>"),
                "Skipping domain missing {}",
                missing.join(", ")
            );
            continue;
        }

        let cells = columns
            .iter()
            .map(|column| {
                if domain.contains(column) {
                    cell_format(domain.get(column))
                } else {
                    MISSING_PLACEHOLDER.to_string()
                }
            })
            .collect();

        rows.push(ReportRow {
            index: rows.len() + 1,
            cells,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn domain(fields: Value) -> DomainRecord {
        match fields {
            Value::Object(map) => DomainRecord::new(map),
            _ => panic!("fields must be an object"),
        }
    }

    fn columns(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_cell_format() {
        assert_eq!(cell_format(Some("true")), "x");
        assert_eq!(cell_format(Some("ENABLED")), "x");
        assert_eq!(cell_format(Some("false")), "-");
        assert_eq!(cell_format(Some("DISABLED")), "-");
        assert_eq!(cell_format(Some("SomeValue")), "SomeValue");
        assert_eq!(cell_format(Some("")), "");
        assert_eq!(cell_format(None), "");
    }

    #[test]
    fn test_header_row_strips_prefix() {
        assert_eq!(
            header_row(&columns(&["@Name", "@Expires"])),
            vec!["#", "Name", "Expires"]
        );
        assert_eq!(header_row(&[]), vec!["#"]);
    }

    #[test]
    fn test_rows_follow_column_order() {
        let domains = vec![domain(json!({
            "@Name": "example.com",
            "@Expires": "02/15/2026",
            "@WhoisGuard": "ENABLED",
            "@IsExpired": "false"
        }))];

        let rows = build_rows(
            &domains,
            &columns(&["@IsExpired", "@Name", "@WhoisGuard", "@Expires"]),
            MissingFieldPolicy::Skip,
        );

        assert_eq!(
            rows,
            vec![ReportRow {
                index: 1,
                cells: vec![
                    "-".to_string(),
                    "example.com".to_string(),
                    "x".to_string(),
                    "02/15/2026".to_string()
                ],
            }]
        );
    }

    #[test]
    fn test_missing_field_skip_keeps_ordinals_contiguous() {
        let domains = vec![
            domain(json!({"@Name": "a.com", "@AutoRenew": "true"})),
            domain(json!({"@Name": "b.com"})),
            domain(json!({"@Name": "c.com", "@AutoRenew": "false"})),
        ];

        let rows = build_rows(
            &domains,
            &columns(&["@Name", "@AutoRenew"]),
            MissingFieldPolicy::Skip,
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].cells, vec!["c.com", "-"]);
    }

    #[test]
    fn test_missing_field_placeholder() {
        let domains = vec![domain(json!({"@Name": "b.com"}))];

        let rows = build_rows(
            &domains,
            &columns(&["@Name", "@AutoRenew"]),
            MissingFieldPolicy::Placeholder,
        );

        assert_eq!(rows[0].cells, vec!["b.com", MISSING_PLACEHOLDER]);
    }

    #[test]
    fn test_non_text_field_renders_empty() {
        let domains = vec![domain(json!({"@Name": "a.com", "@Tags": null}))];

        let rows = build_rows(
            &domains,
            &columns(&["@Name", "@Tags"]),
            MissingFieldPolicy::Skip,
        );

        assert_eq!(rows[0].cells, vec!["a.com", ""]);
    }
}
