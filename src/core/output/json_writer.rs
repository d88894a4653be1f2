//! JSON report writer.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::core::report::Report;
use crate::error::Result;

/// Serialized shape of the report.
#[derive(Serialize)]
struct JsonReport<'a> {
    days: Vec<String>,
    rows: Vec<JsonRow<'a>>,
}

/// One sender. Only days with a check-in appear in `days`.
#[derive(Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    sender_id: &'a str,
    days: BTreeMap<String, &'a [String]>,
}

impl<'a> JsonReport<'a> {
    fn from_report(report: &'a Report) -> Self {
        let days = report.days.iter().map(ToString::to_string).collect();
        let rows = report
            .rows
            .iter()
            .map(|row| JsonRow {
                name: &row.display_name,
                sender_id: &row.sender_id,
                days: report
                    .days
                    .iter()
                    .zip(&row.cells)
                    .filter(|(_, cell)| cell.is_present())
                    .map(|(day, cell)| (day.to_string(), cell.messages()))
                    .collect(),
            })
            .collect();
        Self { days, rows }
    }
}

/// Writes the report to a JSON file.
///
/// # Format
/// ```json
/// {
///   "days": ["2024-03-18", "2024-03-19"],
///   "rows": [
///     {"name": "Alice(1)", "sender_id": "1", "days": {"2024-03-18": ["打卡"]}}
///   ]
/// }
/// ```
pub fn write_json(report: &Report, output_path: &Path) -> Result<()> {
    let json = to_json(report)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts the report to a pretty-printed JSON string.
///
/// Same format as [`write_json`], but returns a `String` instead of writing to file.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::from_report(report))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::{DayCell, ReportRow};
    use chrono::NaiveDate;
    use tempfile::NamedTempFile;

    fn report() -> Report {
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 19).unwrap();
        Report {
            days: vec![d1, d2],
            rows: vec![ReportRow {
                display_name: "Alice(1)".to_string(),
                sender_id: "1".to_string(),
                cells: vec![DayCell::Absent, DayCell::Present(vec!["打卡".into()])],
            }],
        }
    }

    #[test]
    fn test_to_json_shape() {
        let json = to_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["days"], serde_json::json!(["2024-03-18", "2024-03-19"]));
        let row = &value["rows"][0];
        assert_eq!(row["name"], "Alice(1)");
        assert_eq!(row["sender_id"], "1");
        assert_eq!(row["days"], serde_json::json!({"2024-03-19": ["打卡"]}));
    }

    #[test]
    fn test_to_json_is_pretty() {
        let json = to_json(&report()).unwrap();
        assert!(json.contains("\n  \"days\""));
    }

    #[test]
    fn test_write_json_file() {
        let temp_file = NamedTempFile::new().unwrap();
        write_json(&report(), temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains(r#""name": "Alice(1)""#));
    }
}
