//! Spreadsheet export as CSV.

use std::fs;
use std::path::Path;

use crate::core::report::{DayCell, Report};
use crate::core::output::table::NAME_HEADER;
use crate::error::{CheckinError, Result};

/// Byte order mark, so spreadsheet applications pick UTF-8.
const BOM: &str = "\u{FEFF}";

/// Writes the report to a CSV file.
///
/// # Format
/// - Delimiter: `,`
/// - Header: ` Name`, then `YYYY-MM-DD\n(Weekday)` for every day
/// - One row per sender; a present cell holds each stored body followed by
///   a line break, joined by line breaks; an absent cell is empty
/// - Encoding: UTF-8 with BOM
pub fn write_csv(report: &Report, output_path: &Path) -> Result<()> {
    let csv = to_csv(report)?;
    fs::write(output_path, csv)?;
    Ok(())
}

/// Converts the report to a CSV string, BOM included.
///
/// Same format as [`write_csv`], but returns a `String` instead of writing to file.
pub fn to_csv(report: &Report) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .from_writer(Vec::from(BOM.as_bytes()));

    writer.write_record(build_header(report))?;
    for row in &report.rows {
        let record = std::iter::once(row.display_name.clone())
            .chain(row.cells.iter().map(format_cell));
        writer.write_record(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CheckinError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CheckinError::encoding(e.to_string()))
}

fn build_header(report: &Report) -> Vec<String> {
    std::iter::once(NAME_HEADER.to_string())
        .chain(
            report
                .days
                .iter()
                .map(|d| d.format("%Y-%m-%d\n(%A)").to_string()),
        )
        .collect()
}

fn format_cell(cell: &DayCell) -> String {
    cell.messages()
        .iter()
        .map(|m| format!("{m}\n"))
        .collect::<Vec<_>>()
        .join("\n")
}
