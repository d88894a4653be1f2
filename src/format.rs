//! Export format types.
//!
//! [`OutputFormat`] selects the spreadsheet-style sink used next to the
//! console table. It does not depend on the CLI, so library users can pick a
//! format from a string or a file extension.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> checkin::Result<()> {
//! use checkin::core::{CheckinIndex, Report, TargetWindow};
//! use checkin::format::{OutputFormat, to_format_string};
//! use chrono::NaiveDate;
//!
//! let window = TargetWindow::ending_this_week(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(), 1)?;
//! let report = Report::build(&CheckinIndex::new(), &window);
//!
//! let format = OutputFormat::from_path("report.json".as_ref())?;
//! let json = to_format_string(&report, format)?;
//! assert!(json.contains("\"days\""));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::report::Report;
use crate::error::{CheckinError, Result};

/// Export format for the check-in report.
///
/// - [`Csv`](OutputFormat::Csv) - spreadsheet, one row per sender (default)
/// - [`Json`](OutputFormat::Json) - structured report for other tools
///
/// # Example
///
/// ```rust
/// use checkin::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("json").unwrap();
/// assert_eq!(format, OutputFormat::Json);
/// assert_eq!(format.extension(), "json");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Comma-separated spreadsheet, UTF-8 with BOM.
    #[default]
    Csv,

    /// Pretty-printed JSON report.
    Json,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Json]
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use checkin::format::OutputFormat;
    ///
    /// let format = OutputFormat::from_path("checkin_03-20.csv".as_ref()).unwrap();
    /// assert_eq!(format, OutputFormat::Csv);
    /// ```
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        ext.parse().map_err(|_| {
            CheckinError::configuration(
                "format",
                format!(
                    "Unknown file extension: '.{ext}'. Expected one of: {}",
                    Self::all_names().join(", ")
                ),
            )
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

fn feature_missing(format: OutputFormat) -> CheckinError {
    let feature = match format {
        OutputFormat::Csv => "csv-output",
        OutputFormat::Json => "json-output",
    };
    CheckinError::configuration(
        "format",
        format!("Output format {format} requires the '{feature}' feature to be enabled"),
    )
}

/// Writes the report to a file in the given format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_report(report: &Report, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(report, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(report, path),
        #[allow(unreachable_patterns)]
        _ => Err(feature_missing(format)),
    }
}

/// Converts the report to a string in the given format.
#[allow(unused_variables)]
pub fn to_format_string(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(report),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(report),
        #[allow(unreachable_patterns)]
        _ => Err(feature_missing(format)),
    }
}
