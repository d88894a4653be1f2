//! Report sinks.
//!
//! - [`render_table`] - console table, always available
//! - [`write_csv`] / [`to_csv`] - spreadsheet export - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON report - requires `json-output` feature
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "csv-output")]
//! # fn main() -> checkin::Result<()> {
//! use checkin::core::output::{TableOptions, render_table, write_csv};
//! use checkin::core::report::Report;
//! use checkin::core::window::TargetWindow;
//! use checkin::core::aggregator::CheckinIndex;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
//! let window = TargetWindow::ending_this_week(today, 1)?;
//! let report = Report::build(&CheckinIndex::new(), &window);
//!
//! print!("{}", render_table(&report, &TableOptions::new()));
//! write_csv(&report, "checkin.csv".as_ref())?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "csv-output"))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
pub mod table;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
pub use table::{NAME_HEADER, TableOptions, render_table};
