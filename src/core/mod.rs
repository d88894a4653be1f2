//! Check-in processing.
//!
//! This module contains:
//! - [`matcher`] - keyword matching over message bodies
//! - [`window`] - the audited calendar days
//! - [`aggregator`] - grouping accepted records by sender and day
//! - [`report`] - calendar-shaped view handed to the sinks
//! - [`output`] - console table, CSV and JSON sinks
//!
//! # Quick Start
//!
//! ```rust
//! use checkin::config::KeywordSpec;
//! use checkin::core::{KeywordMatcher, Report, SaveMode, TargetWindow, aggregate};
//! use checkin::parser::extract;
//! use chrono::NaiveDate;
//!
//! # fn main() -> checkin::Result<()> {
//! let log = "2024-03-18 08:00:00 Alice(10001)\n打卡 day one\n";
//! let matcher = KeywordMatcher::new(&KeywordSpec::new(["打卡"]))?;
//! let window = TargetWindow::ending_this_week(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(), 1)?;
//!
//! let (index, stats) = aggregate(extract(log), &matcher, &window, SaveMode::All);
//! assert_eq!(stats.accepted, 1);
//!
//! let report = Report::build(&index, &window);
//! assert!(report.rows[0].cells[0].is_present());
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod matcher;
pub mod output;
pub mod report;
pub mod window;

pub use aggregator::{AggregationStats, Aggregator, CheckinIndex, Disposition, SenderCheckins, aggregate};
pub use matcher::KeywordMatcher;
pub use report::{DayCell, Report, ReportRow};
pub use window::TargetWindow;

pub use crate::config::SaveMode;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, write_json};
pub use output::{TableOptions, render_table};
