//! # checkin
//!
//! A Rust library for auditing daily "check-in" messages in exported QQ group
//! chat logs.
//!
//! ## Overview
//!
//! A QQ export is one text blob where every message starts with a header
//! line:
//!
//! ```text
//! 2024-03-18 08:01:02 Alice(10001)
//! 打卡 day 12
//! ```
//!
//! checkin splits the blob into [`MessageRecord`]s, keeps the ones that
//! carry a configured keyword inside a window of whole weeks, and lays them
//! out as a per-sender, per-day calendar, printed as a console table and
//! exported as CSV or JSON.
//!
//! ## Quick Start
//!
//! ```rust
//! use checkin::prelude::*;
//! use chrono::NaiveDate;
//!
//! fn main() -> Result<()> {
//!     let log = "\
//! 2024-03-18 08:01:02 Alice(10001)
//! 打卡 day 12
//! 2024-03-18 09:00:00 Bob<bob@example.com>
//! good morning
//! ";
//!     let config = CheckinConfig::new(KeywordSpec::new(["打卡"]), 1);
//!     let matcher = KeywordMatcher::new(&config.keywords)?;
//!     let window = TargetWindow::ending_this_week(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(), config.weeks)?;
//!
//!     let (index, stats) = aggregate(extract(log), &matcher, &window, config.save_mode);
//!     assert_eq!(stats.total, 2);
//!     assert_eq!(stats.accepted, 1);
//!
//!     let report = Report::build(&index, &window);
//!     print!("{}", render_table(&report, &TableOptions::new()));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`encoding`] — byte decoding (BOM, UTF-8, GBK) and line-ending cleanup
//! - [`parser`] — lazy message extraction ([`extract`](parser::extract))
//! - [`config`] — keyword policy and TOML configuration ([`CheckinConfig`](config::CheckinConfig))
//! - [`core`] — matching, the audit window, aggregation and report sinks
//! - [`format`] — export format selection ([`OutputFormat`](format::OutputFormat))
//! - [`cli`] — command-line arguments (requires `cli` feature)
//! - [`logging`] — `tracing` subscriber setup for the binary (requires `cli` feature)
//! - [`error`] — unified error types ([`CheckinError`], [`Result`])
//! - [`prelude`] — convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod encoding;
pub mod error;
pub mod format;
#[cfg(feature = "cli")]
pub mod logging;
pub mod message;
pub mod parser;

// Re-export the main types at the crate root for convenience
pub use error::{CheckinError, Result};
pub use message::MessageRecord;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use checkin::prelude::*;
/// ```
pub mod prelude {
    pub use crate::MessageRecord;

    pub use crate::error::{CheckinError, Result};

    pub use crate::encoding::read_log;
    pub use crate::parser::{MessageIter, extract};

    pub use crate::config::{CheckinConfig, KeywordMode, KeywordPosition, KeywordSpec, SaveMode};

    pub use crate::core::{
        AggregationStats, Aggregator, CheckinIndex, DayCell, KeywordMatcher, Report, ReportRow,
        TableOptions, TargetWindow, aggregate, render_table,
    };

    pub use crate::format::{OutputFormat, to_format_string, write_report};

    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, write_json};
}
