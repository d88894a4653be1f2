//! The message record produced by the extractor.
//!
//! A [`MessageRecord`] is one entry of an exported QQ chat log:
//!
//! ```text
//! 2024-3-18 8:02:11 Alice(10001)
//! 打卡 已完成
//! ```
//!
//! # Examples
//!
//! ```
//! use checkin::MessageRecord;
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2024, 3, 18)
//!     .unwrap()
//!     .and_hms_opt(8, 2, 11)
//!     .unwrap();
//! let msg = MessageRecord::new(ts, "Alice", "10001", "打卡 已完成");
//!
//! assert_eq!(msg.display_name(), "Alice(10001)");
//! assert_eq!(msg.date(), ts.date());
//! ```

use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single chat log entry.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `NaiveDateTime` | Local wall-clock time from the header |
/// | `nickname` | `String` | Display name as shown in the header |
/// | `sender_id` | `String` | QQ number, or the `<...>` token when no number is shown |
/// | `body` | `String` | Message text, may span several lines |
///
/// `sender_id` is never empty for records produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// When the message was sent, as written in the log (no timezone).
    pub timestamp: NaiveDateTime,

    /// Sender nickname at the time of the message.
    pub nickname: String,

    /// Stable sender identity used for grouping.
    pub sender_id: String,

    /// Message text. Replaced by the matched fragments in `SaveMode::Match`.
    pub body: String,

    /// Byte range of header + body inside the normalized log text.
    ///
    /// Empty for records that were not produced by the extractor.
    #[serde(skip)]
    pub span: Range<usize>,
}

impl MessageRecord {
    /// Creates a record that is not tied to a position in a log.
    pub fn new(
        timestamp: NaiveDateTime,
        nickname: impl Into<String>,
        sender_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            nickname: nickname.into(),
            sender_id: sender_id.into(),
            body: body.into(),
            span: 0..0,
        }
    }

    /// Builder method to attach the source span.
    #[must_use]
    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = span;
        self
    }

    /// Calendar day of the message.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// `nickname(sender_id)`, the label used in reports.
    pub fn display_name(&self) -> String {
        format!("{}({})", self.nickname, self.sender_id)
    }

    /// Returns `true` if the body is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}
