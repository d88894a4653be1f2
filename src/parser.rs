//! Message extraction from exported QQ chat logs.
//!
//! A QQ "export messages" text file is a sequence of entries, each starting
//! with a header line:
//!
//! ```text
//! 2024-3-18 8:02:11 Alice(10001)
//! 打卡 已完成
//! 今天跑了 5km
//!
//! 2024-3-18 8:05:40 bob<bob@example.com>
//! 签到
//! ```
//!
//! The header is a date-time stamp at the start of a line, whitespace, a
//! nickname, and then either a parenthesized QQ number or an angle-bracketed
//! fallback token. Everything up to the next line-start stamp is the body.
//!
//! Seconds 60 and 61 are accepted and stored as a leap second, so such a
//! record still lands on its calendar day.
//!
//! Nicknames are free text and may even contain line breaks, so the header is
//! matched non-greedily up to the first `(digits)` / `<token>` that is
//! directly followed by a newline.
//!
//! # Example
//!
//! ```
//! use checkin::parser::extract;
//!
//! let log = "2024-3-18 8:02:11 Alice(10001)\n打卡\n\n2024-3-18 8:05:40 bob<bob@example.com>\n签到\n";
//! let records: Vec<_> = extract(log).collect();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].sender_id, "10001");
//! assert_eq!(records[1].sender_id, "bob@example.com");
//! assert_eq!(records[1].body, "签到");
//! ```

use std::iter::FusedIterator;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::MessageRecord;
use crate::encoding::read_log;
use crate::error::{CheckinError, Result};

/// Header line: stamp, nickname, id, newline.
///
/// Seconds accept up to three digits; some exporters emit malformed values
/// and those are rejected later, per record, instead of breaking the scan.
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ms)^(?P<stamp>(?P<year>[0-9]{4})-(?P<month>[0-9]{1,2})-(?P<day>[0-9]{1,2})\s+(?P<hour>[0-9]{1,2}):(?P<minute>[0-9]{1,2}):(?P<second>[0-9]{1,3}))\s+(?P<nickname>.*?)(?:\((?P<qq>[0-9]+)\)|<(?P<token>[^>]+)>)\n",
    )
    .expect("header pattern is valid")
});

/// A date-time stamp at a line start. Marks where the previous body ends.
static STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}\s+[0-9]{1,2}:[0-9]{1,2}:[0-9]{1,3}")
        .expect("stamp pattern is valid")
});

/// Starts a lazy scan over normalized log text.
///
/// The text must already use LF line endings (see
/// [`normalize_line_endings`](crate::encoding::normalize_line_endings)).
/// The returned iterator yields records in text order; call `extract` again
/// to restart.
pub fn extract(text: &str) -> MessageIter<'_> {
    MessageIter {
        text,
        pos: 0,
        yielded: 0,
        skipped: 0,
    }
}

/// Extracts every record from a string into memory.
pub fn parse_str(text: &str) -> Vec<MessageRecord> {
    extract(text).collect()
}

/// Reads, decodes and extracts every record of a log file.
pub fn parse_file(path: &Path) -> Result<Vec<MessageRecord>> {
    let text = read_log(path)?;
    Ok(parse_str(&text))
}

/// Lazy iterator over the records of a chat log.
///
/// Headers with impossible timestamps are logged and skipped; see
/// [`skipped`](MessageIter::skipped).
#[derive(Debug, Clone)]
pub struct MessageIter<'a> {
    text: &'a str,
    pos: usize,
    yielded: usize,
    skipped: usize,
}

impl MessageIter<'_> {
    /// Number of records yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Number of headers dropped because their timestamp was invalid.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Byte offset where the next scan starts.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    pub fn progress(&self) -> f64 {
        if self.text.is_empty() {
            return 100.0;
        }
        (self.pos as f64 / self.text.len() as f64) * 100.0
    }
}

impl Iterator for MessageIter<'_> {
    type Item = MessageRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pos >= self.text.len() {
                return None;
            }

            let Some(caps) = HEADER.captures_at(self.text, self.pos) else {
                self.pos = self.text.len();
                return None;
            };
            let header = caps.get(0)?;

            // A nickname spanning a later stamp means this "header" started on
            // a line without an id. Resume at the later stamp instead.
            if let Some(inner) = STAMP.find_at(self.text, header.start() + 1) {
                if inner.start() < header.end() {
                    debug!(
                        offset = header.start(),
                        "stamp line without sender id, skipping to next stamp"
                    );
                    self.pos = inner.start();
                    continue;
                }
            }

            let body_end = STAMP
                .find_at(self.text, header.end())
                .map_or(self.text.len(), |m| m.start());
            self.pos = body_end;

            match build_record(&caps, &self.text[header.end()..body_end]) {
                Ok(record) => {
                    self.yielded += 1;
                    return Some(record.with_span(header.start()..body_end));
                }
                Err(err) => {
                    self.skipped += 1;
                    warn!(offset = header.start(), "{err}");
                }
            }
        }
    }
}

impl FusedIterator for MessageIter<'_> {}

fn build_record(caps: &Captures<'_>, body: &str) -> Result<MessageRecord> {
    let stamp = caps.name("stamp").map_or("", |m| m.as_str());
    let timestamp = parse_timestamp(caps, stamp)?;

    let sender_id = caps
        .name("qq")
        .or_else(|| caps.name("token"))
        .map_or("", |m| m.as_str().trim());
    if sender_id.is_empty() {
        return Err(CheckinError::record_parse(stamp, "empty sender id"));
    }

    let nickname = caps.name("nickname").map_or("", |m| m.as_str().trim());

    Ok(MessageRecord::new(timestamp, nickname, sender_id, body.trim()))
}

fn parse_timestamp(caps: &Captures<'_>, stamp: &str) -> Result<NaiveDateTime> {
    let field = |name: &'static str| -> Result<u32> {
        caps.name(name)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(|| CheckinError::record_parse(stamp, format!("missing {name}")))
    };

    let year = field("year")?;
    let date = i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, field("month").ok()?, field("day").ok()?))
        .ok_or_else(|| CheckinError::record_parse(stamp, "date out of range"))?;

    let (hour, minute, second) = (field("hour")?, field("minute")?, field("second")?);
    let time = match second {
        // Seconds 60 and 61 are kept as a leap second on :59.
        60 | 61 => date.and_hms_milli_opt(hour, minute, 59, 1_000),
        _ => date.and_hms_opt(hour, minute, second),
    };
    time.ok_or_else(|| CheckinError::record_parse(stamp, "time out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_extract_numeric_id() {
        let log = "2024-3-18 8:02:11 Alice(10001)\n打卡 已完成\n";
        let records = parse_str(log);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, ts(2024, 3, 18, 8, 2, 11));
        assert_eq!(records[0].nickname, "Alice");
        assert_eq!(records[0].sender_id, "10001");
        assert_eq!(records[0].body, "打卡 已完成");
    }

    #[test]
    fn test_extract_token_id() {
        let log = "2024-03-18 08:05:40 bob<bob@example.com>\n签到\n";
        let records = parse_str(log);
        assert_eq!(records[0].sender_id, "bob@example.com");
        assert_eq!(records[0].nickname, "bob");
    }

    #[test]
    fn test_extract_multiline_body() {
        let log = "2024-3-18 8:02:11 Alice(10001)\n打卡\n第二行\n\n第四行\n\n2024-3-18 9:00:00 Bob(2)\nhi\n";
        let records = parse_str(log);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].body, "打卡\n第二行\n\n第四行");
        assert_eq!(records[1].body, "hi");
    }

    #[test]
    fn test_extract_empty_body() {
        let log = "2024-3-18 8:02:11 Alice(10001)\n2024-3-18 8:03:00 Bob(2)\nhello\n";
        let records = parse_str(log);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].body, "");
        assert_eq!(records[1].body, "hello");
    }

    #[test]
    fn test_extract_trims_fields() {
        let log = "2024-3-18 8:02:11    Alice   ( 10001 )\n   body  \n";
        // "( 10001 )" is not a numeric id, so the header does not match
        assert!(parse_str(log).is_empty());

        let log = "2024-3-18 8:02:11    Alice   <  a@b.c  >\n   body  \n\n\n";
        let records = parse_str(log);
        assert_eq!(records[0].nickname, "Alice");
        assert_eq!(records[0].sender_id, "a@b.c");
        assert_eq!(records[0].body, "body");
    }

    #[test]
    fn test_nickname_with_parentheses() {
        let log = "2024-3-18 8:02:11 Bob(work)(2)\nhi\n";
        let records = parse_str(log);
        assert_eq!(records[0].nickname, "Bob(work)");
        assert_eq!(records[0].sender_id, "2");
    }

    #[test]
    fn test_nickname_spanning_lines() {
        let log = "2024-3-18 8:02:11 Bob\nthe builder(2)\nhi\n";
        let records = parse_str(log);
        assert_eq!(records[0].nickname, "Bob\nthe builder");
        assert_eq!(records[0].body, "hi");
    }

    #[test]
    fn test_invalid_timestamp_is_skipped() {
        let log = "2024-13-01 8:00:00 Bad(1)\nnope\n2024-3-18 8:00:75 Bad(1)\nnope\n2024-3-18 8:00:00 Good(2)\nyes\n";
        let mut iter = extract(log);
        let records: Vec<_> = iter.by_ref().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].nickname, "Good");
        assert_eq!(iter.skipped(), 2);
        assert_eq!(iter.yielded(), 1);
    }

    #[test]
    fn test_leap_seconds_are_kept() {
        let log = "2024-3-18 23:59:60 A(1)\nx\n2024-3-18 8:00:61 B(2)\ny\n2024-3-18 8:00:62 C(3)\nz\n";
        let mut iter = extract(log);
        let records: Vec<_> = iter.by_ref().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(iter.skipped(), 1);

        let leap = records[0].timestamp;
        assert_eq!(leap.date(), NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert!(leap > ts(2024, 3, 18, 23, 59, 59));
        assert_eq!(records[1].body, "y");
    }

    #[test]
    fn test_three_digit_seconds_in_range() {
        let log = "2024-3-18 8:00:007 A(1)\nx\n";
        let records = parse_str(log);
        assert_eq!(records[0].timestamp, ts(2024, 3, 18, 8, 0, 7));
    }

    #[test]
    fn test_header_without_id_does_not_swallow_next() {
        let log = "2024-3-18 8:00:00 系统消息\n有人加入了群\n2024-3-18 8:01:00 Alice(1)\n打卡\n";
        let records = parse_str(log);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].nickname, "Alice");
        assert_eq!(records[0].body, "打卡");
    }

    #[test]
    fn test_stamp_must_start_line() {
        let log = "2024-3-18 8:00:00 Alice(1)\n见 2024-3-19 9:00:00 的消息\n";
        let records = parse_str(log);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, "见 2024-3-19 9:00:00 的消息");
    }

    #[test]
    fn test_preamble_is_ignored() {
        let log = "消息记录（此消息记录为文本格式，不支持重新导入）\n\n================\n消息分组:我的群\n================\n\n2024-3-18 8:00:00 Alice(1)\n打卡\n";
        let records = parse_str(log);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].span.start, log.find("2024").unwrap());
    }

    #[test]
    fn test_spans_are_contiguous() {
        let log = "2024-3-18 8:00:00 A(1)\none\n\n2024-3-18 8:01:00 B(2)\ntwo\n";
        let records = parse_str(log);
        assert_eq!(records[0].span.end, records[1].span.start);
        assert_eq!(records[1].span.end, log.len());
        assert_eq!(&log[records[0].span.clone()], "2024-3-18 8:00:00 A(1)\none\n\n");
    }

    #[test]
    fn test_iterator_is_fused_and_restartable() {
        let log = "2024-3-18 8:00:00 A(1)\none\n";
        let mut iter = extract(log);
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
        assert!((iter.progress() - 100.0).abs() < f64::EPSILON);
        assert_eq!(extract(log).count(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_str("").is_empty());
        assert!(parse_str("\n\n\n").is_empty());
    }
}
