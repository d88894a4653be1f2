//! Check-in aggregation.
//!
//! The [`Aggregator`] folds a stream of [`MessageRecord`]s into a
//! [`CheckinIndex`]: sender id → calendar day → every qualifying message of
//! that sender on that day, in arrival order.
//!
//! A record qualifies when its day is inside the [`TargetWindow`] and its body
//! satisfies the [`KeywordMatcher`]. With [`SaveMode::Match`] the stored body
//! is reduced to the matched fragments.
//!
//! # Example
//!
//! ```
//! use checkin::config::{KeywordSpec, SaveMode};
//! use checkin::core::aggregator::aggregate;
//! use checkin::core::matcher::KeywordMatcher;
//! use checkin::core::window::TargetWindow;
//! use checkin::parser::extract;
//! use chrono::NaiveDate;
//!
//! # fn main() -> checkin::Result<()> {
//! let log = "2024-3-18 8:00:00 Alice(1)\n打卡 跑步\n2024-3-18 20:00:00 Alice(1)\n打卡 背单词\n";
//! let matcher = KeywordMatcher::new(&KeywordSpec::new(["打卡"]))?;
//! let window = TargetWindow::ending_this_week(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(), 1)?;
//!
//! let (index, stats) = aggregate(extract(log), &matcher, &window, SaveMode::All);
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
//! assert_eq!(index.get("1").unwrap().on(day).len(), 2);
//! assert_eq!(stats.accepted, 2);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::MessageRecord;
use crate::config::SaveMode;
use crate::core::matcher::KeywordMatcher;
use crate::core::window::TargetWindow;

/// Check-ins of one sender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SenderCheckins {
    /// `nickname(sender_id)` of the most recently ingested record.
    pub display_name: String,

    /// Qualifying messages per calendar day, in arrival order.
    pub days: BTreeMap<NaiveDate, Vec<MessageRecord>>,
}

impl SenderCheckins {
    /// Messages on the given day; empty if the sender did not check in.
    pub fn on(&self, date: NaiveDate) -> &[MessageRecord] {
        self.days.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct days with at least one check-in.
    pub fn days_checked_in(&self) -> usize {
        self.days.len()
    }

    /// Total number of stored messages across all days.
    pub fn message_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

/// Sender id → [`SenderCheckins`], ordered by sender id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckinIndex {
    senders: BTreeMap<String, SenderCheckins>,
}

impl CheckinIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to its sender/day bucket and refreshes the display name.
    pub fn insert(&mut self, record: MessageRecord) {
        let entry = self.senders.entry(record.sender_id.clone()).or_default();
        entry.display_name = record.display_name();
        entry.days.entry(record.date()).or_default().push(record);
    }

    /// Check-ins of one sender.
    pub fn get(&self, sender_id: &str) -> Option<&SenderCheckins> {
        self.senders.get(sender_id)
    }

    /// Iterates over `(sender_id, checkins)` in sender id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SenderCheckins)> {
        self.senders.iter().map(|(id, c)| (id.as_str(), c))
    }

    /// Number of senders with at least one check-in.
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    /// Returns `true` if nobody checked in.
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

/// What happened to an ingested record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The record's day is outside the target window.
    OutOfWindow,
    /// The body does not satisfy the keyword policy.
    NoMatch,
    /// The record was stored.
    Accepted,
}

/// Counters collected while aggregating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    /// Records seen.
    pub total: usize,
    /// Records dropped for being outside the window.
    pub out_of_window: usize,
    /// Records in the window without a keyword match.
    pub unmatched: usize,
    /// Records stored as check-ins.
    pub accepted: usize,
    /// Distinct senders with at least one check-in.
    pub senders: usize,
}

impl AggregationStats {
    /// Share of records that were stored, in percent.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.accepted as f64 / self.total as f64) * 100.0
    }
}

/// Incremental check-in aggregator.
#[derive(Debug)]
pub struct Aggregator<'a> {
    matcher: &'a KeywordMatcher,
    window: &'a TargetWindow,
    save_mode: SaveMode,
    index: CheckinIndex,
    stats: AggregationStats,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator with an empty index.
    pub fn new(matcher: &'a KeywordMatcher, window: &'a TargetWindow, save_mode: SaveMode) -> Self {
        Self {
            matcher,
            window,
            save_mode,
            index: CheckinIndex::new(),
            stats: AggregationStats::default(),
        }
    }

    /// Filters one record and stores it if it qualifies.
    pub fn ingest(&mut self, mut record: MessageRecord) -> Disposition {
        self.stats.total += 1;

        if !self.window.contains_instant(record.timestamp) {
            self.stats.out_of_window += 1;
            trace!(ts = %record.timestamp, "outside target window");
            return Disposition::OutOfWindow;
        }

        if !self.matcher.is_match(&record.body) {
            self.stats.unmatched += 1;
            return Disposition::NoMatch;
        }

        // The save mode only rewrites what is stored, never whether it counts.
        if self.save_mode == SaveMode::Match {
            record.body = self.matcher.fragment_text(&record.body).unwrap_or_default();
        }

        debug!(
            sender = %record.sender_id,
            date = %record.date(),
            "check-in accepted"
        );
        self.index.insert(record);
        self.stats.accepted += 1;
        Disposition::Accepted
    }

    /// Ingests every record of an iterator.
    pub fn extend<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = MessageRecord>,
    {
        for record in records {
            self.ingest(record);
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> AggregationStats {
        AggregationStats {
            senders: self.index.len(),
            ..self.stats
        }
    }

    /// Consumes the aggregator, returning the index and final counters.
    pub fn finish(self) -> (CheckinIndex, AggregationStats) {
        let stats = self.stats();
        info!(
            total = stats.total,
            accepted = stats.accepted,
            out_of_window = stats.out_of_window,
            unmatched = stats.unmatched,
            senders = stats.senders,
            "aggregation finished"
        );
        (self.index, stats)
    }
}

/// One-shot aggregation of a record stream.
pub fn aggregate<I>(
    records: I,
    matcher: &KeywordMatcher,
    window: &TargetWindow,
    save_mode: SaveMode,
) -> (CheckinIndex, AggregationStats)
where
    I: IntoIterator<Item = MessageRecord>,
{
    let mut aggregator = Aggregator::new(matcher, window, save_mode);
    aggregator.extend(records);
    aggregator.finish()
}
