//! Calendar-shaped view of a [`CheckinIndex`].
//!
//! A [`Report`] has one column per day of the [`TargetWindow`] and one
//! [`ReportRow`] per sender. It is what the output sinks render.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::aggregator::CheckinIndex;
use crate::core::window::TargetWindow;

/// One sender/day cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "messages")]
pub enum DayCell {
    /// The sender checked in; holds the stored bodies in arrival order.
    Present(Vec<String>),
    /// No qualifying message that day.
    Absent,
}

impl DayCell {
    /// Returns `true` for [`DayCell::Present`].
    pub fn is_present(&self) -> bool {
        matches!(self, DayCell::Present(_))
    }

    /// Stored bodies; empty for [`DayCell::Absent`].
    pub fn messages(&self) -> &[String] {
        match self {
            DayCell::Present(messages) => messages,
            DayCell::Absent => &[],
        }
    }
}

/// One sender aligned to the report's days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// `nickname(sender_id)`.
    pub display_name: String,
    /// Grouping key.
    pub sender_id: String,
    /// One cell per report day, same order as [`Report::days`].
    pub cells: Vec<DayCell>,
}

impl ReportRow {
    /// Number of days with a check-in.
    pub fn present_days(&self) -> usize {
        self.cells.iter().filter(|c| c.is_present()).count()
    }
}

/// Final, read-only report handed to the sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Audited days, oldest first.
    pub days: Vec<NaiveDate>,
    /// One row per sender, ordered by sender id.
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Lays the index out over the window's days.
    ///
    /// # Example
    ///
    /// ```
    /// use checkin::core::aggregator::CheckinIndex;
    /// use checkin::core::report::{DayCell, Report};
    /// use checkin::core::window::TargetWindow;
    /// use checkin::MessageRecord;
    /// use chrono::NaiveDate;
    ///
    /// let monday = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
    /// let window = TargetWindow::ending_this_week(monday, 1)?;
    ///
    /// let mut index = CheckinIndex::new();
    /// index.insert(MessageRecord::new(monday.and_hms_opt(9, 0, 0).unwrap(), "Alice", "1", "打卡"));
    ///
    /// let report = Report::build(&index, &window);
    /// assert_eq!(report.days.len(), 7);
    /// assert_eq!(report.rows[0].cells[0], DayCell::Present(vec!["打卡".to_string()]));
    /// assert_eq!(report.rows[0].cells[1], DayCell::Absent);
    /// # Ok::<(), checkin::CheckinError>(())
    /// ```
    pub fn build(index: &CheckinIndex, window: &TargetWindow) -> Self {
        let days = window.days().to_vec();
        let rows = index
            .iter()
            .map(|(sender_id, checkins)| ReportRow {
                display_name: checkins.display_name.clone(),
                sender_id: sender_id.to_string(),
                cells: days
                    .iter()
                    .map(|&day| match checkins.on(day) {
                        [] => DayCell::Absent,
                        records => {
                            DayCell::Present(records.iter().map(|r| r.body.clone()).collect())
                        }
                    })
                    .collect(),
            })
            .collect();

        Self { days, rows }
    }

    /// Returns `true` if nobody checked in.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
