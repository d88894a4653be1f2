//! The audited calendar days.
//!
//! A [`TargetWindow`] covers whole weeks, Monday through Sunday, ending with
//! the week that contains "today". The current week is included even though
//! its remaining days have no messages yet.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{CheckinError, Result};

/// Ordered, contiguous run of calendar days under audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetWindow {
    days: Vec<NaiveDate>,
}

impl TargetWindow {
    /// Builds the `7 * weeks` day window ending on the Sunday of `today`'s week.
    ///
    /// `today` is passed in rather than read from the clock so that runs are
    /// reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use checkin::core::window::TargetWindow;
    /// use chrono::NaiveDate;
    ///
    /// // Wednesday
    /// let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    /// let window = TargetWindow::ending_this_week(today, 2)?;
    ///
    /// assert_eq!(window.len(), 14);
    /// assert_eq!(window.first(), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    /// assert_eq!(window.last(), NaiveDate::from_ymd_opt(2024, 3, 24).unwrap());
    /// # Ok::<(), checkin::CheckinError>(())
    /// ```
    pub fn ending_this_week(today: NaiveDate, weeks: u32) -> Result<Self> {
        if weeks == 0 {
            return Err(CheckinError::configuration("week", "must be at least 1"));
        }

        let into_week = u64::from(today.weekday().num_days_from_monday());
        let back = into_week + 7 * (u64::from(weeks) - 1);
        let start = today
            .checked_sub_days(Days::new(back))
            .ok_or_else(|| CheckinError::configuration("week", format!("{weeks} weeks reaches before the calendar start")))?;

        Self::starting_at(start, 7 * weeks as usize)
    }

    /// Builds a window of `len` days starting at `start`.
    pub fn starting_at(start: NaiveDate, len: usize) -> Result<Self> {
        let days: Vec<NaiveDate> = start.iter_days().take(len).collect();
        if days.len() != len || len == 0 {
            return Err(CheckinError::configuration(
                "week",
                "window does not fit the calendar",
            ));
        }
        Ok(Self { days })
    }

    /// First day of the window.
    pub fn first(&self) -> NaiveDate {
        self.days[0]
    }

    /// Last day of the window.
    pub fn last(&self) -> NaiveDate {
        self.days[self.days.len() - 1]
    }

    /// Days in order.
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always `false`: constructors reject empty windows.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Returns `true` if the day is inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first() <= date && date <= self.last()
    }

    /// Returns `true` if any instant of the timestamp's day is inside the window.
    pub fn contains_instant(&self, ts: NaiveDateTime) -> bool {
        self.contains(ts.date())
    }

    /// Position of the day in the window, for aligning report columns.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if !self.contains(date) {
            return None;
        }
        usize::try_from((date - self.first()).num_days()).ok()
    }
}
