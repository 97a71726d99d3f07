use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

/// Inclusive range of calendar dates under observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ObservationWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ObservationWindow {
    pub const DEFAULT_DAYS: u32 = 30;

    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// `[end - days, end]`, `None` when the start falls outside the
    /// representable date range.
    pub fn trailing(end: NaiveDate, days: u32) -> Option<Self> {
        let start = end.checked_sub_signed(TimeDelta::try_days(i64::from(days))?)?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
