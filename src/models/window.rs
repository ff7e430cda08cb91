//! Paging windows for chart queries.
//!
//! `DayWindow` is relative to "today" (steps, heart rate); `DateWindow` is
//! pinned to absolute dates (weight). Both are half-open and keep their width
//! across shifts, so `start < end` holds after every navigation step.

use chrono::{DateTime, Days, Local, NaiveDate};

use super::sample::local_midnight;
use crate::constants::MAX_DAY_OFFSET;

/// Half-open day interval `[today + start, today + end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: i32,
    end: i32,
}

impl Default for DayWindow {
    fn default() -> Self {
        Self { start: 0, end: 1 }
    }
}

impl DayWindow {
    /// Build a window, clamping offsets into range and widening an empty or
    /// inverted pair to a single day.
    pub fn new(start: i32, end: i32) -> Self {
        let start = start.clamp(-MAX_DAY_OFFSET, MAX_DAY_OFFSET - 1);
        let end = end.clamp(-MAX_DAY_OFFSET, MAX_DAY_OFFSET);
        let end = if end <= start { start + 1 } else { end };
        Self { start, end }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    #[cfg(test)]
    pub fn width(&self) -> i32 {
        self.end - self.start
    }

    /// Move one day into the past. Returns `false` at the offset bound.
    pub fn shift_earlier(&mut self) -> bool {
        if self.start - 1 < -MAX_DAY_OFFSET {
            return false;
        }
        self.start -= 1;
        self.end -= 1;
        true
    }

    /// Move one day into the future. Returns `false` at the offset bound.
    pub fn shift_later(&mut self) -> bool {
        if self.end + 1 > MAX_DAY_OFFSET {
            return false;
        }
        self.start += 1;
        self.end += 1;
        true
    }

    /// First calendar day covered by the window.
    pub fn first_day(&self, today: NaiveDate) -> NaiveDate {
        offset_date(today, self.start)
    }

    /// Local-time instants bounding the window.
    pub fn bounds(&self, today: NaiveDate) -> (DateTime<Local>, DateTime<Local>) {
        (
            local_midnight(offset_date(today, self.start)),
            local_midnight(offset_date(today, self.end)),
        )
    }

    /// Human caption: a single date, or an inclusive date range.
    pub fn caption(&self, today: NaiveDate) -> String {
        let first = offset_date(today, self.start);
        let last = offset_date(today, self.end - 1);
        if first == last {
            first.format("%Y-%m-%d").to_string()
        } else {
            format!("{} → {}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d"))
        }
    }
}

fn offset_date(today: NaiveDate, offset: i32) -> NaiveDate {
    let days = Days::new(offset.unsigned_abs() as u64);
    let shifted = if offset >= 0 {
        today.checked_add_days(days)
    } else {
        today.checked_sub_days(days)
    };
    shifted.unwrap_or(today)
}

/// Half-open absolute interval `[start, end)` of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Build a window; an empty or inverted pair is widened to one day.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let end = if end <= start {
            start.succ_opt().unwrap_or(start)
        } else {
            end
        };
        Self { start, end }
    }

    /// From `start` through the end of `today`.
    pub fn through_today(start: NaiveDate, today: NaiveDate) -> Self {
        Self::new(start, today.succ_opt().unwrap_or(today))
    }

    #[cfg(test)]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[cfg(test)]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Move `step` days into the past. Returns `false` when out of calendar range.
    pub fn shift_earlier(&mut self, step: u32) -> bool {
        let days = Days::new(step as u64);
        match (self.start.checked_sub_days(days), self.end.checked_sub_days(days)) {
            (Some(start), Some(end)) => {
                self.start = start;
                self.end = end;
                true
            }
            _ => false,
        }
    }

    /// Move `step` days into the future. Returns `false` when out of calendar range.
    pub fn shift_later(&mut self, step: u32) -> bool {
        let days = Days::new(step as u64);
        match (self.start.checked_add_days(days), self.end.checked_add_days(days)) {
            (Some(start), Some(end)) => {
                self.start = start;
                self.end = end;
                true
            }
            _ => false,
        }
    }

    pub fn bounds(&self) -> (DateTime<Local>, DateTime<Local>) {
        (local_midnight(self.start), local_midnight(self.end))
    }

    pub fn caption(&self) -> String {
        let last = self.end.pred_opt().unwrap_or(self.end);
        format!("{} → {}", self.start.format("%Y-%m-%d"), last.format("%Y-%m-%d"))
    }
}
