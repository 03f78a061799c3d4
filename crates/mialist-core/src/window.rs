//! Calendar windows mapped onto attendance columns
//!
//! The attendance sheet has one column per day of the month, shifted right by
//! a fixed buffer. A week is therefore `[monday.day + buffer, sunday.day + buffer)`.
//!
//! The mapping uses day-of-month numbers only. A week that crosses into the
//! next month yields a range whose end is below its start, which selects no
//! columns.

use chrono::{Datelike, NaiveDate};

use crate::{ColumnRange, SheetLayout};

/// Converts "today" into the column ranges for the current and last week.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    /// Offset between day-of-month and attendance column
    pub day_buffer: usize,
    /// Days from the current Monday to the last-week anchor
    pub last_week_offset_days: i64,
}

impl Default for DateWindow {
    fn default() -> Self {
        Self::from_layout(&SheetLayout::default())
    }
}

impl DateWindow {
    pub fn from_layout(layout: &SheetLayout) -> Self {
        Self {
            day_buffer: layout.day_buffer,
            last_week_offset_days: layout.last_week_offset_days,
        }
    }

    /// Monday of the week containing `date`
    pub fn week_start(date: NaiveDate) -> NaiveDate {
        shift(date, -i64::from(date.weekday().num_days_from_monday()))
    }

    /// Columns for the Monday..Sunday week containing `today`
    pub fn current_week_range(&self, today: NaiveDate) -> ColumnRange {
        self.range_from(Self::week_start(today))
    }

    /// Columns for the week before `today`'s week
    pub fn last_week_range(&self, today: NaiveDate) -> ColumnRange {
        let anchor = shift(Self::week_start(today), self.last_week_offset_days);
        self.range_from(anchor)
    }

    fn range_from(&self, start: NaiveDate) -> ColumnRange {
        let finish = shift(start, 6);
        let range = ColumnRange::new(
            (start.day() as usize).saturating_add(self.day_buffer),
            (finish.day() as usize).saturating_add(self.day_buffer),
        );
        if range.is_empty() {
            tracing::warn!(
                start = %start,
                finish = %finish,
                %range,
                "week crosses a month boundary; range selects no columns"
            );
        }
        range
    }
}

/// `date` moved by `days`, clamped to the representable calendar
fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    chrono::Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn week_start_is_monday() {
        // 2025-01-15 is a Wednesday
        assert_eq!(DateWindow::week_start(date(2025, 1, 15)), date(2025, 1, 13));
        // Monday maps to itself
        assert_eq!(DateWindow::week_start(date(2025, 1, 13)), date(2025, 1, 13));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(DateWindow::week_start(date(2025, 1, 19)), date(2025, 1, 13));
    }

    #[test]
    fn current_week_from_wednesday() {
        let window = DateWindow::default();
        // Monday the 13th, Sunday the 19th
        assert_eq!(
            window.current_week_range(date(2025, 1, 15)),
            ColumnRange::new(19, 25)
        );
    }

    #[test]
    fn current_week_same_for_every_day_of_week() {
        let window = DateWindow::default();
        let expected = window.current_week_range(date(2025, 1, 13));
        for day in 13..=19 {
            assert_eq!(window.current_week_range(date(2025, 1, day)), expected);
        }
    }

    #[test]
    fn last_week_anchor_is_previous_wednesday() {
        let window = DateWindow::default();
        // Current Monday 2025-01-13, anchor 2025-01-08, finish 2025-01-14
        assert_eq!(
            window.last_week_range(date(2025, 1, 15)),
            ColumnRange::new(14, 20)
        );
    }

    #[test]
    fn buffer_is_configurable() {
        let window = DateWindow {
            day_buffer: 2,
            last_week_offset_days: -7,
        };
        assert_eq!(
            window.current_week_range(date(2025, 1, 15)),
            ColumnRange::new(15, 21)
        );
        assert_eq!(
            window.last_week_range(date(2025, 1, 15)),
            ColumnRange::new(8, 14)
        );
    }

    #[test]
    fn month_boundary_week_is_inverted() {
        let window = DateWindow::default();
        // Monday 2025-01-27 through Sunday 2025-02-02
        let range = window.current_week_range(date(2025, 1, 29));
        assert_eq!(range, ColumnRange::new(33, 8));
        assert!(range.is_empty());
    }

    #[test]
    fn last_week_reaches_into_previous_month() {
        let window = DateWindow::default();
        // Current Monday 2025-03-03, anchor 2025-02-26, finish 2025-03-04
        let range = window.last_week_range(date(2025, 3, 5));
        assert_eq!(range, ColumnRange::new(32, 10));
    }

    #[test]
    fn extreme_offsets_clamp_instead_of_overflowing() {
        let window = DateWindow {
            day_buffer: usize::MAX,
            last_week_offset_days: i64::MAX,
        };
        let range = window.last_week_range(date(2025, 1, 15));
        assert_eq!(range.end, usize::MAX);

        let window = DateWindow {
            day_buffer: 6,
            last_week_offset_days: i64::MIN,
        };
        let range = window.last_week_range(date(2025, 1, 15));
        assert_eq!(range.start, NaiveDate::MIN.day() as usize + 6);
    }

    #[test]
    fn calendar_edges_do_not_overflow() {
        let window = DateWindow::default();
        let range = window.current_week_range(NaiveDate::MAX);
        assert_eq!(range.end, NaiveDate::MAX.day() as usize + 6);
        assert_eq!(DateWindow::week_start(NaiveDate::MIN), NaiveDate::MIN);
    }
}
