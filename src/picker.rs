//! Calendar popover for choosing a `(from, to)` date pair.
//!
//! Nothing here reads the clock; callers pass `today` so the grid and the
//! "Today" shortcut are deterministic.

use chrono::{Datelike, Days, NaiveDate};

use crate::util::{array_range, format_ymd, month_of, year_of};

pub const FIRST_YEAR: i32 = 1990;
pub const GRID_CELLS: usize = 42;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_view_month: bool,
    pub selected: bool,
    pub range_start: bool,
    pub range_end: bool,
    pub is_today: bool,
    pub is_cursor: bool,
}

#[derive(Debug, Clone)]
pub struct DateRangePicker {
    pub is_open: bool,
    range: DateRange,
    view_month: u32,
    view_year: i32,
    cursor: NaiveDate,
}

impl DateRangePicker {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            is_open: false,
            range: DateRange::default(),
            view_month: month_of(today).unwrap_or_default(),
            view_year: year_of(today).unwrap_or(FIRST_YEAR),
            cursor: today,
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn view_month(&self) -> u32 {
        self.view_month
    }

    pub fn view_year(&self) -> i32 {
        self.view_year
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    /// A click on a calendar cell.
    ///
    /// The first click (or the first after a completed range) starts a new
    /// range. The second click closes it, swapping so that `start <= end`.
    pub fn select_date(&mut self, date: NaiveDate) {
        match (self.range.start, self.range.end) {
            (None, _) | (Some(_), Some(_)) => {
                self.range.start = Some(date);
                self.range.end = None;
            }
            (Some(start), None) if start < date => {
                self.range.end = Some(date);
            }
            (Some(start), None) => {
                self.range.start = Some(date);
                self.range.end = Some(start);
            }
        }
    }

    /// Emits the formatted range when complete. Always closes the popover.
    pub fn confirm(&mut self) -> Option<(String, String)> {
        let emitted = match (self.range.start, self.range.end) {
            (Some(start), Some(end)) => Some((format_ymd(start), format_ymd(end))),
            _ => None,
        };
        self.close();
        emitted
    }

    /// Drops any selection and tells the owner the filter is gone.
    pub fn clear(&mut self) -> (String, String) {
        self.range = DateRange::default();
        (String::new(), String::new())
    }

    /// Single-day range on `today`. Not confirmed.
    pub fn today(&mut self, today: NaiveDate) {
        self.range = DateRange {
            start: Some(today),
            end: Some(today),
        };
    }

    pub fn label(&self) -> Option<String> {
        match (self.range.start, self.range.end) {
            (Some(start), Some(end)) => {
                Some(format!("{} - {}", format_ymd(start), format_ymd(end)))
            }
            _ => None,
        }
    }

    pub fn set_view_month(&mut self, month0: u32) {
        self.view_month = month0.min(11);
    }

    pub fn set_view_year(&mut self, year: i32, today: NaiveDate) {
        self.view_year = year.clamp(FIRST_YEAR, today.year());
    }

    /// Stops at December of the current year.
    pub fn next_month(&mut self, today: NaiveDate) {
        if self.view_month < 11 {
            self.view_month += 1;
        } else if self.view_year < today.year() {
            self.view_month = 0;
            self.view_year += 1;
        }
    }

    /// Stops at January of the first offered year.
    pub fn prev_month(&mut self) {
        if self.view_month > 0 {
            self.view_month -= 1;
        } else if self.view_year > FIRST_YEAR {
            self.view_month = 11;
            self.view_year -= 1;
        }
    }

    /// Moves the keyboard cursor, following it into other months.
    pub fn move_cursor(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.cursor.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.cursor = date;
            self.show(date);
        }
    }

    pub fn select_cursor(&mut self) {
        self.select_date(self.cursor);
    }

    fn show(&mut self, date: NaiveDate) {
        self.view_month = date.month0();
        self.view_year = date.year();
    }

    fn first_of_view(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.view_year, self.view_month + 1, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Six Sunday-first weeks covering the viewed month.
    pub fn grid(&self, today: NaiveDate) -> [CalendarCell; GRID_CELLS] {
        let first = self.first_of_view();
        let lead = u64::from(first.weekday().num_days_from_sunday());
        let origin = first.checked_sub_days(Days::new(lead)).unwrap_or(first);

        std::array::from_fn(|i| {
            let date = origin
                .checked_add_days(Days::new(i as u64))
                .unwrap_or(origin);
            CalendarCell {
                date,
                in_view_month: date.month0() == self.view_month && date.year() == self.view_year,
                selected: self.range.contains(date),
                range_start: self.range.start == Some(date),
                range_end: self.range.end == Some(date),
                is_today: date == today,
                is_cursor: date == self.cursor,
            }
        })
    }
}

pub fn year_options(today: NaiveDate) -> Vec<i32> {
    array_range(FIRST_YEAR, today.year(), 1)
}
