//! The month currently on display.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

/// A (year, month) pair with `month` zero-based in `0..=11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarCursor {
    year: i32,
    month: u32,
}

const MONTH_NAMES: [&str; 12] = [
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

impl CalendarCursor {
    /// Build a cursor, rolling months outside `0..=11` into adjacent years
    /// (-1 is the previous December, 12 the next January).
    pub fn new(year: i32, month: i32) -> Self {
        let total = year as i64 * 12 + month as i64;
        CalendarCursor {
            year: total.div_euclid(12) as i32,
            month: total.rem_euclid(12) as u32,
        }
    }

    pub fn today() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> Self {
        CalendarCursor {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn prev(&self) -> Self {
        self.offset(-1)
    }

    pub fn next(&self) -> Self {
        self.offset(1)
    }

    pub fn offset(&self, months: i32) -> Self {
        Self::new(self.year, self.month as i32 + months)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
    }

    /// Number of days in the month: day 0 of the following month.
    pub fn days_in_month(&self) -> u32 {
        self.next()
            .first_day()
            .and_then(|d| d.pred_opt())
            .map(|d| d.day())
            .unwrap_or(0)
    }

    /// Weekday of the 1st, 0 = Sunday.
    pub fn first_weekday(&self) -> u32 {
        self.first_day()
            .map(|d| d.weekday().num_days_from_sunday())
            .unwrap_or(0)
    }

    /// Heading such as "March 2024".
    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month as usize], self.year)
    }
}

impl fmt::Display for CalendarCursor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.title())
    }
}
