//! Canonical `YYYY-MM-DD` day identifiers and `HH:MM` times.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CalDeskError, CalDeskResult};

/// One calendar day, always rendered as zero-padded `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    /// Build from a year, a zero-based month and a day of month.
    pub fn from_ymd(year: i32, month0: u32, day: u32) -> CalDeskResult<Self> {
        NaiveDate::from_ymd_opt(year, month0 + 1, day)
            .map(DateKey)
            .ok_or_else(|| {
                CalDeskError::Validation(format!(
                    "No such day: {}-{:02}-{:02}",
                    year,
                    month0 + 1,
                    day
                ))
            })
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Day of week with 0 = Sunday.
    pub fn weekday_index(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// The moment `time` falls on this day.
    pub fn at(&self, time: TimeOfDay) -> NaiveDateTime {
        self.0.and_time(time.0)
    }
}

impl FromStr for DateKey {
    type Err = CalDeskError;

    fn from_str(s: &str) -> CalDeskResult<Self> {
        // chrono accepts unpadded fields, so check the shape first
        let b = s.as_bytes();
        let shaped = b.len() == 10
            && b[4] == b'-'
            && b[7] == b'-'
            && b.iter()
                .enumerate()
                .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());

        if !shaped {
            return Err(CalDeskError::Parse(format!(
                "Invalid date '{}'. Expected YYYY-MM-DD",
                s
            )));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(DateKey)
            .map_err(|_| CalDeskError::Parse(format!("Invalid date '{}'", s)))
    }
}

impl TryFrom<String> for DateKey {
    type Error = CalDeskError;

    fn try_from(s: String) -> CalDeskResult<Self> {
        s.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> String {
        key.to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A 24h wall-clock time with minute resolution, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = CalDeskError;

    fn from_str(s: &str) -> CalDeskResult<Self> {
        let b = s.as_bytes();
        let shaped = b.len() == 5
            && b[2] == b':'
            && b.iter()
                .enumerate()
                .all(|(i, c)| i == 2 || c.is_ascii_digit());

        if !shaped {
            return Err(CalDeskError::Parse(format!(
                "Invalid time '{}'. Expected HH:MM",
                s
            )));
        }

        NaiveTime::parse_from_str(s, "%H:%M")
            .map(TimeOfDay)
            .map_err(|_| CalDeskError::Parse(format!("Invalid time '{}'", s)))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = CalDeskError;

    fn try_from(s: String) -> CalDeskResult<Self> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> String {
        time.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}
