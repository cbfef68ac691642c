//! Event records stored against a day.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::date_key::{DateKey, TimeOfDay};
use crate::error::{CalDeskError, CalDeskResult};

/// Recurrence tag recorded with an event.
///
/// Recorded and displayed only; no future instances are generated from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub const ALL: [Recurrence; 5] = [
        Recurrence::None,
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly,
        Recurrence::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }
}

impl FromStr for Recurrence {
    type Err = CalDeskError;

    fn from_str(s: &str) -> CalDeskResult<Self> {
        Recurrence::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                CalDeskError::Validation(format!(
                    "Unknown recurrence '{}'. Expected one of: none, daily, weekly, monthly, yearly",
                    s
                ))
            })
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled item on a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    pub time: TimeOfDay,
    /// Day + time of the event; what the reminder scan compares against.
    #[serde(with = "minute_format")]
    pub datetime: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub notified: bool,
}

impl EventRecord {
    /// Create an un-notified record on `date`. The title must not be blank.
    pub fn new(
        date: DateKey,
        title: impl Into<String>,
        time: TimeOfDay,
        recurrence: Option<Recurrence>,
    ) -> CalDeskResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CalDeskError::Validation("Event title is required".into()));
        }

        Ok(EventRecord {
            title,
            time,
            datetime: date.at(time),
            recurrence,
            notified: false,
        })
    }

    /// Line shown in a day cell and in reminder bodies, e.g. `09:00 - Standup`.
    pub fn summary(&self) -> String {
        format!("{} - {}", self.time, self.title)
    }
}

/// `YYYY-MM-DDTHH:MM`, the minute-resolution form the store has always used.
mod minute_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
