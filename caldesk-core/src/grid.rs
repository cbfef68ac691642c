//! Month grid construction.
//!
//! Pure: takes a cursor and a store, returns cells. Rendering lives elsewhere.

use crate::cursor::CalendarCursor;
use crate::date_key::DateKey;
use crate::event::EventRecord;
use crate::store::EventStore;

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq)]
pub enum DayCell {
    /// Padding before the 1st of the month.
    Empty,
    Day {
        key: DateKey,
        day: u32,
        events: Vec<EventRecord>,
    },
}

impl DayCell {
    pub fn key(&self) -> Option<&DateKey> {
        match self {
            DayCell::Empty => None,
            DayCell::Day { key, .. } => Some(key),
        }
    }

    pub fn events(&self) -> &[EventRecord] {
        match self {
            DayCell::Empty => &[],
            DayCell::Day { events, .. } => events,
        }
    }

    /// One `HH:MM - Title` line per event.
    pub fn summary(&self) -> Vec<String> {
        self.events().iter().map(EventRecord::summary).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub cursor: CalendarCursor,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Rows of seven cells, Sunday first. The last row may be short.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, key: &DateKey) -> Option<&DayCell> {
        self.cells.iter().find(|c| c.key() == Some(key))
    }
}

pub fn build_month_grid(cursor: CalendarCursor, store: &EventStore) -> MonthGrid {
    let padding = cursor.first_weekday() as usize;
    let days = cursor.days_in_month();

    let mut cells = Vec::with_capacity(padding + days as usize);
    cells.extend(std::iter::repeat_n(DayCell::Empty, padding));

    for day in 1..=days {
        // day is always within the month here
        let Ok(key) = DateKey::from_ymd(cursor.year(), cursor.month(), day) else {
            continue;
        };
        cells.push(DayCell::Day {
            key,
            day,
            events: store.events_on(&key).to_vec(),
        });
    }

    MonthGrid { cursor, cells }
}
