//! Minute-resolution reminder scan.
//!
//! A record fires when its datetime equals the current minute and it has not
//! fired before. Minutes that pass without a scan are not caught up.

use std::time::Duration;

use chrono::{NaiveDateTime, Timelike};
use tokio::time::{Interval, MissedTickBehavior};

use crate::constants::DEFAULT_NOTIFICATION_TITLE;
use crate::notify::{Notifier, Permission};
use crate::store::EventStore;

#[derive(Debug, Clone)]
pub struct ReminderScanner {
    title: String,
}

impl Default for ReminderScanner {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TITLE)
    }
}

impl ReminderScanner {
    pub fn new(title: impl Into<String>) -> Self {
        ReminderScanner {
            title: title.into(),
        }
    }

    /// Fire every due, un-notified record and mark it notified.
    ///
    /// Returns how many records fired; the caller persists the store when
    /// this is non-zero. Without notification permission the records are
    /// still marked, nothing is shown.
    pub fn scan(
        &self,
        store: &mut EventStore,
        now: NaiveDateTime,
        notifier: &mut dyn Notifier,
    ) -> usize {
        let now = truncate_to_minute(now);
        let granted = notifier.permission() == Permission::Granted;
        let mut fired = 0;

        for record in store.records_mut() {
            if record.notified || record.datetime != now {
                continue;
            }

            if granted {
                if let Err(e) = notifier.show(&self.title, &record.summary()) {
                    tracing::warn!("failed to show reminder for '{}': {e}", record.title);
                }
            }
            record.notified = true;
            fired += 1;
            tracing::info!(title = %record.title, at = %record.datetime, "reminder fired");
        }

        fired
    }
}

pub fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Fixed-period timer for the scan. Late ticks are delayed rather than
/// bunched up.
pub fn scan_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
