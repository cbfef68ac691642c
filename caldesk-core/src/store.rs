//! Per-user mapping of days to their event lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::STORE_KEY_PREFIX;
use crate::date_key::DateKey;
use crate::error::{CalDeskError, CalDeskResult};
use crate::event::EventRecord;

/// Day → events, in the order they were entered (not sorted by time).
///
/// A day with no events is never present as a key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventStore {
    days: BTreeMap<DateKey, Vec<EventRecord>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persistence key for `user_id`'s store.
    pub fn scope_key(user_id: &str) -> String {
        format!("{}{}", STORE_KEY_PREFIX, user_id)
    }

    /// Append `record` to the day's list, creating the list if needed.
    pub fn upsert(&mut self, key: DateKey, record: EventRecord) {
        self.days.entry(key).or_default().push(record);
    }

    /// Remove every event on the day. No-op for a day without events.
    pub fn clear(&mut self, key: &DateKey) {
        self.days.remove(key);
    }

    pub fn events_on(&self, key: &DateKey) -> &[EventRecord] {
        self.days.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn last_on(&self, key: &DateKey) -> Option<&EventRecord> {
        self.days.get(key).and_then(|events| events.last())
    }

    pub fn days(&self) -> impl Iterator<Item = (&DateKey, &[EventRecord])> {
        self.days.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut EventRecord> {
        self.days.values_mut().flat_map(|events| events.iter_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn serialize(&self) -> CalDeskResult<String> {
        serde_json::to_string(self).map_err(|e| CalDeskError::Storage(e.to_string()))
    }

    pub fn deserialize(text: &str) -> CalDeskResult<Self> {
        let mut store: EventStore =
            serde_json::from_str(text).map_err(|e| CalDeskError::Parse(e.to_string()))?;
        // Older data may carry empty lists; keep the no-empty-day invariant.
        store.days.retain(|_, events| !events.is_empty());
        Ok(store)
    }
}
