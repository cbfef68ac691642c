//! Per-day event editor.
//!
//! Two states: closed, or open on one day with a draft. Opening pre-fills the
//! draft from the *last* event of that day. Saving always appends a new event;
//! it never edits the one the draft was filled from.

use crate::date_key::{DateKey, TimeOfDay};
use crate::error::{CalDeskError, CalDeskResult};
use crate::event::{EventRecord, Recurrence};
use crate::store::EventStore;

/// Form fields as typed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub time: String,
    pub recurrence: Option<Recurrence>,
}

impl Draft {
    fn from_record(record: &EventRecord) -> Self {
        Draft {
            title: record.title.clone(),
            time: record.time.to_string(),
            recurrence: record.recurrence,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open { key: DateKey, draft: Draft },
}

#[derive(Debug, Clone, Default)]
pub struct ModalController {
    state: ModalState,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    pub fn selected(&self) -> Option<DateKey> {
        match &self.state {
            ModalState::Open { key, .. } => Some(*key),
            ModalState::Closed => None,
        }
    }

    /// Select a day. Reopening on another day replaces the draft.
    pub fn open(&mut self, key: DateKey, store: &EventStore) -> Draft {
        let draft = store.last_on(&key).map(Draft::from_record).unwrap_or_default();
        self.state = ModalState::Open {
            key,
            draft: draft.clone(),
        };
        draft
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            ModalState::Open { draft, .. } => Some(draft),
            ModalState::Closed => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match &mut self.state {
            ModalState::Open { draft, .. } => Some(draft),
            ModalState::Closed => None,
        }
    }

    /// Validate the draft and append it to the selected day.
    ///
    /// On a validation error the store is untouched and the modal stays open.
    pub fn save(&mut self, store: &mut EventStore) -> CalDeskResult<DateKey> {
        let ModalState::Open { key, draft } = &self.state else {
            return Err(CalDeskError::Validation("No day selected".into()));
        };

        if draft.title.trim().is_empty() || draft.time.trim().is_empty() {
            return Err(CalDeskError::Validation(
                "Please fill in both title and time.".into(),
            ));
        }
        let time: TimeOfDay = draft.time.trim().parse().map_err(|_| {
            CalDeskError::Validation(format!("Invalid time '{}'. Expected HH:MM", draft.time))
        })?;

        let key = *key;
        let record = EventRecord::new(key, draft.title.trim(), time, draft.recurrence)?;
        store.upsert(key, record);
        self.state = ModalState::Closed;
        Ok(key)
    }

    /// Remove every event on the selected day and close.
    pub fn delete(&mut self, store: &mut EventStore) -> CalDeskResult<DateKey> {
        let ModalState::Open { key, .. } = &self.state else {
            return Err(CalDeskError::Validation("No day selected".into()));
        };
        let key = *key;
        store.clear(&key);
        self.state = ModalState::Closed;
        Ok(key)
    }

    pub fn cancel(&mut self) {
        self.state = ModalState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn fill(modal: &mut ModalController, title: &str, time: &str) {
        let draft = modal.draft_mut().unwrap();
        draft.title = title.to_string();
        draft.time = time.to_string();
    }

    #[test]
    fn test_open_empty_day_has_blank_draft() {
        let mut modal = ModalController::new();
        let draft = modal.open(key("2024-03-15"), &EventStore::new());
        assert_eq!(draft, Draft::default());
        assert_eq!(modal.selected(), Some(key("2024-03-15")));
    }

    #[test]
    fn test_open_prefills_from_last_record() {
        let mut store = EventStore::new();
        let day = key("2024-03-15");
        store.upsert(day, EventRecord::new(day, "First", "08:00".parse().unwrap(), None).unwrap());
        store.upsert(
            day,
            EventRecord::new(day, "Second", "13:30".parse().unwrap(), Some(Recurrence::Daily))
                .unwrap(),
        );

        let mut modal = ModalController::new();
        let draft = modal.open(day, &store);
        assert_eq!(draft.title, "Second");
        assert_eq!(draft.time, "13:30");
        assert_eq!(draft.recurrence, Some(Recurrence::Daily));
    }

    #[test]
    fn test_save_appends_and_closes() {
        let mut store = EventStore::new();
        let mut modal = ModalController::new();
        modal.open(key("2024-03-15"), &store);
        fill(&mut modal, "Standup", "09:00");

        assert_eq!(modal.save(&mut store).unwrap(), key("2024-03-15"));
        assert!(!modal.is_open());
        assert_eq!(store.events_on(&key("2024-03-15"))[0].summary(), "09:00 - Standup");
    }

    #[test]
    fn test_save_with_empty_title_keeps_modal_open() {
        let mut store = EventStore::new();
        let mut modal = ModalController::new();
        modal.open(key("2024-03-15"), &store);
        fill(&mut modal, "", "09:00");

        let err = modal.save(&mut store).unwrap_err();
        assert!(matches!(err, CalDeskError::Validation(_)));
        assert!(modal.is_open());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_with_empty_or_bad_time_is_validation_error() {
        let mut store = EventStore::new();
        let mut modal = ModalController::new();
        modal.open(key("2024-03-15"), &store);

        for time in ["", "9am", "25:00"] {
            fill(&mut modal, "Standup", time);
            assert!(matches!(modal.save(&mut store), Err(CalDeskError::Validation(_))));
            assert!(modal.is_open());
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_reopen_and_save_accumulates_entries() {
        let mut store = EventStore::new();
        let mut modal = ModalController::new();
        let day = key("2024-03-15");

        modal.open(day, &store);
        fill(&mut modal, "Standup", "09:00");
        modal.save(&mut store).unwrap();

        // prefilled from the first save, saved unchanged
        modal.open(day, &store);
        modal.save(&mut store).unwrap();

        let events = store.events_on(&day);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], events[1]);
    }

    #[test]
    fn test_delete_clears_day_and_closes() {
        let mut store = EventStore::new();
        let day = key("2024-03-15");
        store.upsert(day, EventRecord::new(day, "Standup", "09:00".parse().unwrap(), None).unwrap());

        let mut modal = ModalController::new();
        modal.open(day, &store);
        modal.delete(&mut store).unwrap();

        assert!(!modal.is_open());
        assert!(store.is_empty());
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut store = EventStore::new();
        let mut modal = ModalController::new();
        modal.open(key("2024-03-15"), &store);
        fill(&mut modal, "Standup", "09:00");
        modal.cancel();

        assert!(!modal.is_open());
        assert!(modal.save(&mut store).is_err());
        assert!(store.is_empty());
    }
}
