//! Application state: who is signed in, their events, the displayed month
//! and the editor.
//!
//! All mutation goes through `&mut Session`, one operation at a time. Every
//! store mutation is flushed to storage before the call returns, but only
//! while a user is signed in.

use chrono::NaiveDateTime;

use crate::cursor::CalendarCursor;
use crate::date_key::DateKey;
use crate::error::{CalDeskError, CalDeskResult};
use crate::grid::{MonthGrid, build_month_grid};
use crate::identity::User;
use crate::modal::{Draft, ModalController};
use crate::notify::{Notifier, Permission};
use crate::reminder::ReminderScanner;
use crate::storage::KeyValueStore;
use crate::store::EventStore;

pub struct Session {
    user: Option<User>,
    store: EventStore,
    cursor: CalendarCursor,
    modal: ModalController,
    scanner: ReminderScanner,
    storage: Box<dyn KeyValueStore>,
    notifier: Box<dyn Notifier>,
}

impl Session {
    /// Start signed out on `cursor`. Asks for notification permission if it
    /// has not been granted yet.
    pub fn new(
        storage: Box<dyn KeyValueStore>,
        mut notifier: Box<dyn Notifier>,
        scanner: ReminderScanner,
        cursor: CalendarCursor,
    ) -> Self {
        if notifier.permission() != Permission::Granted {
            let permission = notifier.request_permission();
            tracing::debug!(?permission, "notification permission requested");
        }

        Session {
            user: None,
            store: EventStore::new(),
            cursor,
            modal: ModalController::new(),
            scanner,
            storage,
            notifier,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn cursor(&self) -> CalendarCursor {
        self.cursor
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    /// Replace the store with `user`'s persisted events, or drop it on
    /// sign-out. Unreadable stored data is replaced by an empty store.
    pub fn on_auth_changed(&mut self, user: Option<User>) -> CalDeskResult<()> {
        self.modal.cancel();

        match user {
            Some(user) => {
                self.store = load_store(self.storage.as_ref(), &user.uid)?;
                tracing::info!(uid = %user.uid, events = self.store.len(), "loaded events");
                self.user = Some(user);
            }
            None => {
                self.store = EventStore::new();
                self.user = None;
            }
        }
        Ok(())
    }

    fn persist(&mut self) -> CalDeskResult<()> {
        let Some(user) = &self.user else {
            return Ok(());
        };
        let text = self.store.serialize()?;
        self.storage.set(&EventStore::scope_key(&user.uid), &text)?;
        tracing::debug!(uid = %user.uid, bytes = text.len(), "saved events");
        Ok(())
    }

    /// Persist, or put the store and editor back to `store`/`modal` if the
    /// write fails so memory never runs ahead of storage.
    fn persist_or_restore(
        &mut self,
        store: EventStore,
        modal: ModalController,
    ) -> CalDeskResult<()> {
        if let Err(e) = self.persist() {
            tracing::warn!("could not save events, changes reverted: {e}");
            self.store = store;
            self.modal = modal;
            return Err(e);
        }
        Ok(())
    }

    // NAVIGATION:

    pub fn show(&mut self, cursor: CalendarCursor) {
        self.cursor = cursor;
    }

    pub fn prev_month(&mut self) {
        self.cursor = self.cursor.prev();
    }

    pub fn next_month(&mut self) {
        self.cursor = self.cursor.next();
    }

    pub fn render(&self) -> MonthGrid {
        build_month_grid(self.cursor, &self.store)
    }

    // EDITOR:

    pub fn open_day(&mut self, key: DateKey) -> Draft {
        self.modal.open(key, &self.store)
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.modal.draft_mut()
    }

    pub fn save(&mut self) -> CalDeskResult<DateKey> {
        let (store, modal) = (self.store.clone(), self.modal.clone());
        let key = self.modal.save(&mut self.store)?;
        self.persist_or_restore(store, modal)?;
        Ok(key)
    }

    pub fn delete(&mut self) -> CalDeskResult<DateKey> {
        let (store, modal) = (self.store.clone(), self.modal.clone());
        let key = self.modal.delete(&mut self.store)?;
        self.persist_or_restore(store, modal)?;
        Ok(key)
    }

    pub fn cancel(&mut self) {
        self.modal.cancel();
    }

    // REMINDERS:

    /// One reminder scan at `now`; persists if anything fired. If that
    /// write fails the `notified` flags are reverted with the rest of the store.
    pub fn tick(&mut self, now: NaiveDateTime) -> CalDeskResult<usize> {
        let store = self.store.clone();
        let fired = self
            .scanner
            .scan(&mut self.store, now, self.notifier.as_mut());
        if fired > 0 {
            let modal = self.modal.clone();
            self.persist_or_restore(store, modal)?;
        }
        Ok(fired)
    }
}

fn load_store(storage: &dyn KeyValueStore, uid: &str) -> CalDeskResult<EventStore> {
    let loaded = storage
        .get(&EventStore::scope_key(uid))
        .and_then(|text| text.map(|t| EventStore::deserialize(&t)).transpose());

    match loaded {
        Ok(store) => Ok(store.unwrap_or_default()),
        Err(CalDeskError::Parse(e)) => {
            tracing::warn!(uid, "stored events are unreadable, starting empty: {e}");
            Ok(EventStore::new())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::storage::{FileStorage, MemoryStorage};

    fn user(uid: &str) -> User {
        User {
            uid: uid.to_string(),
            email: format!("{uid}@example.com"),
        }
    }

    fn session_with(storage: MemoryStorage, notifier: RecordingNotifier) -> Session {
        Session::new(
            Box::new(storage),
            Box::new(notifier),
            ReminderScanner::default(),
            CalendarCursor::new(2024, 2),
        )
    }

    fn add(session: &mut Session, day: &str, title: &str, time: &str) -> CalDeskResult<DateKey> {
        session.open_day(day.parse().unwrap());
        let draft = session.draft_mut().unwrap();
        draft.title = title.to_string();
        draft.time = time.to_string();
        session.save()
    }

    #[test]
    fn test_new_session_requests_permission() {
        let notifier = RecordingNotifier::denied();
        let session = session_with(MemoryStorage::new(), notifier.clone());
        assert!(session.user().is_none());
        assert_eq!(session.notifier.permission(), Permission::Denied);
    }

    #[test]
    fn test_saved_event_shows_in_rendered_month() {
        let mut session = session_with(MemoryStorage::new(), RecordingNotifier::granted());
        session.on_auth_changed(Some(user("u1"))).unwrap();
        add(&mut session, "2024-03-15", "Standup", "09:00").unwrap();

        let grid = session.render();
        let cell = grid.cell(&"2024-03-15".parse().unwrap()).unwrap();
        assert_eq!(cell.summary(), vec!["09:00 - Standup".to_string()]);
    }

    #[test]
    fn test_save_persists_under_user_key() {
        let mut session = session_with(MemoryStorage::new(), RecordingNotifier::granted());
        session.on_auth_changed(Some(user("u1"))).unwrap();
        add(&mut session, "2024-03-15", "Standup", "09:00").unwrap();

        let stored = session.storage.get("calendarEvents-u1").unwrap().unwrap();
        assert_eq!(EventStore::deserialize(&stored).unwrap(), *session.store());
    }

    #[test]
    fn test_anonymous_changes_are_not_persisted() {
        let mut session = session_with(MemoryStorage::new(), RecordingNotifier::granted());
        add(&mut session, "2024-03-15", "Standup", "09:00").unwrap();

        assert_eq!(session.store().len(), 1);
        assert_eq!(session.storage.get("calendarEvents-").unwrap(), None);
    }

    #[test]
    fn test_empty_title_leaves_state_unchanged() {
        let mut session = session_with(MemoryStorage::new(), RecordingNotifier::granted());
        session.on_auth_changed(Some(user("u1"))).unwrap();

        let err = add(&mut session, "2024-03-15", "", "09:00").unwrap_err();
        assert!(matches!(err, CalDeskError::Validation(_)));
        assert!(session.modal().is_open());
        assert!(session.store().is_empty());
        assert_eq!(session.storage.get("calendarEvents-u1").unwrap(), None);
    }

    #[test]
    fn test_corrupt_store_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage.set("calendarEvents-u1", "{not json").unwrap();
        let mut session = session_with(storage, RecordingNotifier::granted());

        session.on_auth_changed(Some(user("u1"))).unwrap();
        assert!(session.store().is_empty());
        assert_eq!(session.user(), Some(&user("u1")));
    }

    #[test]
    fn test_unreadable_bytes_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("calendarEvents-u1.json"), [0xff, 0xfe, 0x7b]).unwrap();
        let mut session = Session::new(
            Box::new(FileStorage::new(dir.path())),
            Box::new(RecordingNotifier::granted()),
            ReminderScanner::default(),
            CalendarCursor::new(2024, 2),
        );

        session.on_auth_changed(Some(user("u1"))).unwrap();
        assert!(session.store().is_empty());
        assert_eq!(session.user(), Some(&user("u1")));
    }

    /// Reads work, every write fails.
    struct ReadOnlyStorage(MemoryStorage);

    impl KeyValueStore for ReadOnlyStorage {
        fn get(&self, key: &str) -> CalDeskResult<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> CalDeskResult<()> {
            Err(CalDeskError::Storage("disk full".into()))
        }

        fn remove(&mut self, _key: &str) -> CalDeskResult<()> {
            Err(CalDeskError::Storage("disk full".into()))
        }
    }

    fn read_only_session(stored: &EventStore, notifier: RecordingNotifier) -> Session {
        let mut inner = MemoryStorage::new();
        inner
            .set("calendarEvents-u1", &stored.serialize().unwrap())
            .unwrap();
        let mut session = Session::new(
            Box::new(ReadOnlyStorage(inner)),
            Box::new(notifier),
            ReminderScanner::default(),
            CalendarCursor::new(2024, 2),
        );
        session.on_auth_changed(Some(user("u1"))).unwrap();
        session
    }

    #[test]
    fn test_failed_save_reverts_store_and_keeps_editor_open() {
        let mut session = read_only_session(&EventStore::new(), RecordingNotifier::granted());

        let err = add(&mut session, "2024-03-15", "Standup", "09:00").unwrap_err();
        assert!(matches!(err, CalDeskError::Storage(_)));
        assert!(session.store().is_empty());
        assert_eq!(session.modal().selected(), Some("2024-03-15".parse().unwrap()));
        let draft = session.modal().draft().unwrap();
        assert_eq!(draft.title, "Standup");
        assert_eq!(draft.time, "09:00");
    }

    #[test]
    fn test_failed_delete_keeps_events() {
        let day: DateKey = "2024-03-15".parse().unwrap();
        let mut stored = EventStore::new();
        stored.upsert(
            day,
            crate::event::EventRecord::new(day, "Standup", "09:00".parse().unwrap(), None)
                .unwrap(),
        );
        let mut session = read_only_session(&stored, RecordingNotifier::granted());

        session.open_day(day);
        assert!(session.delete().is_err());
        assert_eq!(*session.store(), stored);
        assert!(session.modal().is_open());
    }

    #[test]
    fn test_failed_tick_write_reverts_notified_flags() {
        let day: DateKey = "2024-03-15".parse().unwrap();
        let mut stored = EventStore::new();
        stored.upsert(
            day,
            crate::event::EventRecord::new(day, "Standup", "09:00".parse().unwrap(), None)
                .unwrap(),
        );
        let mut session = read_only_session(&stored, RecordingNotifier::granted());

        let now = NaiveDateTime::parse_from_str("2024-03-15 09:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert!(session.tick(now).is_err());
        assert_eq!(*session.store(), stored);
        assert!(!session.store().events_on(&day)[0].notified);
    }

    #[test]
    fn test_tick_fires_once_and_persists_flag() {
        let notifier = RecordingNotifier::granted();
        let mut session = session_with(MemoryStorage::new(), notifier.clone());
        session.on_auth_changed(Some(user("u1"))).unwrap();
        add(&mut session, "2024-03-15", "Standup", "09:00").unwrap();

        let now = NaiveDateTime::parse_from_str("2024-03-15 09:00:30", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(session.tick(now).unwrap(), 1);
        assert_eq!(session.tick(now).unwrap(), 0);
        assert_eq!(notifier.shown().len(), 1);

        let stored = session.storage.get("calendarEvents-u1").unwrap().unwrap();
        let reloaded = EventStore::deserialize(&stored).unwrap();
        assert!(reloaded.events_on(&"2024-03-15".parse().unwrap())[0].notified);
    }

    #[test]
    fn test_sign_out_discards_store_and_closes_editor() {
        let mut session = session_with(MemoryStorage::new(), RecordingNotifier::granted());
        session.on_auth_changed(Some(user("u1"))).unwrap();
        add(&mut session, "2024-03-15", "Standup", "09:00").unwrap();
        session.open_day("2024-03-16".parse().unwrap());

        session.on_auth_changed(None).unwrap();
        assert!(session.store().is_empty());
        assert!(!session.modal().is_open());
        assert!(session.storage.get("calendarEvents-u1").unwrap().is_some());
    }

    #[test]
    fn test_navigation_wraps_years() {
        let mut session = session_with(MemoryStorage::new(), RecordingNotifier::granted());
        session.show(CalendarCursor::new(2024, 0));
        session.prev_month();
        assert_eq!(session.cursor(), CalendarCursor::new(2023, 11));
        session.next_month();
        session.next_month();
        assert_eq!(session.cursor(), CalendarCursor::new(2024, 1));
    }
}
