//! Core of caldesk: a month-grid calendar with per-day event lists.
//!
//! - `grid` builds the cells for one month from an `EventStore`
//! - `modal` is the per-day editor, `reminder` the minute-resolution scan
//! - `session` ties them to a signed-in user and a `KeyValueStore`
//! - `identity` and `notify` are the collaborator seams

pub mod config;
pub mod constants;
pub mod cursor;
pub mod date_key;
pub mod error;
pub mod event;
pub mod grid;
pub mod identity;
pub mod modal;
pub mod notify;
pub mod reminder;
pub mod session;
pub mod storage;
pub mod store;

pub use cursor::CalendarCursor;
pub use date_key::{DateKey, TimeOfDay};
pub use error::{CalDeskError, CalDeskResult};
pub use event::{EventRecord, Recurrence};
pub use store::EventStore;
