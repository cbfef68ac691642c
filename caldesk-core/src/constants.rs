/// Prefix of the per-user persistence key; the user id is appended.
pub const STORE_KEY_PREFIX: &str = "calendarEvents-";

/// Default period of the reminder scan.
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 60;

pub const DEFAULT_NOTIFICATION_TITLE: &str = "🔔 Event Reminder";

/// Minimum password length accepted by local sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

pub const PBKDF2_ITERATIONS: u32 = 100_000;
