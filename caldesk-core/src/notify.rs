//! Notification collaborator.

use std::sync::{Arc, Mutex};

use crate::error::CalDeskResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// Not asked yet.
    Default,
}

pub trait Notifier {
    fn permission(&self) -> Permission;
    fn request_permission(&mut self) -> Permission;
    fn show(&mut self, title: &str, body: &str) -> CalDeskResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Keeps every shown notification in memory. Clones share the same log, so a
/// test can hand one clone to a session and inspect the other.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    permission: Permission,
    grant_on_request: bool,
    shown: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn granted() -> Self {
        RecordingNotifier {
            permission: Permission::Granted,
            grant_on_request: true,
            shown: Arc::default(),
        }
    }

    pub fn denied() -> Self {
        RecordingNotifier {
            permission: Permission::Default,
            grant_on_request: false,
            shown: Arc::default(),
        }
    }

    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        if self.permission == Permission::Default {
            self.permission = if self.grant_on_request {
                Permission::Granted
            } else {
                Permission::Denied
            };
        }
        self.permission
    }

    fn show(&mut self, title: &str, body: &str) -> CalDeskResult<()> {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(Notification {
                title: title.to_string(),
                body: body.to_string(),
            });
        }
        Ok(())
    }
}
