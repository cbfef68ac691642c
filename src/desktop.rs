use caldesk_core::notify::{Notifier, Permission};
use caldesk_core::{CalDeskError, CalDeskResult};

/// Reminders as desktop notifications. The desktop has no permission
/// prompt, so this always reports `Granted`.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn show(&mut self, title: &str, body: &str) -> CalDeskResult<()> {
        notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .appname("caldesk")
            .show()
            .map(|_| ())
            .map_err(|e| CalDeskError::Storage(format!("Could not show notification: {e}")))
    }
}
