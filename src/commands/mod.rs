pub mod add;
pub mod auth;
pub mod delete;
pub mod edit;
pub mod list;
pub mod show;
pub mod watch;

use anyhow::{Context as _, Result};
use caldesk_core::config::CalDeskConfig;
use caldesk_core::identity::{Identity, LocalIdentity, User};
use caldesk_core::reminder::ReminderScanner;
use caldesk_core::session::Session;
use caldesk_core::storage::FileStorage;
use caldesk_core::{CalendarCursor, DateKey};
use tokio::sync::watch as auth_watch;

use crate::desktop::DesktopNotifier;

/// Everything a command needs: config, the identity provider and a session
/// already loaded for whoever is signed in.
pub struct Context {
    pub config: CalDeskConfig,
    pub identity: LocalIdentity,
    pub session: Session,
    auth: auth_watch::Receiver<Option<User>>,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = CalDeskConfig::load()?;
        let data_path = config.data_path();

        let identity = LocalIdentity::open(&data_path)?;
        let mut session = Session::new(
            Box::new(FileStorage::new(&data_path)),
            Box::new(DesktopNotifier),
            ReminderScanner::new(config.notification_title.clone()),
            CalendarCursor::today(),
        );
        let mut auth = identity.subscribe();
        session.on_auth_changed(auth.borrow_and_update().clone())?;

        Ok(Context {
            config,
            identity,
            session,
            auth,
        })
    }

    /// Hand any sign-in or sign-out seen on the identity's subscription to
    /// the session.
    pub fn sync_user(&mut self) -> Result<()> {
        if self.auth.has_changed()? {
            let user = self.auth.borrow_and_update().clone();
            self.session.on_auth_changed(user)?;
        }
        Ok(())
    }

    /// Re-read the identity and the signed-in user's events from disk.
    ///
    /// Sign-ins made by another caldesk process never reach this process's
    /// subscription, so long-running commands poll with this instead.
    pub fn reload(&mut self) -> Result<()> {
        self.identity = LocalIdentity::open(self.config.data_path())?;
        self.auth = self.identity.subscribe();
        let user = self.auth.borrow_and_update().clone();
        self.session.on_auth_changed(user)?;
        Ok(())
    }

    pub fn require_user(&self) -> Result<User> {
        self.session.user().cloned().ok_or_else(|| {
            anyhow::anyhow!(
                "Not signed in.\n\n\
                Sign in with:\n  \
                caldesk login <email>\n\n\
                Or create an account:\n  \
                caldesk signup <email>"
            )
        })
    }
}

pub fn parse_date(input: &str) -> Result<DateKey> {
    input
        .trim()
        .parse()
        .with_context(|| format!("Could not read date \"{}\"", input))
}
