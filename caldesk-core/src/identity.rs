//! Identity collaborator.
//!
//! The session only needs to know who is signed in and to hear about changes;
//! how accounts are verified is up to the implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tokio::sync::watch;
use uuid::Uuid;

use crate::constants::{MIN_PASSWORD_LEN, PBKDF2_ITERATIONS};
use crate::error::{CalDeskError, CalDeskResult};

const ACCOUNTS_FILE: &str = "accounts.json";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
}

pub trait Identity {
    fn sign_in(&mut self, email: &str, password: &str) -> CalDeskResult<User>;
    fn sign_up(&mut self, email: &str, password: &str) -> CalDeskResult<User>;
    fn sign_out(&mut self) -> CalDeskResult<()>;
    fn current_user(&self) -> Option<User>;
    /// Receiver that observes every sign-in and sign-out made through this
    /// provider instance.
    fn subscribe(&self) -> watch::Receiver<Option<User>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    uid: String,
    salt: String,
    hash: String,
    iterations: u32,
}

/// Accounts kept in `accounts.json` and the signed-in user in `session.json`,
/// both inside one directory.
pub struct LocalIdentity {
    dir: PathBuf,
    current: watch::Sender<Option<User>>,
}

impl LocalIdentity {
    pub fn open(dir: impl Into<PathBuf>) -> CalDeskResult<Self> {
        let dir = dir.into();
        let session_path = dir.join(SESSION_FILE);

        let user = if session_path.exists() {
            let content = std::fs::read_to_string(&session_path)?;
            match serde_json::from_str::<User>(&content) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("ignoring unreadable session file: {e}");
                    None
                }
            }
        } else {
            None
        };

        let (current, _) = watch::channel(user);
        Ok(LocalIdentity { dir, current })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_accounts(&self) -> CalDeskResult<BTreeMap<String, Account>> {
        let path = self.dir.join(ACCOUNTS_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| CalDeskError::Parse(format!("{}: {}", path.display(), e)))
    }

    fn save_accounts(&self, accounts: &BTreeMap<String, Account>) -> CalDeskResult<()> {
        let content = serde_json::to_string_pretty(accounts)
            .map_err(|e| CalDeskError::Storage(e.to_string()))?;
        write_atomic(&self.dir, ACCOUNTS_FILE, &content)
    }

    fn set_current(&mut self, user: Option<User>) -> CalDeskResult<()> {
        match &user {
            Some(u) => {
                let content = serde_json::to_string_pretty(u)
                    .map_err(|e| CalDeskError::Storage(e.to_string()))?;
                write_atomic(&self.dir, SESSION_FILE, &content)?;
            }
            None => {
                let path = self.dir.join(SESSION_FILE);
                if path.exists() {
                    std::fs::remove_file(path)?;
                }
            }
        }
        self.current.send_replace(user);
        Ok(())
    }
}

impl Identity for LocalIdentity {
    fn sign_in(&mut self, email: &str, password: &str) -> CalDeskResult<User> {
        let email = normalize_email(email)?;
        let accounts = self.load_accounts()?;

        let account = accounts
            .get(&email)
            .ok_or_else(|| CalDeskError::Auth("No account found for this email".into()))?;

        let salt = B64
            .decode(&account.salt)
            .map_err(|e| CalDeskError::Parse(format!("Corrupt account record: {e}")))?;
        if B64.encode(derive_key(password, &salt, account.iterations.max(1))) != account.hash {
            return Err(CalDeskError::Auth("Wrong password".into()));
        }

        let user = User {
            uid: account.uid.clone(),
            email,
        };
        self.set_current(Some(user.clone()))?;
        tracing::info!(uid = %user.uid, "signed in");
        Ok(user)
    }

    fn sign_up(&mut self, email: &str, password: &str) -> CalDeskResult<User> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CalDeskError::Auth(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut accounts = self.load_accounts()?;
        if accounts.contains_key(&email) {
            return Err(CalDeskError::Auth(
                "The email address is already in use by another account".into(),
            ));
        }

        let salt = Uuid::new_v4().into_bytes();
        let account = Account {
            uid: Uuid::new_v4().simple().to_string(),
            salt: B64.encode(salt),
            hash: B64.encode(derive_key(password, &salt, PBKDF2_ITERATIONS)),
            iterations: PBKDF2_ITERATIONS,
        };
        let user = User {
            uid: account.uid.clone(),
            email: email.clone(),
        };

        accounts.insert(email, account);
        self.save_accounts(&accounts)?;
        self.set_current(Some(user.clone()))?;
        tracing::info!(uid = %user.uid, "account created");
        Ok(user)
    }

    fn sign_out(&mut self) -> CalDeskResult<()> {
        self.set_current(None)?;
        tracing::info!("signed out");
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }
}

fn normalize_email(email: &str) -> CalDeskResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(CalDeskError::Auth("The email address is badly formatted".into())),
    }
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

fn write_atomic(dir: &Path, name: &str, content: &str) -> CalDeskResult<()> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    let temp = dir.join(format!("{}.tmp", name));
    std::fs::write(&temp, content)?;
    std::fs::rename(&temp, &path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_then_sign_in_returns_same_uid() {
        let dir = tempfile::tempdir().unwrap();
        let mut identity = LocalIdentity::open(dir.path()).unwrap();

        let created = identity.sign_up("Alice@Example.com", "hunter22").unwrap();
        assert_eq!(created.email, "alice@example.com");
        identity.sign_out().unwrap();
        assert_eq!(identity.current_user(), None);

        let signed_in = identity.sign_in("alice@example.com", "hunter22").unwrap();
        assert_eq!(signed_in.uid, created.uid);
        assert_eq!(identity.current_user(), Some(signed_in));
    }

    #[test]
    fn test_sign_in_failures_are_auth_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut identity = LocalIdentity::open(dir.path()).unwrap();
        identity.sign_up("bob@example.com", "correct-horse").unwrap();
        identity.sign_out().unwrap();

        for (email, password) in [
            ("bob@example.com", "wrong"),
            ("nobody@example.com", "correct-horse"),
            ("not-an-email", "correct-horse"),
        ] {
            let err = identity.sign_in(email, password).unwrap_err();
            assert!(matches!(err, CalDeskError::Auth(_)), "{email}: {err:?}");
        }
        assert_eq!(identity.current_user(), None);
    }

    #[test]
    fn test_sign_up_rejects_duplicates_and_short_passwords() {
        let dir = tempfile::tempdir().unwrap();
        let mut identity = LocalIdentity::open(dir.path()).unwrap();
        identity.sign_up("carol@example.com", "secret1").unwrap();

        assert!(matches!(
            identity.sign_up("carol@example.com", "secret2"),
            Err(CalDeskError::Auth(_))
        ));
        assert!(matches!(
            identity.sign_up("dave@example.com", "123"),
            Err(CalDeskError::Auth(_))
        ));
    }

    #[test]
    fn test_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let user = {
            let mut identity = LocalIdentity::open(dir.path()).unwrap();
            identity.sign_up("erin@example.com", "password").unwrap()
        };

        let reopened = LocalIdentity::open(dir.path()).unwrap();
        assert_eq!(reopened.current_user(), Some(user));
    }

    #[tokio::test]
    async fn test_subscribe_observes_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut identity = LocalIdentity::open(dir.path()).unwrap();
        let mut rx = identity.subscribe();
        assert_eq!(*rx.borrow(), None);

        let user = identity.sign_up("frank@example.com", "password").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().clone(), Some(user));

        identity.sign_out().unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), None);
    }
}
