//! Offline demo account store.
//!
//! The demo build of the dashboard runs without a server; accounts and the
//! current-session marker live in JSON documents under the data directory,
//! the same shape the browser build keeps in local storage. Passwords here
//! are stored and compared in plaintext: this is the documented lower-trust
//! demo path, not a substitute for the server-mode hasher, and nothing in
//! it expires until sign-out or the files are deleted.
//!
//! Access is synchronous; the demo front end is a single event loop.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::api::validation::normalize_email;

const USERS_FILE: &str = "local_users.json";
const SESSION_FILE: &str = "local_session.json";

pub const DEMO_NAME: &str = "Demo Brand Manager";
pub const DEMO_EMAIL: &str = "demo@brand.com";
pub const DEMO_PASSWORD: &str = "demo123";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalAccount {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// "Who is signed in on this device"; deliberately thinner than the
/// account record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LocalAuthError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("An account with this email already exists.")]
    EmailTaken,
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("Local storage error: {0}")]
    Storage(#[from] io::Error),
}

pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A missing or unreadable document is the fallback value, exactly as a
    /// cleared browser store would be.
    fn load_json<T: DeserializeOwned>(&self, file: &str, fallback: T) -> T {
        match fs::read_to_string(self.dir.join(file)) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or(fallback),
            Err(_) => fallback,
        }
    }

    fn save_json<T: Serialize>(&self, file: &str, value: &T) -> io::Result<()> {
        let raw = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        fs::write(self.dir.join(file), raw)
    }

    pub fn accounts(&self) -> Vec<LocalAccount> {
        self.load_json(USERS_FILE, Vec::new())
    }

    fn save_accounts(&self, accounts: &[LocalAccount]) -> io::Result<()> {
        self.save_json(USERS_FILE, &accounts)
    }

    pub fn find_by_email(&self, email: &str) -> Option<LocalAccount> {
        let wanted = normalize_email(email);
        self.accounts()
            .into_iter()
            .find(|account| normalize_email(&account.email) == wanted)
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.load_json(SESSION_FILE, None)
    }

    fn set_current_user(&self, account: &LocalAccount) -> io::Result<()> {
        self.save_json(
            SESSION_FILE,
            &CurrentUser {
                full_name: account.full_name.clone(),
                email: account.email.clone(),
            },
        )
    }

    /// Create the demo account when the store is empty; a no-op once any
    /// account exists.
    pub fn seed_demo_account(&self) -> Result<(), LocalAuthError> {
        let mut accounts = self.accounts();
        if accounts.is_empty() {
            accounts.push(LocalAccount {
                full_name: DEMO_NAME.to_string(),
                email: DEMO_EMAIL.to_string(),
                password: DEMO_PASSWORD.to_string(),
            });
            self.save_accounts(&accounts)?;
        }
        Ok(())
    }

    pub fn sign_up(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<CurrentUser, LocalAuthError> {
        let full_name = full_name.trim();
        let email = email.trim();
        if full_name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(LocalAuthError::MissingFields);
        }
        if self.find_by_email(email).is_some() {
            return Err(LocalAuthError::EmailTaken);
        }

        let account = LocalAccount {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let mut accounts = self.accounts();
        accounts.push(account.clone());
        self.save_accounts(&accounts)?;
        self.set_current_user(&account)?;

        Ok(CurrentUser {
            full_name: account.full_name,
            email: account.email,
        })
    }

    /// Plaintext comparison; unknown email and wrong password are the same
    /// failure.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<CurrentUser, LocalAuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(LocalAuthError::MissingFields);
        }

        let account = match self.find_by_email(email) {
            Some(account) if account.password == password => account,
            _ => return Err(LocalAuthError::InvalidCredentials),
        };

        self.set_current_user(&account)?;
        Ok(CurrentUser {
            full_name: account.full_name,
            email: account.email,
        })
    }

    pub fn sign_out(&self) -> Result<(), LocalAuthError> {
        match fs::remove_file(self.dir.join(SESSION_FILE)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_seed_creates_exactly_one_demo_account() {
        let (_dir, store) = store();
        assert!(store.accounts().is_empty());

        store.seed_demo_account().unwrap();
        let accounts = store.accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].email, DEMO_EMAIL);

        // Second seed is a no-op
        store.seed_demo_account().unwrap();
        assert_eq!(store.accounts().len(), 1);
    }

    #[test]
    fn test_seed_noop_when_accounts_exist() {
        let (_dir, store) = store();
        store.sign_up("Jordan Ray", "jordan@example.com", "pw").unwrap();

        store.seed_demo_account().unwrap();
        let accounts = store.accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].email, "jordan@example.com");
    }

    #[test]
    fn test_demo_sign_in_and_out() {
        let (_dir, store) = store();
        store.seed_demo_account().unwrap();

        let user = store.sign_in(DEMO_EMAIL, DEMO_PASSWORD).unwrap();
        assert_eq!(user.full_name, DEMO_NAME);
        assert_eq!(store.current_user(), Some(user));

        store.sign_out().unwrap();
        assert_eq!(store.current_user(), None);

        // Signing out twice is fine
        store.sign_out().unwrap();
    }

    #[test]
    fn test_sign_in_failures_are_uniform() {
        let (_dir, store) = store();
        store.seed_demo_account().unwrap();

        let wrong_pw = store.sign_in(DEMO_EMAIL, "nope").unwrap_err();
        let no_user = store.sign_in("ghost@example.com", "demo123").unwrap_err();
        assert_eq!(wrong_pw.to_string(), no_user.to_string());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_sign_up_sets_session_and_rejects_duplicates() {
        let (_dir, store) = store();

        let user = store
            .sign_up("Jordan Ray", "Jordan@Example.com", "secret")
            .unwrap();
        assert_eq!(store.current_user(), Some(user));

        // Duplicate modulo normalization
        let err = store
            .sign_up("Other", "  jordan@example.com ", "secret2")
            .unwrap_err();
        assert!(matches!(err, LocalAuthError::EmailTaken));

        let err = store.sign_up("", "x@example.com", "pw").unwrap_err();
        assert!(matches!(err, LocalAuthError::MissingFields));
    }

    #[test]
    fn test_plaintext_storage_is_intentional() {
        // The demo store holds the password verbatim; this documents the
        // lower-trust mode rather than accidentally relying on it.
        let (_dir, store) = store();
        store.seed_demo_account().unwrap();
        assert_eq!(store.accounts()[0].password, DEMO_PASSWORD);
    }

    #[test]
    fn test_corrupt_files_read_as_empty() {
        let (dir, store) = store();
        fs::write(dir.path().join(USERS_FILE), "{ not json").unwrap();
        fs::write(dir.path().join(SESSION_FILE), "[]").unwrap();

        assert!(store.accounts().is_empty());
        assert!(store.current_user().is_none());
    }
}
