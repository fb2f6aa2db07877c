//! JSON user store: `{ "<username>": { "password": ..., "max_score": n } }`

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ScoreGateway, StoreError};

/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 4;

/// bcrypt work factor (the minimum under test)
const HASH_COST: u32 = if cfg!(test) { 4 } else { bcrypt::DEFAULT_COST };

/// One user's stored record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// bcrypt hash of the password (salt included)
    pub password: String,
    /// Best score ever reached
    #[serde(default)]
    pub max_score: u32,
}

/// Signup/login failures
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username already exists")]
    UsernameTaken,
    #[error("password must be at least 4 characters long")]
    PasswordTooShort,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq)]
enum Backing {
    Memory,
    File(PathBuf),
    LocalStorage(String),
}

/// All user records plus where they live
#[derive(Debug, Clone)]
pub struct UserStore {
    users: BTreeMap<String, UserRecord>,
    backing: Backing,
}

impl UserStore {
    /// LocalStorage key (used only in wasm32)
    pub const STORAGE_KEY: &'static str = "speedy_sums_users";

    /// Store that is never persisted
    pub fn in_memory() -> Self {
        Self {
            users: BTreeMap::new(),
            backing: Backing::Memory,
        }
    }

    /// Open a file-backed store. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self {
            users: BTreeMap::new(),
            backing: Backing::File(path.into()),
        };
        store.reload()?;
        Ok(store)
    }

    /// Open the browser store kept in LocalStorage
    pub fn open_local_storage() -> Result<Self, StoreError> {
        let mut store = Self {
            users: BTreeMap::new(),
            backing: Backing::LocalStorage(Self::STORAGE_KEY.to_string()),
        };
        store.reload()?;
        Ok(store)
    }

    /// Open a file-backed store, starting empty if it can't be read
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Could not read {}: {}, starting with no users", path.display(), e);
                Self {
                    users: BTreeMap::new(),
                    backing: Backing::File(path),
                }
            }
        }
    }

    /// Re-read the backing document, replacing everything in memory
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.users = match self.read_raw()? {
            Some(json) if !json.trim().is_empty() => serde_json::from_str(&json)?,
            _ => BTreeMap::new(),
        };
        log::info!("Loaded {} user records", self.users.len());
        Ok(())
    }

    /// Overwrite the backing document with the current records
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.users)?;
        self.write_raw(&json)?;
        log::info!("User store saved ({} users)", self.users.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    /// Register a new user with a best score of 0 and persist
    pub fn signup(&mut self, username: &str, password: &str) -> Result<(), AccountError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::EmptyUsername);
        }
        self.refresh();
        if self.users.contains_key(username) {
            return Err(AccountError::UsernameTaken);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::PasswordTooShort);
        }

        self.users.insert(
            username.to_string(),
            UserRecord {
                password: bcrypt::hash(password, HASH_COST)?,
                max_score: 0,
            },
        );
        self.save()?;
        log::info!("Signed up {}", username);
        Ok(())
    }

    /// Check credentials against the stored hash
    pub fn login(&self, username: &str, password: &str) -> Result<(), AccountError> {
        let username = username.trim();
        let Some(record) = self.users.get(username) else {
            return Err(AccountError::InvalidCredentials);
        };
        match bcrypt::verify(password, &record.password) {
            Ok(true) => {
                log::info!("{} logged in", username);
                Ok(())
            }
            Ok(false) => Err(AccountError::InvalidCredentials),
            Err(e) => {
                log::warn!("Unreadable password hash for {}: {}", username, e);
                Err(AccountError::InvalidCredentials)
            }
        }
    }

    /// Pick up writes made since we loaded; keep what we have if that fails
    fn refresh(&mut self) {
        if self.backing != Backing::Memory {
            if let Err(e) = self.reload() {
                log::warn!("Keeping in-memory user records: {}", e);
            }
        }
    }

    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        match &self.backing {
            Backing::Memory => Ok(None),
            Backing::File(path) => match std::fs::read_to_string(path) {
                Ok(json) => Ok(Some(json)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
            Backing::LocalStorage(key) => local_storage::get(key),
        }
    }

    fn write_raw(&self, json: &str) -> Result<(), StoreError> {
        match &self.backing {
            Backing::Memory => Ok(()),
            Backing::File(path) => Ok(std::fs::write(path, json)?),
            Backing::LocalStorage(key) => local_storage::set(key, json),
        }
    }
}

impl ScoreGateway for UserStore {
    fn get_best_score(&self, user: &str) -> u32 {
        self.users.get(user).map(|r| r.max_score).unwrap_or(0)
    }

    fn update_best_score(&mut self, user: &str, score: u32) -> Result<bool, StoreError> {
        self.refresh();
        let Some(record) = self.users.get_mut(user) else {
            log::warn!("No record for {}, score {} not saved", user, score);
            return Ok(false);
        };
        if score <= record.max_score {
            return Ok(false);
        }
        record.max_score = score;
        self.save()?;
        log::info!("New best score for {}: {}", user, score);
        Ok(true)
    }
}

#[cfg(target_arch = "wasm32")]
mod local_storage {
    use super::StoreError;

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage".to_string()))
    }

    pub fn get(key: &str) -> Result<Option<String>, StoreError> {
        storage()?
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    pub fn set(key: &str, value: &str) -> Result<(), StoreError> {
        storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
mod local_storage {
    use super::StoreError;

    pub fn get(_key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("LocalStorage".to_string()))
    }

    pub fn set(_key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("LocalStorage".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "speedy_sums_{}_{}.json",
            name,
            std::process::id()
        ))
    }

    fn store_with_user(score: u32) -> UserStore {
        let mut store = UserStore::in_memory();
        store.signup("ada", "secret").unwrap();
        if score > 0 {
            store.update_best_score("ada", score).unwrap();
        }
        store
    }

    #[test]
    fn test_signup_rules() {
        let mut store = UserStore::in_memory();
        assert!(matches!(store.signup("", "secret"), Err(AccountError::EmptyUsername)));
        assert!(matches!(store.signup("ada", "abc"), Err(AccountError::PasswordTooShort)));
        store.signup("ada", "abcd").unwrap();
        assert!(matches!(store.signup("ada", "other-pass"), Err(AccountError::UsernameTaken)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_best_score("ada"), 0);
    }

    #[test]
    fn test_login() {
        let store = store_with_user(0);
        assert!(store.login("ada", "secret").is_ok());
        assert!(matches!(store.login("ada", "wrong"), Err(AccountError::InvalidCredentials)));
        assert!(matches!(store.login("bob", "secret"), Err(AccountError::InvalidCredentials)));
    }

    #[test]
    fn test_password_is_salted_hash() {
        let mut store = store_with_user(0);
        store.signup("bob", "secret").unwrap();

        let ada = &store.get("ada").unwrap().password;
        let bob = &store.get("bob").unwrap().password;
        assert_ne!(ada, "secret");
        assert!(bcrypt::verify("secret", ada).unwrap());
        assert!(!bcrypt::verify("wrong", ada).unwrap());
        // Same password, different salt
        assert_ne!(ada, bob);
    }

    #[test]
    fn test_login_rejects_malformed_hash() {
        let path = temp_path("malformed_hash");
        std::fs::write(&path, r#"{ "ada": { "password": "x", "max_score": 3 } }"#).unwrap();
        let store = UserStore::open(&path).unwrap();
        assert!(matches!(store.login("ada", "x"), Err(AccountError::InvalidCredentials)));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_best_score_rules() {
        let mut store = store_with_user(5);
        assert_eq!(store.get_best_score("ada"), 5);

        // Same score twice: unchanged
        assert!(!store.update_best_score("ada", 5).unwrap());
        assert_eq!(store.get_best_score("ada"), 5);

        // Lower: unchanged
        assert!(!store.update_best_score("ada", 2).unwrap());
        assert_eq!(store.get_best_score("ada"), 5);

        // Higher: exactly the new value
        assert!(store.update_best_score("ada", 9).unwrap());
        assert_eq!(store.get_best_score("ada"), 9);
    }

    #[test]
    fn test_unknown_user() {
        let mut store = UserStore::in_memory();
        assert_eq!(store.get_best_score("ghost"), 0);
        assert!(!store.update_best_score("ghost", 10).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let path = temp_path("round_trip");
        let _ = std::fs::remove_file(&path);

        let mut store = UserStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.signup("ada", "secret").unwrap();
        store.update_best_score("ada", 12).unwrap();

        let reopened = UserStore::open(&path).unwrap();
        assert_eq!(reopened.get_best_score("ada"), 12);
        assert!(reopened.login("ada", "secret").is_ok());

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["ada"]["max_score"], 12);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_update_sees_other_writers() {
        let path = temp_path("other_writer");
        let _ = std::fs::remove_file(&path);

        let mut first = UserStore::open(&path).unwrap();
        first.signup("ada", "secret").unwrap();
        let mut second = UserStore::open(&path).unwrap();
        second.update_best_score("ada", 20).unwrap();

        // `first` reloads before comparing, so 15 does not clobber 20
        assert!(!first.update_best_score("ada", 15).unwrap());
        assert_eq!(UserStore::open(&path).unwrap().get_best_score("ada"), 20);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(UserStore::open(&path), Err(StoreError::Json(_))));
        let store = UserStore::open_or_empty(&path);
        assert!(store.is_empty());
        assert_eq!(store.get_best_score("ada"), 0);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_reads_records_without_score() {
        let path = temp_path("legacy");
        std::fs::write(&path, r#"{ "ada": { "password": "x" } }"#).unwrap();
        let store = UserStore::open(&path).unwrap();
        assert_eq!(store.get("ada").unwrap().max_score, 0);
        std::fs::remove_file(&path).unwrap();
    }
}
