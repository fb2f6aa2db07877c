//! User records and best-score persistence
//!
//! The game core only sees [`ScoreGateway`]. [`UserStore`] implements it on
//! top of a single JSON document that is read whole and overwritten whole:
//! a file on native builds, a LocalStorage entry in the browser.

pub mod users;

pub use users::{AccountError, UserRecord, UserStore};

use thiserror::Error;

/// Failures reading or writing the backing store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("user store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("user store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Where the core reads and records best scores
pub trait ScoreGateway {
    /// Best score on record, 0 when the user has none
    fn get_best_score(&self, user: &str) -> u32;

    /// Record `score` if it beats the stored best. Returns whether the
    /// stored value changed.
    fn update_best_score(&mut self, user: &str, score: u32) -> Result<bool, StoreError>;
}
