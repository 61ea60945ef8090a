//! Poll store - persistent storage engine
//!
//! All domain entities live in one in-memory [`StoreData`] guarded by a
//! single `RwLock`, persisted to a JSON file with an atomic
//! write-then-rename. Uniqueness constraints (unique username/email, one
//! vote per user per poll, one like per user per poll) are enforced here
//! and surfaced as [`StoreError::Conflict`].

mod analytics;
mod audit;
mod likes;
mod polls;
mod users;
mod votes;

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AdminAction, Like, Poll, PollOption, User, Vote};
use crate::utils::atomic::atomic_write;

pub use likes::LikeOutcome;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity lookup failed; the string names what was missing
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint was violated
    #[error("{0}")]
    Conflict(String),

    /// The acting user is not allowed to perform the operation
    #[error("{0}")]
    Forbidden(String),

    /// Login with a bad username or password
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Malformed or semantically invalid input
    #[error("{0}")]
    Invalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),
}

/// Monotonic per-entity id counters
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct IdCounters {
    #[serde(default)]
    users: i64,
    #[serde(default)]
    polls: i64,
    #[serde(default)]
    options: i64,
    #[serde(default)]
    votes: i64,
    #[serde(default)]
    likes: i64,
    #[serde(default)]
    admin_actions: i64,
}

impl IdCounters {
    pub(crate) fn next_user(&mut self) -> i64 {
        self.users += 1;
        self.users
    }

    pub(crate) fn next_poll(&mut self) -> i64 {
        self.polls += 1;
        self.polls
    }

    pub(crate) fn next_option(&mut self) -> i64 {
        self.options += 1;
        self.options
    }

    pub(crate) fn next_vote(&mut self) -> i64 {
        self.votes += 1;
        self.votes
    }

    pub(crate) fn next_like(&mut self) -> i64 {
        self.likes += 1;
        self.likes
    }

    pub(crate) fn next_admin_action(&mut self) -> i64 {
        self.admin_actions += 1;
        self.admin_actions
    }
}

/// The full persisted dataset
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct StoreData {
    #[serde(default)]
    pub(crate) users: Vec<User>,
    #[serde(default)]
    pub(crate) polls: Vec<Poll>,
    #[serde(default)]
    pub(crate) options: Vec<PollOption>,
    #[serde(default)]
    pub(crate) votes: Vec<Vote>,
    #[serde(default)]
    pub(crate) likes: Vec<Like>,
    #[serde(default)]
    pub(crate) admin_actions: Vec<AdminAction>,
    #[serde(default)]
    pub(crate) counters: IdCounters,
}

/// Poll store with in-memory cache for thread-safe operations
pub struct PollStore {
    pub(crate) data: RwLock<StoreData>,
    file_path: Option<PathBuf>,
}

impl PollStore {
    /// Create an in-memory store with no file backing (used in tests and
    /// when no data path is configured)
    pub fn in_memory() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            file_path: None,
        }
    }

    /// Open a store backed by the given file, loading existing data if the
    /// file exists
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let data = Self::load_from_file(&path)?;
        Ok(Self {
            data: RwLock::new(data),
            file_path: Some(path),
        })
    }

    fn load_from_file(path: &Path) -> StoreResult<StoreData> {
        if !path.exists() {
            return Ok(StoreData::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(StoreData::default());
        }

        let data: StoreData = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Persist the dataset to disk (no-op for in-memory stores; caller
    /// holds the write lock)
    pub(crate) fn persist(&self, data: &StoreData) -> StoreResult<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(data)?;
        atomic_write(path, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserCreate;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = PollStore::open(dir.path().join("data.json")).unwrap();
        assert!(store.data.read().users.is_empty());
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");

        let store = PollStore::open(&path).unwrap();
        store
            .create_user(UserCreate {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "hunter2".to_string(),
            })
            .unwrap();

        let reloaded = PollStore::open(&path).unwrap();
        let data = reloaded.data.read();
        assert_eq!(data.users.len(), 1);
        assert_eq!(data.users[0].username, "alice");
        assert_eq!(data.counters.users, 1);
    }
}
