//! Key-value storage seam
//!
//! Every persisted value is a JSON snapshot stored under a namespaced key
//! `<purpose>:<user_id>`. Reads are forgiving: a missing, unreadable or
//! malformed value is treated as absent and logged, never propagated.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::core::error::Result;
use crate::core::types::UserId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Storage backend trait
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Storage key purposes
pub mod keys {
    pub const PROFILE: &str = "user_profile";
    pub const SAVED_WORDS: &str = "saved_words";
    pub const EVENTS: &str = "behavior_events";
    pub const SELECTED_WORDS: &str = "selected_words";
    pub const SELECTED_WORDS_BACKUP: &str = "selected_words_backup";
    pub const SESSION_PROGRESS: &str = "session_progress";
}

/// Build a `<purpose>:<user_id>` key
pub fn namespaced(purpose: &str, user_id: &UserId) -> String {
    format!("{}:{}", purpose, user_id)
}

/// The two storage scopes the engine talks to
#[derive(Clone)]
pub struct Storage {
    /// Short-lived values (selected words)
    pub session: Arc<dyn KeyValueStore>,
    /// Values that outlive a session (profiles, saved words, events, unfinished sessions)
    pub persistent: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(session: Arc<dyn KeyValueStore>, persistent: Arc<dyn KeyValueStore>) -> Self {
        Self { session, persistent }
    }

    /// Both scopes in memory; used by tests and ephemeral runs
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }
}

/// Read and decode a JSON value, treating any failure as absent
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "storage read failed, treating value as absent");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed stored value, treating as absent");
            None
        }
    }
}

/// Encode and store a JSON value
pub fn write_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_key() {
        assert_eq!(namespaced(keys::SAVED_WORDS, &UserId::new("u1")), "saved_words:u1");
    }

    #[test]
    fn test_read_json_malformed_is_none() {
        let store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        let value: Option<Vec<String>> = read_json(&store, "k");
        assert!(value.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let store = MemoryStore::new();
        write_json(&store, "k", &vec!["a".to_string()]).unwrap();
        let value: Option<Vec<String>> = read_json(&store, "k");
        assert_eq!(value, Some(vec!["a".to_string()]));
    }
}
