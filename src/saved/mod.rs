//! Starred words per user
//!
//! At most one entry per (user, word), matched case-insensitively. Saving an
//! already-saved word and unsaving an absent one are both no-ops.

use crate::catalog::WordEntry;
use crate::core::error::Result;
use crate::core::types::{Timestamp, UserId};
use crate::storage::{self, keys, KeyValueStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWord {
    pub word: String,
    pub definition: String,
    pub cluster: String,
    pub difficulty: u8,
    pub saved_at: Timestamp,
}

impl SavedWord {
    fn from_entry(entry: &WordEntry) -> Self {
        Self {
            word: entry.word.clone(),
            definition: entry.definition.clone(),
            cluster: entry.cluster.clone(),
            difficulty: entry.difficulty,
            saved_at: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct SavedWordsManager {
    store: Arc<dyn KeyValueStore>,
}

impl SavedWordsManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(user_id: &UserId) -> String {
        storage::namespaced(keys::SAVED_WORDS, user_id)
    }

    /// Saved words in the order they were starred; empty on any read problem
    pub fn get_saved_words(&self, user_id: &UserId) -> Vec<SavedWord> {
        storage::read_json(self.store.as_ref(), &Self::key(user_id)).unwrap_or_default()
    }

    pub fn is_word_saved(&self, user_id: &UserId, word: &str) -> bool {
        self.get_saved_words(user_id)
            .iter()
            .any(|w| w.word.eq_ignore_ascii_case(word.trim()))
    }

    /// Star a word. Returns `false` if it was already saved.
    pub fn save_word(&self, user_id: &UserId, entry: &WordEntry) -> Result<bool> {
        let mut saved = self.get_saved_words(user_id);
        if saved.iter().any(|w| w.word.eq_ignore_ascii_case(&entry.word)) {
            return Ok(false);
        }
        saved.push(SavedWord::from_entry(entry));
        storage::write_json(self.store.as_ref(), &Self::key(user_id), &saved)?;
        tracing::debug!(user = %user_id, word = %entry.word, "saved word");
        Ok(true)
    }

    /// Unstar a word. Returns `false` if it was not saved.
    pub fn unsave_word(&self, user_id: &UserId, word: &str) -> Result<bool> {
        let mut saved = self.get_saved_words(user_id);
        let before = saved.len();
        saved.retain(|w| !w.word.eq_ignore_ascii_case(word.trim()));
        if saved.len() == before {
            return Ok(false);
        }
        storage::write_json(self.store.as_ref(), &Self::key(user_id), &saved)?;
        tracing::debug!(user = %user_id, word, "unsaved word");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::storage::MemoryStore;

    fn setup() -> (SavedWordsManager, Catalog, UserId) {
        (
            SavedWordsManager::new(Arc::new(MemoryStore::new())),
            Catalog::builtin().unwrap(),
            UserId::new("u"),
        )
    }

    #[test]
    fn test_save_then_unsave() {
        let (saved, catalog, user) = setup();
        let nuance = catalog.find("nuance").unwrap();

        assert!(!saved.is_word_saved(&user, "nuance"));
        assert!(saved.save_word(&user, nuance).unwrap());
        assert!(saved.is_word_saved(&user, "Nuance"));

        assert!(saved.unsave_word(&user, "nuance").unwrap());
        assert!(!saved.is_word_saved(&user, "nuance"));
        assert!(!saved.unsave_word(&user, "nuance").unwrap());
    }

    #[test]
    fn test_double_save_keeps_one_entry_and_timestamp() {
        let (saved, catalog, user) = setup();
        let pivot = catalog.find("pivot").unwrap();

        saved.save_word(&user, pivot).unwrap();
        let first = saved.get_saved_words(&user);
        assert!(!saved.save_word(&user, pivot).unwrap());
        let second = saved.get_saved_words(&user);

        assert_eq!(second.len(), 1);
        assert_eq!(first[0].saved_at, second[0].saved_at);
    }

    #[test]
    fn test_users_are_isolated() {
        let (saved, catalog, user) = setup();
        saved.save_word(&user, catalog.find("elated").unwrap()).unwrap();
        assert!(!saved.is_word_saved(&UserId::new("other"), "elated"));
    }

    #[test]
    fn test_corrupt_list_reads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set("saved_words:u", "[{\"word\": 1}]").unwrap();
        let saved = SavedWordsManager::new(store);
        assert!(saved.get_saved_words(&UserId::new("u")).is_empty());
    }
}
