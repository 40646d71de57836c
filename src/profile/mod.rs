//! Per-user learning profile and its store
//!
//! One profile per user id, created on first access. Reads never fail: a
//! missing or corrupt record yields a fresh default.

use crate::core::config::ScoringConfig;
use crate::core::error::Result;
use crate::core::types::{Timestamp, UserId};
use crate::storage::{self, keys, KeyValueStore};
use chrono::Utc;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Context name used when no preference has been recorded
pub const GENERAL_CONTEXT: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyLevel {
    pub estimated_level: f64,
    /// 0.0 - 1.0
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordHistoryEntry {
    pub word: String,
    pub completed: bool,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub vocabulary_level: VocabularyLevel,
    #[serde(default)]
    pub word_history: Vec<WordHistoryEntry>,
    /// Relative ranking only; scores are unbounded
    #[serde(default)]
    pub context_preferences: BTreeMap<String, f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserProfile {
    pub fn new(user_id: UserId, scoring: &ScoringConfig) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            vocabulary_level: VocabularyLevel {
                estimated_level: scoring.default_level,
                confidence: 0.0,
            },
            word_history: Vec::new(),
            context_preferences: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Highest-scoring context; ties go to the lexicographically smallest name
    pub fn dominant_context(&self) -> Option<&str> {
        self.context_preferences
            .iter()
            .max_by(|a, b| {
                OrderedFloat(*a.1)
                    .cmp(&OrderedFloat(*b.1))
                    .then_with(|| b.0.cmp(a.0))
            })
            .map(|(name, _)| name.as_str())
    }

    /// Words with at least one completed history entry
    pub fn completed_words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self
            .word_history
            .iter()
            .filter(|h| h.completed)
            .map(|h| h.word.as_str())
            .collect();
        words.sort_unstable();
        words.dedup();
        words
    }

    /// Fraction of history entries that were completed
    pub fn completion_rate(&self) -> Option<f64> {
        if self.word_history.is_empty() {
            return None;
        }
        let done = self.word_history.iter().filter(|h| h.completed).count();
        Some(done as f64 / self.word_history.len() as f64)
    }
}

/// Dominant context of an optional profile, `"general"` when unknown
pub fn dominant_context_of(profile: Option<&UserProfile>) -> String {
    profile
        .and_then(|p| p.dominant_context())
        .unwrap_or(GENERAL_CONTEXT)
        .to_string()
}

/// Estimated level of an optional profile, 5 when unknown
pub fn difficulty_level_of(profile: Option<&UserProfile>) -> f64 {
    profile
        .map(|p| p.vocabulary_level.estimated_level)
        .filter(|level| level.is_finite())
        .unwrap_or(5.0)
}

/// Profile persistence over a key-value store
#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
    scoring: ScoringConfig,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>, scoring: ScoringConfig) -> Self {
        Self { store, scoring }
    }

    fn key(user_id: &UserId) -> String {
        storage::namespaced(keys::PROFILE, user_id)
    }

    /// Stored profile without creating one
    pub fn peek(&self, user_id: &UserId) -> Option<UserProfile> {
        storage::read_json(self.store.as_ref(), &Self::key(user_id))
    }

    /// Load the profile, creating and persisting a default on first access
    pub fn load(&self, user_id: &UserId) -> UserProfile {
        if let Some(profile) = self.peek(user_id) {
            return profile;
        }

        let profile = UserProfile::new(user_id.clone(), &self.scoring);
        if let Err(e) = self.save(&profile) {
            tracing::warn!(user = %user_id, error = %e, "could not persist new profile");
        } else {
            tracing::debug!(user = %user_id, "created profile");
        }
        profile
    }

    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        storage::write_json(self.store.as_ref(), &Self::key(&profile.user_id), profile)
    }

    /// Replace the profile with a fresh default
    pub fn reset(&self, user_id: &UserId) -> Result<UserProfile> {
        let profile = UserProfile::new(user_id.clone(), &self.scoring);
        self.save(&profile)?;
        tracing::info!(user = %user_id, "profile reset");
        Ok(profile)
    }
}
