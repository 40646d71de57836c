//! Behavior tracking folded into profile updates
//!
//! Every tracked action produces an immutable `BehaviorEvent`, is folded into
//! the user's profile (read-modify-write, last write wins) and is appended to
//! a capped per-user event log. Storage failures are logged and swallowed so
//! the learning flow never stops on a personalization write.

pub mod events;

pub use events::{BehaviorEvent, EventKind};

use crate::catalog::{Catalog, WordEntry};
use crate::core::config::{MentorConfig, ScoringConfig};
use crate::core::error::Result;
use crate::core::types::UserId;
use crate::profile::{ProfileStore, UserProfile, WordHistoryEntry};
use crate::session::progression::{CompletionReport, CompletionReporter};
use crate::storage::{self, keys, KeyValueStore};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

/// Credit each selected word's context keys with `weight`
pub fn apply_selection(profile: &mut UserProfile, words: &[WordEntry], weight: f64) {
    for word in words {
        for key in word.preference_keys() {
            *profile.context_preferences.entry(key).or_insert(0.0) += weight;
        }
    }
    profile.updated_at = Utc::now();
}

/// Append history entries and adjust the level after a session
pub fn apply_completion(
    profile: &mut UserProfile,
    completed_words: &[String],
    all_words: &[String],
    scoring: &ScoringConfig,
) {
    let now = Utc::now();
    let done: HashSet<String> = completed_words.iter().map(|w| w.to_lowercase()).collect();

    for word in completed_words {
        profile.word_history.push(WordHistoryEntry {
            word: word.clone(),
            completed: true,
            timestamp: now,
        });
    }
    for word in all_words.iter().filter(|w| !done.contains(&w.to_lowercase())) {
        profile.word_history.push(WordHistoryEntry {
            word: word.clone(),
            completed: false,
            timestamp: now,
        });
    }

    let total = all_words.len().max(completed_words.len());
    if total > 0 {
        let ratio = completed_words.len() as f64 / total as f64;
        let level = &mut profile.vocabulary_level;
        if ratio >= scoring.high_completion_ratio {
            level.estimated_level =
                (level.estimated_level + scoring.level_step).clamp(scoring.min_level, scoring.max_level);
        }
        level.confidence = (level.confidence + scoring.confidence_step).min(1.0);
    }
    profile.updated_at = now;
}

#[derive(Clone)]
pub struct BehaviorTracker {
    profiles: ProfileStore,
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<Catalog>,
    scoring: ScoringConfig,
    max_logged_events: usize,
}

impl BehaviorTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: Arc<Catalog>, config: &MentorConfig) -> Self {
        Self {
            profiles: ProfileStore::new(store.clone(), config.scoring.clone()),
            store,
            catalog,
            scoring: config.scoring.clone(),
            max_logged_events: config.session.max_logged_events,
        }
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// Record which words the user picked from the offered list
    pub fn track_word_selection(
        &self,
        user_id: &UserId,
        selected: &[String],
        available: &[String],
    ) -> BehaviorEvent {
        let event = BehaviorEvent::new(
            user_id.clone(),
            EventKind::WordSelection {
                selected: selected.to_vec(),
                available: available.to_vec(),
            },
        );

        let mut profile = self.profiles.load(user_id);
        apply_selection(&mut profile, &self.catalog.resolve(selected), self.scoring.selection_weight);
        self.persist(&profile, &event);

        tracing::debug!(user = %user_id, selected = selected.len(), available = available.len(), "tracked word selection");
        event
    }

    /// Record the outcome of a finished session
    pub fn track_session_completion(
        &self,
        user_id: &UserId,
        completed_words: &[String],
        all_words: &[String],
        duration_seconds: f64,
    ) -> BehaviorEvent {
        let event = BehaviorEvent::new(
            user_id.clone(),
            EventKind::SessionCompletion {
                completed_words: completed_words.to_vec(),
                total_words: all_words.to_vec(),
                completed_count: completed_words.len(),
                total_count: all_words.len(),
                duration_seconds,
            },
        );

        let mut profile = self.profiles.load(user_id);
        apply_completion(&mut profile, completed_words, all_words, &self.scoring);
        self.persist(&profile, &event);

        tracing::info!(
            user = %user_id,
            completed = completed_words.len(),
            total = all_words.len(),
            level = profile.vocabulary_level.estimated_level,
            "tracked session completion"
        );
        event
    }

    /// Logged events, oldest first
    pub fn events(&self, user_id: &UserId) -> Vec<BehaviorEvent> {
        storage::read_json(self.store.as_ref(), &storage::namespaced(keys::EVENTS, user_id))
            .unwrap_or_default()
    }

    /// Completion reporter bound to one user, for `SessionController::with_reporter`
    pub fn reporter(&self, user_id: &UserId) -> TrackerReporter {
        TrackerReporter {
            tracker: self.clone(),
            user_id: user_id.clone(),
        }
    }

    fn persist(&self, profile: &UserProfile, event: &BehaviorEvent) {
        if let Err(e) = self.profiles.save(profile) {
            tracing::warn!(user = %profile.user_id, error = %e, "failed to save profile");
        }
        if let Err(e) = self.append_event(event) {
            tracing::warn!(user = %event.user_id, error = %e, "failed to log event");
        }
    }

    fn append_event(&self, event: &BehaviorEvent) -> Result<()> {
        let mut events = self.events(&event.user_id);
        events.push(event.clone());
        if events.len() > self.max_logged_events {
            let excess = events.len() - self.max_logged_events;
            events.drain(..excess);
        }
        storage::write_json(
            self.store.as_ref(),
            &storage::namespaced(keys::EVENTS, &event.user_id),
            &events,
        )
    }
}

/// Forwards session completion to the tracker
pub struct TrackerReporter {
    tracker: BehaviorTracker,
    user_id: UserId,
}

impl CompletionReporter for TrackerReporter {
    fn report_completion(&mut self, report: &CompletionReport) -> Result<()> {
        self.tracker.track_session_completion(
            &self.user_id,
            &report.completed_words,
            &report.words,
            report.duration_seconds,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn tracker_with(config: MentorConfig) -> BehaviorTracker {
        BehaviorTracker::new(
            Arc::new(MemoryStore::new()),
            Arc::new(Catalog::builtin().unwrap()),
            &config,
        )
    }

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_selection_increments_context_tags() {
        let tracker = tracker_with(MentorConfig::default());
        let user = UserId::new("u");

        tracker.track_word_selection(&user, &strings(&["synergy", "pivot"]), &strings(&["synergy", "pivot", "nuance"]));
        let profile = tracker.profiles().load(&user);
        assert_eq!(profile.context_preferences.get("work"), Some(&2.0));
        assert_eq!(profile.context_preferences.get("technical"), Some(&1.0));
        assert_eq!(profile.dominant_context(), Some("work"));

        tracker.track_word_selection(&user, &strings(&["nuance"]), &[]);
        let profile = tracker.profiles().load(&user);
        assert_eq!(profile.context_preferences.get("academic"), Some(&1.0));
        assert_eq!(profile.context_preferences.get("work"), Some(&2.0));
    }

    #[test]
    fn test_unknown_word_credits_general() {
        let tracker = tracker_with(MentorConfig::default());
        let user = UserId::new("u");
        tracker.track_word_selection(&user, &strings(&["blorp"]), &[]);
        let profile = tracker.profiles().load(&user);
        assert_eq!(profile.context_preferences.get("general"), Some(&1.0));
    }

    #[test]
    fn test_completion_history_and_level() {
        let tracker = tracker_with(MentorConfig::default());
        let user = UserId::new("u");

        tracker.track_session_completion(&user, &strings(&["synergy", "nuance"]), &strings(&["synergy", "nuance"]), 60.0);
        let profile = tracker.profiles().load(&user);
        assert_eq!(profile.word_history.len(), 2);
        assert!(profile.word_history.iter().all(|h| h.completed));
        assert_eq!(profile.vocabulary_level.estimated_level, 5.25);
        assert!((profile.vocabulary_level.confidence - 0.05).abs() < 1e-12);

        // One of three done: history records the misses, level holds
        tracker.track_session_completion(&user, &strings(&["pivot"]), &strings(&["pivot", "Latency", "elated"]), 30.0);
        let profile = tracker.profiles().load(&user);
        assert_eq!(profile.word_history.len(), 5);
        let missed: Vec<&str> = profile
            .word_history
            .iter()
            .filter(|h| !h.completed)
            .map(|h| h.word.as_str())
            .collect();
        assert_eq!(missed, vec!["Latency", "elated"]);
        assert_eq!(profile.vocabulary_level.estimated_level, 5.25);
    }

    #[test]
    fn test_level_is_clamped() {
        let mut config = MentorConfig::default();
        config.scoring.level_step = 4.0;
        let tracker = tracker_with(config);
        let user = UserId::new("u");
        for _ in 0..3 {
            tracker.track_session_completion(&user, &strings(&["a"]), &strings(&["a"]), 1.0);
        }
        assert_eq!(tracker.profiles().load(&user).vocabulary_level.estimated_level, 10.0);
    }

    #[test]
    fn test_event_log_is_capped() {
        let mut config = MentorConfig::default();
        config.session.max_logged_events = 3;
        let tracker = tracker_with(config);
        let user = UserId::new("u");

        let mut last = None;
        for _ in 0..5 {
            last = Some(tracker.track_word_selection(&user, &strings(&["nuance"]), &[]));
        }
        let events = tracker.events(&user);
        assert_eq!(events.len(), 3);
        assert_eq!(events.last(), last.as_ref());
    }

    #[test]
    fn test_reporter_forwards_completion() {
        let tracker = tracker_with(MentorConfig::default());
        let user = UserId::new("u");
        let mut reporter = tracker.reporter(&user);
        reporter
            .report_completion(&CompletionReport {
                words: strings(&["nuance", "pivot"]),
                completed_words: strings(&["nuance"]),
                completed_count: 1,
                total_count: 2,
                duration_seconds: 20.0,
            })
            .unwrap();

        let events = tracker.events(&user);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].completion_ratio(), Some(0.5));
        assert_eq!(tracker.profiles().load(&user).word_history.len(), 2);
    }
}
