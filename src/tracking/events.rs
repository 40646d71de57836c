//! Behavior event records

use crate::core::types::{Timestamp, UserId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    WordSelection {
        selected: Vec<String>,
        available: Vec<String>,
    },
    SessionCompletion {
        completed_words: Vec<String>,
        total_words: Vec<String>,
        completed_count: usize,
        total_count: usize,
        duration_seconds: f64,
    },
}

/// Immutable record of one tracked user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub id: Uuid,
    pub user_id: UserId,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl BehaviorEvent {
    pub fn new(user_id: UserId, kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            timestamp: Utc::now(),
            kind,
        }
    }

    /// Completed / total for completion events
    pub fn completion_ratio(&self) -> Option<f64> {
        match &self.kind {
            EventKind::SessionCompletion { completed_count, total_count, .. } if *total_count > 0 => {
                Some(*completed_count as f64 / *total_count as f64)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = BehaviorEvent::new(
            UserId::new("u"),
            EventKind::WordSelection {
                selected: vec!["nuance".into()],
                available: vec!["nuance".into(), "pivot".into()],
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "word_selection");
        assert_eq!(json["user_id"], "u");
        let back: BehaviorEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_completion_ratio() {
        let event = BehaviorEvent::new(
            UserId::new("u"),
            EventKind::SessionCompletion {
                completed_words: vec!["a".into()],
                total_words: vec!["a".into(), "b".into()],
                completed_count: 1,
                total_count: 2,
                duration_seconds: 12.0,
            },
        );
        assert_eq!(event.completion_ratio(), Some(0.5));
    }
}
