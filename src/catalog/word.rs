//! Vocabulary entry definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Primary mode in which a word is understood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CognitiveWeight {
    /// Grasped through reasoning and definitions
    Intellectual,
    /// Grasped through feeling and mood
    Emotional,
    /// Grasped through how people relate to each other
    Relational,
    /// Grasped by telling it apart from near-synonyms
    Discriminative,
}

/// One catalog word. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub part_of_speech: String,
    pub cognitive_weight: CognitiveWeight,
    #[serde(default)]
    pub semantic_field: String,
    #[serde(default)]
    pub context_tags: BTreeSet<String>,
    pub cluster: String,
    /// 1 (everyday) ..= 10 (rare)
    pub difficulty: u8,
}

impl WordEntry {
    /// Stand-in for a selected word the catalog does not know
    ///
    /// Carries generic filler so downstream content is still complete.
    pub fn placeholder(word: &str) -> Self {
        Self {
            word: word.trim().to_string(),
            definition: String::new(),
            part_of_speech: String::new(),
            cognitive_weight: CognitiveWeight::Intellectual,
            semantic_field: String::new(),
            context_tags: BTreeSet::new(),
            cluster: "general".to_string(),
            difficulty: 5,
        }
    }

    /// Context names credited when this word is selected
    ///
    /// Falls back to the lower-cased cluster name for untagged words.
    pub fn preference_keys(&self) -> Vec<String> {
        if self.context_tags.is_empty() {
            vec![self.cluster.to_lowercase()]
        } else {
            self.context_tags.iter().map(|t| t.to_lowercase()).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_generic() {
        let entry = WordEntry::placeholder("  zeitgeist ");
        assert_eq!(entry.word, "zeitgeist");
        assert_eq!(entry.cluster, "general");
        assert_eq!(entry.preference_keys(), vec!["general".to_string()]);
    }

    #[test]
    fn test_cognitive_weight_serialization() {
        let json = serde_json::to_string(&CognitiveWeight::Discriminative).unwrap();
        assert_eq!(json, "\"DISCRIMINATIVE\"");
    }

    #[test]
    fn test_preference_keys_use_tags() {
        let mut entry = WordEntry::placeholder("pivot");
        entry.context_tags.insert("Work".into());
        entry.context_tags.insert("technical".into());
        assert_eq!(entry.preference_keys(), vec!["work".to_string(), "technical".to_string()]);
    }
}
