//! Load the word catalog from TOML

use crate::catalog::word::WordEntry;
use crate::core::error::{MentorError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Catalog shipped with the crate
pub(crate) const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.toml");

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    words: Vec<WordEntry>,
}

/// Parse and validate a catalog document
pub fn parse_catalog(content: &str) -> Result<Vec<WordEntry>> {
    let file: CatalogFile =
        toml::from_str(content).map_err(|e| MentorError::Catalog(format!("Invalid TOML: {}", e)))?;

    let mut seen = HashSet::new();
    for entry in &file.words {
        if entry.word.trim().is_empty() {
            return Err(MentorError::Catalog("entry with empty word".into()));
        }
        if !(1..=10).contains(&entry.difficulty) {
            return Err(MentorError::Catalog(format!(
                "{}: difficulty {} outside 1..=10",
                entry.word, entry.difficulty
            )));
        }
        if !seen.insert(entry.word.to_lowercase()) {
            return Err(MentorError::Catalog(format!("duplicate word: {}", entry.word)));
        }
    }

    Ok(file.words)
}

/// Load a catalog file from disk
pub fn load_catalog_file(path: &Path) -> Result<Vec<WordEntry>> {
    let content = fs::read_to_string(path)
        .map_err(|e| MentorError::Catalog(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_catalog(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let words = parse_catalog(BUILTIN_CATALOG).unwrap();
        assert!(words.len() >= 20);
        assert!(words.iter().any(|w| w.word == "synergy"));
        assert!(words.iter().any(|w| w.word == "nuance"));
    }

    #[test]
    fn test_difficulty_out_of_range_rejected() {
        let doc = r#"
            [[words]]
            word = "x"
            definition = "d"
            cognitive_weight = "EMOTIONAL"
            cluster = "c"
            difficulty = 11
        "#;
        assert!(matches!(parse_catalog(doc), Err(MentorError::Catalog(_))));
    }

    #[test]
    fn test_duplicate_words_rejected() {
        let doc = r#"
            [[words]]
            word = "Echo"
            definition = "d"
            cognitive_weight = "EMOTIONAL"
            cluster = "c"
            difficulty = 2

            [[words]]
            word = "echo"
            definition = "d"
            cognitive_weight = "EMOTIONAL"
            cluster = "c"
            difficulty = 2
        "#;
        assert!(matches!(parse_catalog(doc), Err(MentorError::Catalog(_))));
    }
}
