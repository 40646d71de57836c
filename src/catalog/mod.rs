//! Static vocabulary catalog grouped into thematic clusters

pub mod word;
mod loader;

pub use loader::{load_catalog_file, parse_catalog};
pub use word::{CognitiveWeight, WordEntry};

use crate::core::error::Result;
use ahash::AHashMap;
use std::path::Path;

/// In-memory word list with a case-insensitive index
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<WordEntry>,
    index: AHashMap<String, usize>,
}

impl Catalog {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.word.to_lowercase(), i))
            .collect();
        Self { entries, index }
    }

    /// The catalog compiled into the crate
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(parse_catalog(loader::BUILTIN_CATALOG)?))
    }

    /// Load a user-supplied catalog file
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(load_catalog_file(path)?))
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, word: &str) -> Option<&WordEntry> {
        self.index
            .get(&word.trim().to_lowercase())
            .map(|&i| &self.entries[i])
    }

    /// Cluster names in first-appearance order
    pub fn clusters(&self) -> Vec<&str> {
        let mut clusters: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !clusters.contains(&entry.cluster.as_str()) {
                clusters.push(&entry.cluster);
            }
        }
        clusters
    }

    pub fn by_cluster(&self, cluster: &str) -> Vec<&WordEntry> {
        self.entries
            .iter()
            .filter(|e| e.cluster.eq_ignore_ascii_case(cluster))
            .collect()
    }

    /// Resolve selected word strings into entries
    ///
    /// Unknown words become placeholders; blank strings are dropped.
    pub fn resolve(&self, words: &[String]) -> Vec<WordEntry> {
        words
            .iter()
            .filter(|w| !w.trim().is_empty())
            .map(|w| {
                self.find(w).cloned().unwrap_or_else(|| {
                    tracing::debug!(word = %w, "word not in catalog, using placeholder entry");
                    WordEntry::placeholder(w)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.find("SYNERGY").unwrap().word, "synergy");
        assert!(catalog.find("notaword").is_none());
    }

    #[test]
    fn test_clusters_and_by_cluster() {
        let catalog = Catalog::builtin().unwrap();
        let clusters = catalog.clusters();
        assert_eq!(clusters[0], "Work & Business");
        assert!(clusters.contains(&"Literary"));

        let literary = catalog.by_cluster("literary");
        assert!(literary.iter().all(|e| e.cluster == "Literary"));
        assert!(literary.iter().any(|e| e.word == "nuance"));
    }

    #[test]
    fn test_resolve_unknown_words() {
        let catalog = Catalog::builtin().unwrap();
        let resolved = catalog.resolve(&["nuance".into(), "".into(), "blorp".into()]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].cluster, "Literary");
        assert_eq!(resolved[1].word, "blorp");
        assert_eq!(resolved[1].cluster, "general");
    }
}
