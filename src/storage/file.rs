//! File-backed key-value store (persistent scope)
//!
//! One file per key inside a data directory. Keys are escaped byte-wise so
//! `saved_words:alice` and `saved_words_alice` never collide.

use crate::core::error::{MentorError, Result};
use crate::storage::KeyValueStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            MentorError::Storage(format!("cannot create {}: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", escape_key(key)))
    }
}

/// Escape every byte outside `[A-Za-z0-9_-]` as `%XX`
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MentorError::Storage(format!("read {}: {}", key, e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| MentorError::Storage(format!("write {}: {}", key, e)))?;
        fs::rename(&tmp, &path).map_err(|e| MentorError::Storage(format!("write {}: {}", key, e)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MentorError::Storage(format!("remove {}: {}", key, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_key() {
        assert_eq!(escape_key("saved_words:alice"), "saved_words%3Aalice");
        assert_ne!(escape_key("a:b"), escape_key("a_b"));
        assert_eq!(escape_key("x/../y"), "x%2F%2E%2E%2Fy");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();

        assert_eq!(store.get("user_profile:bob").unwrap(), None);
        store.set("user_profile:bob", "{}").unwrap();
        assert_eq!(store.get("user_profile:bob").unwrap(), Some("{}".to_string()));

        // A second handle on the same directory sees the value
        let reopened = FileStore::open(store.root()).unwrap();
        assert_eq!(reopened.get("user_profile:bob").unwrap(), Some("{}".to_string()));

        store.remove("user_profile:bob").unwrap();
        store.remove("user_profile:bob").unwrap();
        assert_eq!(reopened.get("user_profile:bob").unwrap(), None);
    }
}
