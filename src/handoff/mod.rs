//! Hand the selected words from word selection to the session runner
//!
//! The word list travels through several carriers. Resolution walks the
//! configured sources in order and takes the first one that yields a
//! non-empty, parseable list; a broken carrier only costs a log line.

use crate::core::config::HandoffConfig;
use crate::core::error::{MentorError, Result};
use crate::core::types::UserId;
use crate::storage::{self, keys, KeyValueStore, Storage};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Carrier kinds as named in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffSourceKind {
    SessionStorage,
    UrlParameter,
    PersistentStorage,
}

/// A concrete carrier with its key or parameter name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffSource {
    SessionStorage { key: String },
    UrlParameter { name: String },
    PersistentStorage { key: String },
}

/// What the sources are read from
pub struct HandoffContext<'a> {
    pub session: &'a dyn KeyValueStore,
    pub persistent: &'a dyn KeyValueStore,
    pub url: Option<&'a str>,
}

impl<'a> HandoffContext<'a> {
    pub fn new(storage: &'a Storage, url: Option<&'a str>) -> Self {
        Self {
            session: storage.session.as_ref(),
            persistent: storage.persistent.as_ref(),
            url,
        }
    }
}

#[derive(Deserialize)]
struct WordRef {
    word: String,
}

/// Accepted payload shapes: `["a"]`, `[{"word": "a"}]`, `{"words": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum HandoffPayload {
    Words(Vec<String>),
    Entries(Vec<WordRef>),
    Wrapped { words: Vec<String> },
}

/// Decode a carrier value into a cleaned word list; `None` if unusable
fn parse_words(raw: &str) -> Option<Vec<String>> {
    let payload: HandoffPayload = match serde_json::from_str(raw) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable handoff payload");
            return None;
        }
    };

    let words = match payload {
        HandoffPayload::Words(words) | HandoffPayload::Wrapped { words } => words,
        HandoffPayload::Entries(entries) => entries.into_iter().map(|e| e.word).collect(),
    };

    let mut seen = HashSet::new();
    let cleaned: Vec<String> = words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty() && seen.insert(w.to_lowercase()))
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn parse_url(url: &str) -> Option<Url> {
    Url::parse(url)
        .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(url)))
        .ok()
}

fn url_parameter(url: &str, name: &str) -> Option<String> {
    parse_url(url)?
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Priority-ordered carrier list for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandoff {
    sources: Vec<HandoffSource>,
}

impl SessionHandoff {
    pub fn new(sources: Vec<HandoffSource>) -> Self {
        Self { sources }
    }

    /// Concrete sources for `user_id` in the configured order
    pub fn from_config(config: &HandoffConfig, user_id: &UserId) -> Self {
        let sources = config
            .sources
            .iter()
            .map(|kind| match kind {
                HandoffSourceKind::SessionStorage => HandoffSource::SessionStorage {
                    key: storage::namespaced(keys::SELECTED_WORDS, user_id),
                },
                HandoffSourceKind::UrlParameter => HandoffSource::UrlParameter {
                    name: config.url_parameter.clone(),
                },
                HandoffSourceKind::PersistentStorage => HandoffSource::PersistentStorage {
                    key: storage::namespaced(keys::SELECTED_WORDS_BACKUP, user_id),
                },
            })
            .collect();
        Self::new(sources)
    }

    pub fn sources(&self) -> &[HandoffSource] {
        &self.sources
    }

    fn read(source: &HandoffSource, ctx: &HandoffContext<'_>) -> Option<String> {
        let read_store = |store: &dyn KeyValueStore, key: &str| match store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "handoff carrier unreadable");
                None
            }
        };

        match source {
            HandoffSource::SessionStorage { key } => read_store(ctx.session, key),
            HandoffSource::PersistentStorage { key } => read_store(ctx.persistent, key),
            HandoffSource::UrlParameter { name } => ctx.url.and_then(|url| url_parameter(url, name)),
        }
    }

    /// First non-empty, parseable word list, or an input error
    pub fn resolve(&self, ctx: &HandoffContext<'_>) -> Result<Vec<String>> {
        for source in &self.sources {
            let Some(raw) = Self::read(source, ctx) else {
                continue;
            };
            if let Some(words) = parse_words(&raw) {
                tracing::debug!(?source, count = words.len(), "resolved selected words");
                return Ok(words);
            }
            tracing::debug!(?source, "handoff carrier empty or malformed, trying next");
        }

        Err(MentorError::Input("no words were selected".into()))
    }

    /// Write the word list to every storage-backed carrier
    ///
    /// A carrier that cannot be written is logged and skipped. Returns how
    /// many carriers were written.
    pub fn publish(&self, storage: &Storage, words: &[String]) -> usize {
        let payload = match serde_json::to_string(words) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode selected words");
                return 0;
            }
        };

        let mut written = 0;
        for source in &self.sources {
            let result = match source {
                HandoffSource::SessionStorage { key } => storage.session.set(key, &payload),
                HandoffSource::PersistentStorage { key } => storage.persistent.set(key, &payload),
                HandoffSource::UrlParameter { .. } => continue,
            };
            match result {
                Ok(()) => written += 1,
                Err(e) => tracing::warn!(?source, error = %e, "failed to store selected words"),
            }
        }
        written
    }

    /// Session URL carrying the word list in the first URL parameter source
    pub fn session_url(&self, base: &str, words: &[String]) -> Result<String> {
        let mut url = parse_url(base).ok_or_else(|| MentorError::Input(format!("invalid URL: {}", base)))?;
        if let Some(name) = self.sources.iter().find_map(|s| match s {
            HandoffSource::UrlParameter { name } => Some(name),
            _ => None,
        }) {
            let payload = serde_json::to_string(words)?;
            url.query_pairs_mut().append_pair(name, &payload);
        }
        Ok(url.to_string())
    }

    /// Forget the carried words once a session has started
    pub fn clear(&self, storage: &Storage) {
        for source in &self.sources {
            let result = match source {
                HandoffSource::SessionStorage { key } => storage.session.remove(key),
                HandoffSource::PersistentStorage { key } => storage.persistent.remove(key),
                HandoffSource::UrlParameter { .. } => Ok(()),
            };
            if let Err(e) = result {
                tracing::warn!(?source, error = %e, "failed to clear handoff carrier");
            }
        }
    }
}
