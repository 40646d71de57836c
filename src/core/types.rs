//! Core type definitions used throughout the codebase

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock timestamp used for history, events and saved words
pub type Timestamp = DateTime<Utc>;

/// Identifier of a learner. Opaque; used to namespace storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Situational domain used to pick content templates
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    #[display(fmt = "work")]
    Work,
    #[display(fmt = "academic")]
    Academic,
    #[display(fmt = "creative")]
    Creative,
    #[display(fmt = "social")]
    Social,
    #[display(fmt = "technical")]
    Technical,
    #[display(fmt = "general")]
    General,
}

impl ContextKind {
    pub const ALL: [ContextKind; 6] = [
        ContextKind::Work,
        ContextKind::Academic,
        ContextKind::Creative,
        ContextKind::Social,
        ContextKind::Technical,
        ContextKind::General,
    ];

    /// Map a free-form context name onto a known kind.
    ///
    /// Unrecognized names map to `General`, which selects the generic
    /// template set.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "work" | "business" | "professional" => ContextKind::Work,
            "academic" | "school" | "study" => ContextKind::Academic,
            "creative" | "art" | "writing" => ContextKind::Creative,
            "social" | "personal" => ContextKind::Social,
            "technical" | "tech" | "engineering" => ContextKind::Technical,
            _ => ContextKind::General,
        }
    }
}
