//! In-flight session persistence
//!
//! The snapshot is rewritten after every response and removed once the
//! session completes, so a stored snapshot always means an unfinished session.

use crate::core::error::Result;
use crate::core::types::UserId;
use crate::session::progression::SessionSnapshot;
use crate::storage::{self, keys, KeyValueStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(user_id: &UserId) -> String {
        storage::namespaced(keys::SESSION_PROGRESS, user_id)
    }

    /// Unfinished session for the user, if one was saved and still parses
    pub fn load(&self, user_id: &UserId) -> Option<SessionSnapshot> {
        storage::read_json(self.store.as_ref(), &Self::key(user_id))
    }

    pub fn save(&self, user_id: &UserId, snapshot: &SessionSnapshot) -> Result<()> {
        storage::write_json(self.store.as_ref(), &Self::key(user_id), snapshot)
    }

    pub fn clear(&self, user_id: &UserId) -> Result<()> {
        self.store.remove(&Self::key(user_id))
    }
}
