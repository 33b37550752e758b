// src/github/cache.rs
// =============================================================================
// Session cache: username (exact string) -> ProfileBundle.
//
// Unbounded and never invalidated. Entries are only written after a fully
// successful fetch, so a present key always holds a complete bundle.
// The orchestrator takes the cache as an Arc<dyn ProfileCache> so every test
// (and every session) can own an isolated instance.
// =============================================================================

use dashmap::DashMap;

use super::models::ProfileBundle;

pub trait ProfileCache: Send + Sync {
    fn get(&self, username: &str) -> Option<ProfileBundle>;
    fn set(&self, username: String, bundle: ProfileBundle);
}

#[derive(Debug, Default)]
pub struct SessionCache {
    entries: DashMap<String, ProfileBundle>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.entries.contains_key(username)
    }
}

impl ProfileCache for SessionCache {
    fn get(&self, username: &str) -> Option<ProfileBundle> {
        self.entries.get(username).map(|entry| entry.value().clone())
    }

    fn set(&self, username: String, bundle: ProfileBundle) {
        self.entries.insert(username, bundle);
    }
}
