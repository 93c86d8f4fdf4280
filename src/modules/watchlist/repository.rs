use super::entry::WatchEntry;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use dashmap::DashMap;

/// Read-only view over a user's tracked entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchHistoryRepository: Send + Sync {
    /// Entries in the insertion order of the underlying collection.
    async fn entries_for_user(&self, user_id: &str) -> AppResult<Vec<WatchEntry>>;
}

/// Map-backed history for tests and embedders without a database.
#[derive(Debug, Default)]
pub struct InMemoryWatchHistory {
    entries: DashMap<String, Vec<WatchEntry>>,
}

impl InMemoryWatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_entries(&self, user_id: &str, entries: Vec<WatchEntry>) {
        self.entries.insert(user_id.to_string(), entries);
    }
}

#[async_trait]
impl WatchHistoryRepository for InMemoryWatchHistory {
    async fn entries_for_user(&self, user_id: &str) -> AppResult<Vec<WatchEntry>> {
        Ok(self
            .entries
            .get(user_id)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }
}
