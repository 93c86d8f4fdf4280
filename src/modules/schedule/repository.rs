use super::day::ScheduleDay;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Persisted day-keyed schedule snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub day: ScheduleDay,
    pub entries: Vec<Value>,
    pub last_updated: DateTime<Utc>,
}

impl ScheduleRecord {
    pub fn age(&self) -> Duration {
        Utc::now() - self.last_updated
    }
}

/// Repository interface for the persisted schedule store.
/// Upsert is create-or-replace keyed by the day (natural key).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn find_by_day(&self, day: ScheduleDay) -> AppResult<Option<ScheduleRecord>>;

    async fn upsert(&self, day: ScheduleDay, entries: Vec<Value>) -> AppResult<()>;
}

/// Map-backed repository for tests and embedders without a database.
#[derive(Debug, Default)]
pub struct InMemoryScheduleRepository {
    records: DashMap<ScheduleDay, ScheduleRecord>,
}

impl InMemoryScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record with an explicit timestamp, for freshness tests.
    pub fn insert_with_timestamp(
        &self,
        day: ScheduleDay,
        entries: Vec<Value>,
        last_updated: DateTime<Utc>,
    ) {
        self.records.insert(
            day,
            ScheduleRecord {
                day,
                entries,
                last_updated,
            },
        );
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn find_by_day(&self, day: ScheduleDay) -> AppResult<Option<ScheduleRecord>> {
        Ok(self.records.get(&day).map(|r| r.value().clone()))
    }

    async fn upsert(&self, day: ScheduleDay, entries: Vec<Value>) -> AppResult<()> {
        self.records.insert(
            day,
            ScheduleRecord {
                day,
                entries,
                last_updated: Utc::now(),
            },
        );
        Ok(())
    }
}
