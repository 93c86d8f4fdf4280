//! Day-keyed schedule serving with a persisted 24h freshness window.
//!
//! The persisted record is the source of truth while it is fresh. The short
//! fetch-side cache window only collapses duplicate concurrent upstream
//! hits; it is not a freshness signal.

use super::day::ScheduleDay;
use super::repository::ScheduleRepository;
use crate::log_warn;
use crate::modules::provider::{FetchClient, JikanEndpoints};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// A persisted record older than this must be refreshed before being trusted.
const MAX_RECORD_AGE_HOURS: i64 = 24;
/// Dedup-only cache window for the upstream schedule fetch.
const DEDUP_TTL: Duration = Duration::from_secs(60);

pub struct ScheduleStore {
    repository: Arc<dyn ScheduleRepository>,
    fetch_client: Arc<FetchClient>,
    endpoints: JikanEndpoints,
    max_record_age: chrono::Duration,
    dedup_ttl: Duration,
}

impl ScheduleStore {
    pub fn new(repository: Arc<dyn ScheduleRepository>, fetch_client: Arc<FetchClient>) -> Self {
        Self {
            repository,
            fetch_client,
            endpoints: JikanEndpoints::new(),
            max_record_age: chrono::Duration::hours(MAX_RECORD_AGE_HOURS),
            dedup_ttl: DEDUP_TTL,
        }
    }

    pub fn with_endpoints(mut self, endpoints: JikanEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Serve a weekday's release schedule as a `{"data": [...]}` payload.
    ///
    /// A persisted record younger than 24h is returned without any fetch.
    /// Otherwise the upstream is queried; a non-empty result replaces the
    /// persisted record, an empty result is returned as-is so stale data is
    /// never overwritten with nothing.
    pub async fn get_day_schedule(&self, day: ScheduleDay) -> Value {
        match self.repository.find_by_day(day).await {
            Ok(Some(record)) if record.age() < self.max_record_age => {
                return json!({ "data": record.entries });
            }
            Ok(_) => {}
            Err(e) => {
                // Store trouble degrades to a cache miss, never to an error
                log_warn!("Schedule lookup failed for {}: {}", day, e);
            }
        }

        let endpoint = self.endpoints.day_schedule(day);
        let payload = self
            .fetch_client
            .fetch(&endpoint.cache_key, &endpoint.url, self.dedup_ttl)
            .await;

        let entries: Vec<Value> = payload
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if entries.is_empty() {
            return json!({ "data": [] });
        }

        if let Err(e) = self.repository.upsert(day, entries.clone()).await {
            log_warn!("Failed to persist {} schedule: {}", day, e);
        }

        json!({ "data": entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::provider::{
        RateLimiter, ResponseCache, RetryPolicy, Transport, TransportReply,
    };
    use crate::modules::schedule::repository::{
        InMemoryScheduleRepository, MockScheduleRepository,
    };
    use crate::shared::errors::{AppError, AppResult};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingTransport {
        body: String,
        calls: AtomicUsize,
    }

    impl CountingTransport {
        fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn get(&self, _url: &str, _timeout: Duration) -> AppResult<TransportReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TransportReply {
                status: 200,
                body: self.body.clone(),
            })
        }
    }

    fn fetch_client(transport: Arc<CountingTransport>) -> Arc<FetchClient> {
        Arc::new(FetchClient::new(
            transport,
            Arc::new(ResponseCache::default()),
            Arc::new(RateLimiter::new(3, Duration::from_millis(0))),
            RetryPolicy::jikan(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_record_is_served_without_fetching() {
        let repo = Arc::new(InMemoryScheduleRepository::new());
        repo.insert_with_timestamp(
            ScheduleDay::Monday,
            vec![json!({"mal_id": 10})],
            Utc::now() - chrono::Duration::hours(23),
        );

        let transport = Arc::new(CountingTransport::new(r#"{"data": [{"mal_id": 99}]}"#));
        let store = ScheduleStore::new(repo, fetch_client(transport.clone()));

        let payload = store.get_day_schedule(ScheduleDay::Monday).await;

        assert_eq!(payload, json!({"data": [{"mal_id": 10}]}));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_record_triggers_a_refresh() {
        let repo = Arc::new(InMemoryScheduleRepository::new());
        repo.insert_with_timestamp(
            ScheduleDay::Monday,
            vec![json!({"mal_id": 10})],
            Utc::now() - chrono::Duration::hours(25),
        );

        let transport = Arc::new(CountingTransport::new(r#"{"data": [{"mal_id": 99}]}"#));
        let store = ScheduleStore::new(repo.clone(), fetch_client(transport.clone()));

        let payload = store.get_day_schedule(ScheduleDay::Monday).await;

        assert_eq!(payload, json!({"data": [{"mal_id": 99}]}));
        assert_eq!(transport.call_count(), 1);

        // The persisted record was replaced and its timestamp renewed
        let record = repo
            .find_by_day(ScheduleDay::Monday)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.entries, vec![json!({"mal_id": 99})]);
        assert!(record.age() < chrono::Duration::minutes(1));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_fetch_never_clobbers_stale_data() {
        let repo = Arc::new(InMemoryScheduleRepository::new());
        repo.insert_with_timestamp(
            ScheduleDay::Friday,
            vec![json!({"mal_id": 10})],
            Utc::now() - chrono::Duration::hours(30),
        );

        let transport = Arc::new(CountingTransport::new(r#"{"data": []}"#));
        let store = ScheduleStore::new(repo.clone(), fetch_client(transport));

        let payload = store.get_day_schedule(ScheduleDay::Friday).await;

        assert_eq!(payload, json!({"data": []}));
        let record = repo
            .find_by_day(ScheduleDay::Friday)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.entries, vec![json!({"mal_id": 10})]);
    }

    #[tokio::test(start_paused = true)]
    async fn repository_failure_degrades_to_a_fetch() {
        let mut repo = MockScheduleRepository::new();
        repo.expect_find_by_day()
            .returning(|_| Err(AppError::StorageError("store unavailable".to_string())));
        repo.expect_upsert()
            .returning(|_, _| Err(AppError::StorageError("store unavailable".to_string())));

        let transport = Arc::new(CountingTransport::new(r#"{"data": [{"mal_id": 7}]}"#));
        let store = ScheduleStore::new(Arc::new(repo), fetch_client(transport.clone()));

        let payload = store.get_day_schedule(ScheduleDay::Sunday).await;

        assert_eq!(payload, json!({"data": [{"mal_id": 7}]}));
        assert_eq!(transport.call_count(), 1);
    }
}
