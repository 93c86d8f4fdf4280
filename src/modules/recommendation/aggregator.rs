//! Personalized recommendations aggregated from a user's own tracked list.
//!
//! The user's highest-rated completed/watching entries become seeds; each
//! seed's upstream recommendation list is fetched concurrently, and the
//! candidates are merged under a capped vote weight so no single
//! highly-voted candidate can dominate the ranking.

use super::config::RecommendationConfig;
use crate::log_debug;
use crate::modules::provider::{Endpoint, FetchClient, JikanEndpoints};
use crate::modules::watchlist::WatchEntry;
use futures::future;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One recommended anime with a human-readable justification.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub anime: Value,
    pub context: String,
}

/// Aggregation accumulator for a single candidate, alive for one call.
#[derive(Debug)]
struct CandidateScore {
    weight: f64,
    summary: Value,
    sources: Vec<String>,
    first_seen: usize,
}

impl CandidateScore {
    fn new(first_seen: usize) -> Self {
        Self {
            weight: 0.0,
            summary: Value::Null,
            sources: Vec::new(),
            first_seen,
        }
    }
}

pub struct RecommendationAggregator {
    fetch_client: Arc<FetchClient>,
    endpoints: JikanEndpoints,
    config: RecommendationConfig,
}

impl RecommendationAggregator {
    pub fn new(fetch_client: Arc<FetchClient>) -> Self {
        Self::with_config(fetch_client, RecommendationConfig::default())
    }

    pub fn with_config(fetch_client: Arc<FetchClient>, config: RecommendationConfig) -> Self {
        Self {
            fetch_client,
            endpoints: JikanEndpoints::new(),
            config,
        }
    }

    pub fn with_endpoints(mut self, endpoints: JikanEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Produce up to `limit` recommendations from the user's tracked entries.
    ///
    /// Returns `(fallback, recommendations)`: when the list is empty or has
    /// no usable seeds, a generic listing payload is returned instead of
    /// personalized results.
    pub async fn recommend(
        &self,
        entries: &[WatchEntry],
        limit: usize,
    ) -> (Option<Value>, Vec<Recommendation>) {
        if entries.is_empty() {
            let fallback = self.fetch_listing(self.endpoints.popular_anime()).await;
            return (Some(fallback), Vec::new());
        }

        let owned: HashSet<i64> = entries.iter().map(|e| e.anime_id).collect();
        let seeds = self.select_seeds(entries);
        if seeds.is_empty() {
            let fallback = self.fetch_listing(self.endpoints.top_anime()).await;
            return (Some(fallback), Vec::new());
        }

        log_debug!("Aggregating recommendations from {} seeds", seeds.len());

        // One rate-limited, independently cacheable fetch per seed, issued
        // concurrently so latency tracks the slowest call, not the sum
        let fetches = seeds.iter().map(|seed| {
            let endpoint = self.endpoints.anime_recommendations(seed.anime_id);
            async move {
                self.fetch_client
                    .fetch(
                        &endpoint.cache_key,
                        &endpoint.url,
                        self.config.recommendations_ttl,
                    )
                    .await
            }
        });
        let results = future::join_all(fetches).await;

        let mut candidates: HashMap<i64, CandidateScore> = HashMap::new();
        for (seed, payload) in seeds.iter().zip(results.iter()) {
            self.accumulate(&mut candidates, seed, payload, &owned);
        }

        let mut ranked: Vec<CandidateScore> = candidates.into_values().collect();
        ranked.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(Ordering::Equal)
                .then(a.first_seen.cmp(&b.first_seen))
        });
        ranked.truncate(limit);

        let recommendations = ranked
            .into_iter()
            .map(|candidate| Recommendation {
                context: Self::describe_sources(&candidate.sources),
                anime: candidate.summary,
            })
            .collect();

        (None, recommendations)
    }

    async fn fetch_listing(&self, endpoint: Endpoint) -> Value {
        self.fetch_client
            .fetch(&endpoint.cache_key, &endpoint.url, self.config.fallback_ttl)
            .await
    }

    /// Seed selection: scored completed/watching entries sorted by score
    /// descending; if none are scored, completed/watching entries in the
    /// insertion order of the underlying list.
    fn select_seeds<'a>(&self, entries: &'a [WatchEntry]) -> Vec<&'a WatchEntry> {
        let mut scored: Vec<&WatchEntry> = entries
            .iter()
            .filter(|e| e.status.counts_for_seeding() && e.has_score())
            .collect();

        if scored.is_empty() {
            return entries
                .iter()
                .filter(|e| e.status.counts_for_seeding())
                .take(self.config.max_seeds)
                .collect();
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(self.config.max_seeds);
        scored
    }

    /// Merge one seed's upstream candidates into the accumulator map.
    fn accumulate(
        &self,
        candidates: &mut HashMap<i64, CandidateScore>,
        seed: &WatchEntry,
        payload: &Value,
        owned: &HashSet<i64>,
    ) {
        let Some(items) = payload.get("data").and_then(Value::as_array) else {
            return;
        };

        for item in items.iter().take(self.config.candidates_per_seed) {
            let summary = item.get("entry").unwrap_or(item);
            let Some(mal_id) = summary.get("mal_id").and_then(Value::as_i64) else {
                continue;
            };
            if owned.contains(&mal_id) {
                continue;
            }

            let votes = item.get("votes").and_then(Value::as_f64).unwrap_or(1.0);
            let weight =
                (votes / self.config.vote_divisor).min(self.config.vote_weight_cap)
                    + self.config.base_weight;

            let first_seen = candidates.len();
            let candidate = candidates
                .entry(mal_id)
                .or_insert_with(|| CandidateScore::new(first_seen));
            candidate.weight += weight;
            candidate.summary = summary.clone();
            if !candidate.sources.iter().any(|title| title == &seed.title) {
                candidate.sources.push(seed.title.clone());
            }
        }
    }

    /// "Because you liked A", "... A and B", or "... A, B, and more".
    fn describe_sources(sources: &[String]) -> String {
        if sources.len() > 2 {
            format!("Because you liked {}, {}, and more", sources[0], sources[1])
        } else {
            format!("Because you liked {}", sources.join(" and "))
        }
    }
}
