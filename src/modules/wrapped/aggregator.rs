//! "Year in review" statistics over one user's watch history.
//!
//! Everything is recomputed fresh on every call; nothing here is persisted.
//! Genre data comes from concurrent per-anime detail fetches with a long
//! cache window, so repeat runs stay cheap.

use super::config::WrappedConfig;
use crate::modules::provider::{FetchClient, JikanEndpoints};
use crate::modules::watchlist::{WatchEntry, WatchStatus};
use chrono::Datelike;
use futures::future;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub name: String,
    pub count: u32,
}

/// Derived yearly summary; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct YearStats {
    pub year: i32,
    pub total_completed: usize,
    pub total_episodes: u64,
    pub average_score: f32,
    pub days_spent: f64,
    pub top_anime: Vec<WatchEntry>,
    pub top_genres: Vec<GenreCount>,
}

pub struct WrappedStatsAggregator {
    fetch_client: Arc<FetchClient>,
    endpoints: JikanEndpoints,
    config: WrappedConfig,
}

impl WrappedStatsAggregator {
    pub fn new(fetch_client: Arc<FetchClient>) -> Self {
        Self::with_config(fetch_client, WrappedConfig::default())
    }

    pub fn with_config(fetch_client: Arc<FetchClient>, config: WrappedConfig) -> Self {
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

    /// Compute the yearly summary from entries last updated in `year`.
    /// Returns `None` when nothing matches the year: "no data" is a
    /// distinguished absent result, not an empty stats object.
    pub async fn generate_wrapped(&self, entries: &[WatchEntry], year: i32) -> Option<YearStats> {
        let year_entries: Vec<&WatchEntry> = entries
            .iter()
            .filter(|e| e.updated_at.year() == year)
            .collect();
        if year_entries.is_empty() {
            return None;
        }

        let mut total_episodes: u64 = 0;
        let mut total_completed = 0;
        let mut score_sum = 0.0f64;
        let mut scored_count = 0usize;

        for entry in &year_entries {
            total_episodes += u64::from(entry.episodes_watched);
            if entry.status == WatchStatus::Completed {
                total_completed += 1;
            }
            if entry.has_score() {
                score_sum += f64::from(entry.score);
                scored_count += 1;
            }
        }

        let average_score = if scored_count > 0 {
            round_to_tenth(score_sum / scored_count as f64) as f32
        } else {
            0.0
        };

        let watched_minutes = total_episodes * u64::from(self.config.minutes_per_episode);
        let days_spent = round_to_tenth(watched_minutes as f64 / 1440.0);

        let top_anime = self.top_anime(&year_entries);
        let top_genres = self.genre_profile(&year_entries).await;

        Some(YearStats {
            year,
            total_completed,
            total_episodes,
            average_score,
            days_spent,
            top_anime,
            top_genres,
        })
    }

    /// Top entries by (score, episodes watched) descending among scored
    /// entries; if nothing is scored, by episodes watched alone.
    fn top_anime(&self, entries: &[&WatchEntry]) -> Vec<WatchEntry> {
        let mut scored: Vec<&WatchEntry> = entries
            .iter()
            .filter(|e| e.has_score())
            .copied()
            .collect();

        if scored.is_empty() {
            let mut by_episodes: Vec<&WatchEntry> = entries.to_vec();
            by_episodes.sort_by(|a, b| b.episodes_watched.cmp(&a.episodes_watched));
            return by_episodes
                .into_iter()
                .take(self.config.top_anime_count)
                .cloned()
                .collect();
        }

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(b.episodes_watched.cmp(&a.episodes_watched))
        });
        scored
            .into_iter()
            .take(self.config.top_anime_count)
            .cloned()
            .collect()
    }

    /// Count genre occurrences over the first N entries in original order,
    /// fetching each anime's detail concurrently.
    async fn genre_profile(&self, entries: &[&WatchEntry]) -> Vec<GenreCount> {
        let fetches = entries
            .iter()
            .take(self.config.genre_sample_size)
            .map(|entry| {
                let endpoint = self.endpoints.anime_detail(entry.anime_id);
                async move {
                    self.fetch_client
                        .fetch(&endpoint.cache_key, &endpoint.url, self.config.detail_ttl)
                        .await
                }
            });
        let payloads = future::join_all(fetches).await;

        let mut counts: HashMap<String, u32> = HashMap::new();
        for payload in &payloads {
            let Some(genres) = payload
                .get("data")
                .and_then(|data| data.get("genres"))
                .and_then(Value::as_array)
            else {
                continue;
            };
            for genre in genres {
                if let Some(name) = genre.get("name").and_then(Value::as_str) {
                    *counts.entry(name.to_string()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<GenreCount> = counts
            .into_iter()
            .map(|(name, count)| GenreCount { name, count })
            .collect();
        // Alphabetical tie-break keeps the profile deterministic
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.name.cmp(&b.name)));
        ranked.truncate(self.config.top_genre_count);
        ranked
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
