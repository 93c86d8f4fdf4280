//! Cache-first, rate-limited fetch pipeline for the upstream catalog API.
//!
//! Resolves a (cache key, URL, freshness window, retry budget) tuple to a
//! JSON payload. Failures never propagate to callers: every failure path
//! terminates in the `{"data": []}` sentinel so aggregators can treat
//! "no data" as a normal input.

use super::cache::ResponseCache;
use super::rate_limiter::RateLimiter;
use super::retry::RetryPolicy;
use super::transport::{HttpTransport, Transport};
use crate::shared::errors::AppResult;
use log::warn;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

pub struct FetchClient {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
    rate_limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl FetchClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        cache: Arc<ResponseCache>,
        rate_limiter: Arc<RateLimiter>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            cache,
            rate_limiter,
            policy,
        }
    }

    /// Production client against Jikan: real HTTP transport, shared cache,
    /// one limiter per client instance.
    pub fn for_jikan() -> AppResult<Self> {
        Ok(Self::new(
            Arc::new(HttpTransport::new()?),
            Arc::new(ResponseCache::default()),
            Arc::new(RateLimiter::for_jikan()),
            RetryPolicy::jikan(),
        ))
    }

    /// Empty-result sentinel returned on every failure path.
    pub fn empty_payload() -> Value {
        json!({ "data": [] })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch with the policy's default retry budget.
    pub async fn fetch(&self, key: &str, url: &str, ttl: Duration) -> Value {
        self.fetch_with_retries(key, url, ttl, self.policy.max_retries)
            .await
    }

    /// Cache-first fetch. A fresh cache entry short-circuits before the rate
    /// limiter is touched; otherwise the limiter slot is held for the whole
    /// attempt loop and released on every exit path.
    pub async fn fetch_with_retries(
        &self,
        key: &str,
        url: &str,
        ttl: Duration,
        retries: u32,
    ) -> Value {
        if let Some(cached) = self.cache.get(key) {
            return cached;
        }

        let permit = self.rate_limiter.acquire().await;
        let result = self.attempt_loop(key, url, ttl, retries).await;
        drop(permit);

        result.unwrap_or_else(Self::empty_payload)
    }

    async fn attempt_loop(
        &self,
        key: &str,
        url: &str,
        ttl: Duration,
        retries: u32,
    ) -> Option<Value> {
        for attempt in 0..=retries {
            let reply = match self.transport.get(url, self.policy.request_timeout).await {
                Ok(reply) => reply,
                Err(e) => {
                    // Transport-level failures are not worth retrying
                    warn!("Connection error for {}: {}", url, e);
                    return None;
                }
            };

            match reply.status {
                200 => match serde_json::from_str::<Value>(&reply.body) {
                    Ok(payload) => {
                        self.cache.set(key, payload.clone(), ttl);
                        return Some(payload);
                    }
                    Err(e) => {
                        warn!("Malformed payload from {}: {}", url, e);
                        return None;
                    }
                },
                429 => {
                    if attempt >= retries {
                        break;
                    }
                    let delay = self.policy.rate_limit_delay(attempt);
                    warn!(
                        "Rate limited on {} (attempt {}/{}). Waiting {:?} before retry.",
                        url,
                        attempt + 1,
                        retries + 1,
                        delay
                    );
                    sleep(delay).await;
                }
                status if (500..600).contains(&status) => {
                    if attempt >= retries {
                        break;
                    }
                    warn!(
                        "Upstream error {} for {} (attempt {}/{}). Retrying in {:?}",
                        status,
                        url,
                        attempt + 1,
                        retries + 1,
                        self.policy.server_error_delay
                    );
                    sleep(self.policy.server_error_delay).await;
                }
                status => {
                    warn!("Error {} for {}", status, url);
                    return None;
                }
            }
        }

        warn!("Retries exhausted for {}", url);
        None
    }
}
