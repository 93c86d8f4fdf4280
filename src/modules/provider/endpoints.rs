//! URL and cache-key catalog for the Jikan v4 API.
//!
//! Every upstream endpoint the crate talks to is built here so cache keys
//! stay stable and reusable across callers.

use crate::modules::schedule::ScheduleDay;

pub const JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";

/// Page size used for the browse-style listings.
const LISTING_LIMIT: u32 = 24;

/// A resolvable upstream request: where to GET and under which key to cache.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub cache_key: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct JikanEndpoints {
    base_url: String,
}

impl JikanEndpoints {
    pub fn new() -> Self {
        Self {
            base_url: JIKAN_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Currently airing season listing.
    pub fn seasonal_now(&self) -> Endpoint {
        Endpoint {
            cache_key: "airing_now".to_string(),
            url: format!("{}/seasons/now?limit={}", self.base_url, LISTING_LIMIT),
        }
    }

    /// Top-rated listing.
    pub fn top_anime(&self) -> Endpoint {
        Endpoint {
            cache_key: "top_anime".to_string(),
            url: format!("{}/top/anime?limit={}", self.base_url, LISTING_LIMIT),
        }
    }

    /// Popularity-ranked listing.
    pub fn popular_anime(&self) -> Endpoint {
        Endpoint {
            cache_key: "popular_anime".to_string(),
            url: format!(
                "{}/top/anime?filter=bypopularity&limit={}",
                self.base_url, LISTING_LIMIT
            ),
        }
    }

    /// Top movie listing.
    pub fn top_movies(&self) -> Endpoint {
        Endpoint {
            cache_key: "anime_movie".to_string(),
            url: format!("{}/top/anime?type=movie&limit={}", self.base_url, LISTING_LIMIT),
        }
    }

    /// Genre catalog.
    pub fn genres(&self) -> Endpoint {
        Endpoint {
            cache_key: "genre_list".to_string(),
            url: format!("{}/genres/anime", self.base_url),
        }
    }

    /// Full per-anime detail, including genre metadata.
    pub fn anime_detail(&self, anime_id: i64) -> Endpoint {
        Endpoint {
            cache_key: format!("anime_detail_{}", anime_id),
            url: format!("{}/anime/{}/full", self.base_url, anime_id),
        }
    }

    /// Per-anime recommendation list. Keyed per anime so seed fetches are
    /// independently cacheable and reusable across users.
    pub fn anime_recommendations(&self, anime_id: i64) -> Endpoint {
        Endpoint {
            cache_key: format!("anime_recs_{}", anime_id),
            url: format!("{}/anime/{}/recommendations", self.base_url, anime_id),
        }
    }

    /// Release schedule filtered to a single weekday.
    pub fn day_schedule(&self, day: ScheduleDay) -> Endpoint {
        Endpoint {
            cache_key: format!("schedule_{}", day.as_str()),
            url: format!("{}/schedules?filter={}", self.base_url, day.as_str()),
        }
    }
}

impl Default for JikanEndpoints {
    fn default() -> Self {
        Self::new()
    }
}
