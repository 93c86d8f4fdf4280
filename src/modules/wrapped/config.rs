use std::time::Duration;

/// Tuning values for the "year in review" aggregation.
#[derive(Debug, Clone)]
pub struct WrappedConfig {
    /// Fixed per-episode runtime convention used for the days-spent estimate
    pub minutes_per_episode: u32,

    /// Size of the top-anime ranking
    pub top_anime_count: usize,

    /// Number of genres reported in the genre profile
    pub top_genre_count: usize,

    /// How many entries (in original order) feed the genre profile; bounds
    /// upstream detail-fetch cost
    pub genre_sample_size: usize,

    /// Freshness window for per-anime detail fetches; genre metadata is
    /// near-static
    pub detail_ttl: Duration,
}

impl WrappedConfig {
    pub fn new() -> Self {
        Self {
            minutes_per_episode: 24,
            top_anime_count: 5,
            top_genre_count: 3,
            genre_sample_size: 20,
            detail_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

impl Default for WrappedConfig {
    fn default() -> Self {
        Self::new()
    }
}
