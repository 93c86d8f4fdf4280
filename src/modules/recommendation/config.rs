use std::time::Duration;

/// Configuration for the recommendation aggregator
///
/// Externalizes the product tuning values (seed counts, candidate caps,
/// weight formula constants) so they are adjustable and testable.
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Maximum number of seed anime taken from the user's list
    pub max_seeds: usize,

    /// Per-seed cap on upstream candidates considered (bounds fan-out cost)
    pub candidates_per_seed: usize,

    /// Votes are scaled down by this divisor before capping
    pub vote_divisor: f64,

    /// Ceiling on the vote-derived part of a candidate's weight
    pub vote_weight_cap: f64,

    /// Weight every surfaced candidate contributes regardless of votes
    pub base_weight: f64,

    /// Default size of the returned recommendation list
    pub default_limit: usize,

    /// Freshness window for per-seed recommendation fetches
    pub recommendations_ttl: Duration,

    /// Freshness window for the popularity/top-rated fallback listings
    pub fallback_ttl: Duration,
}

impl RecommendationConfig {
    /// Production defaults: a capped-vote weight of `min(votes/10, 5) + 1`
    /// over at most 5 seeds and 15 candidates per seed.
    pub fn new() -> Self {
        Self {
            max_seeds: 5,
            candidates_per_seed: 15,
            vote_divisor: 10.0,
            vote_weight_cap: 5.0,
            base_weight: 1.0,
            default_limit: 20,
            recommendations_ttl: Duration::from_secs(24 * 60 * 60),
            fallback_ttl: Duration::from_secs(300),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_seeds == 0 {
            return Err("max_seeds must be > 0".to_string());
        }
        if self.candidates_per_seed == 0 {
            return Err("candidates_per_seed must be > 0".to_string());
        }
        if self.vote_divisor <= 0.0 {
            return Err("vote_divisor must be positive".to_string());
        }
        if self.vote_weight_cap < 0.0 {
            return Err("vote_weight_cap must be non-negative".to_string());
        }
        if self.default_limit == 0 {
            return Err("default_limit must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self::new()
    }
}
