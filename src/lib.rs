pub mod modules;
pub mod shared;

// Re-exports for easy external access - only export what embedders actually need
pub use modules::provider::{FetchClient, JikanEndpoints, RateLimiter, ResponseCache, RetryPolicy};
pub use modules::recommendation::{Recommendation, RecommendationAggregator, RecommendationConfig};
pub use modules::schedule::{ScheduleDay, ScheduleStore};
pub use modules::watchlist::{UserInsightsService, WatchEntry, WatchStatus};
pub use modules::wrapped::{WrappedStatsAggregator, YearStats};
