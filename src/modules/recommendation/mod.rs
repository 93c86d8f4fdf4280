pub mod aggregator;
pub mod config;

pub use aggregator::{Recommendation, RecommendationAggregator};
pub use config::RecommendationConfig;
