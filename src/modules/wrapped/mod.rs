pub mod aggregator;
pub mod config;

pub use aggregator::{GenreCount, WrappedStatsAggregator, YearStats};
pub use config::WrappedConfig;
