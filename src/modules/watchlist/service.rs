//! User-facing facade over the aggregation pipeline.
//!
//! Resolves a user id to tracked entries through the watch-history
//! repository and hands them to the recommendation and wrapped aggregators.

use super::repository::WatchHistoryRepository;
use crate::log_info;
use crate::modules::recommendation::{Recommendation, RecommendationAggregator};
use crate::modules::wrapped::{WrappedStatsAggregator, YearStats};
use crate::shared::errors::AppResult;
use serde_json::Value;
use std::sync::Arc;

pub struct UserInsightsService {
    watch_history: Arc<dyn WatchHistoryRepository>,
    recommendations: Arc<RecommendationAggregator>,
    wrapped: Arc<WrappedStatsAggregator>,
}

impl UserInsightsService {
    pub fn new(
        watch_history: Arc<dyn WatchHistoryRepository>,
        recommendations: Arc<RecommendationAggregator>,
        wrapped: Arc<WrappedStatsAggregator>,
    ) -> Self {
        Self {
            watch_history,
            recommendations,
            wrapped,
        }
    }

    /// Personalized recommendations, or a generic fallback listing when the
    /// user's history cannot seed any.
    pub async fn recommendations_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> AppResult<(Option<Value>, Vec<Recommendation>)> {
        let entries = self.watch_history.entries_for_user(user_id).await?;
        log_info!(
            "Building recommendations for user {} from {} tracked entries",
            user_id,
            entries.len()
        );
        Ok(self.recommendations.recommend(&entries, limit).await)
    }

    /// Yearly summary, or `None` when the user has no activity in that year.
    pub async fn wrapped_for_user(&self, user_id: &str, year: i32) -> AppResult<Option<YearStats>> {
        let entries = self.watch_history.entries_for_user(user_id).await?;
        Ok(self.wrapped.generate_wrapped(&entries, year).await)
    }
}
