use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tracking state of one anime on a user's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    Completed,
    Watching,
    OnHold,
    Dropped,
    PlanToWatch,
}

impl WatchStatus {
    /// Only entries the user actually engaged with can seed recommendations.
    pub fn counts_for_seeding(&self) -> bool {
        matches!(self, Self::Completed | Self::Watching)
    }
}

/// One tracked anime from the user's watch history.
///
/// `score` follows the upstream convention where 0 means "unset".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchEntry {
    pub anime_id: i64,
    pub title: String,
    pub score: f32,
    pub status: WatchStatus,
    pub episodes_watched: u32,
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl WatchEntry {
    pub fn has_score(&self) -> bool {
        self.score > 0.0
    }
}
