pub mod entry;
pub mod repository;
pub mod service;

pub use entry::{WatchEntry, WatchStatus};
pub use repository::{InMemoryWatchHistory, WatchHistoryRepository};
pub use service::UserInsightsService;
