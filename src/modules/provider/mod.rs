pub mod cache;
pub mod endpoints;
pub mod fetch_client;
pub mod rate_limiter;
pub mod retry;
pub mod transport;

// Re-exports for easy external access
pub use cache::{CacheStats, ResponseCache};
pub use endpoints::{Endpoint, JikanEndpoints};
pub use fetch_client::FetchClient;
pub use rate_limiter::{RateLimiter, RateLimiterPermit};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, Transport, TransportReply};
