pub mod provider;
pub mod recommendation;
pub mod schedule;
pub mod watchlist;
pub mod wrapped;
