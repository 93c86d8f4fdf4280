pub mod day;
pub mod repository;
pub mod store;

pub use day::ScheduleDay;
pub use repository::{InMemoryScheduleRepository, ScheduleRecord, ScheduleRepository};
pub use store::ScheduleStore;
