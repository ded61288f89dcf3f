//! Core persistence and use-case logic for the TaskTraQ habit tracker.
//!
//! The store is a single SQLite connection opened through [`db::open_db`]
//! (or [`db::open_db_in_memory`] for tests) and borrowed by every
//! repository. There is no process-wide client.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::daily_log::DailyLog;
pub use model::habit::{Habit, HabitFields, HabitId};
pub use model::month::MonthRange;
pub use model::user::{User, UserId};
pub use repo::habit_repo::{HabitRepository, SqliteHabitRepository};
pub use repo::log_repo::{DailyLogRepository, SqliteDailyLogRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::dashboard::{summarize_month, HabitSummary, MonthlyMetrics};
pub use service::tracker_service::{ServiceError, ServiceResult, TrackerService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
