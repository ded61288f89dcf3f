//! Daily completion record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::habit::HabitId;
use super::user::UserId;

/// Completion state of one habit on one day.
///
/// At most one record exists per `(user_id, habit_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLog {
    pub user_id: UserId,
    pub habit_id: HabitId,
    /// ISO `YYYY-MM-DD`, stored as given.
    pub date: String,
    pub completed: bool,
    /// Time of the last write, UTC.
    pub updated_at: DateTime<Utc>,
}
