//! Tracker use-case service.
//!
//! # Responsibility
//! - Provide the entry points an HTTP layer calls for registration, habit
//!   management, completion toggling and the monthly dashboard.
//! - Enforce the rules the repositories leave to callers.
//!
//! # Invariants
//! - Emails are stored trimmed and lowercased; one user per email.
//! - Habit names are trimmed, non-empty and at most `HABIT_NAME_MAX_CHARS`.
//! - A user can only touch habits (and their logs) that they own.
//! - Completion dates are well-formed `YYYY-MM-DD` calendar dates.

use crate::model::daily_log::DailyLog;
use crate::model::habit::{Habit, HabitFields, HabitId, FIELD_NAME};
use crate::model::month::MonthRange;
use crate::model::user::{User, UserId};
use crate::repo::habit_repo::HabitRepository;
use crate::repo::log_repo::DailyLogRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::service::dashboard::{summarize_month, MonthlyMetrics};
use chrono::NaiveDate;
use log::info;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Longest accepted habit name, in characters.
pub const HABIT_NAME_MAX_CHARS: usize = 25;

/// Service error for tracker use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Email is empty or has no `@`.
    InvalidEmail(String),
    /// Password is empty.
    EmptyPassword,
    /// Another user already registered this email.
    EmailTaken(String),
    /// Habit name breaks the naming rules.
    InvalidHabitName(String),
    /// Date is not a `YYYY-MM-DD` calendar date.
    InvalidDate(String),
    /// Month outside `1..=12` or year outside four digits.
    InvalidMonth { year: i32, month: u32 },
    /// Target user does not exist.
    UserNotFound(UserId),
    /// Target habit does not exist, is owned by someone else, or an update
    /// changed nothing.
    HabitNotFound(HabitId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::EmptyPassword => write!(f, "password cannot be empty"),
            Self::EmailTaken(value) => write!(f, "email already registered: `{value}`"),
            Self::InvalidHabitName(reason) => write!(f, "invalid habit name: {reason}"),
            Self::InvalidDate(value) => write!(f, "invalid date `{value}`; expected YYYY-MM-DD"),
            Self::InvalidMonth { year, month } => write!(f, "invalid month {year}-{month}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use-case facade over the three tracker repositories.
pub struct TrackerService<U, H, L> {
    users: U,
    habits: H,
    logs: L,
}

impl<U, H, L> TrackerService<U, H, L>
where
    U: UserRepository,
    H: HabitRepository,
    L: DailyLogRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(users: U, habits: H, logs: L) -> Self {
        Self {
            users,
            habits,
            logs,
        }
    }

    /// Registers a new account.
    ///
    /// `password` is stored as given; hash it before calling.
    ///
    /// # Errors
    /// - `InvalidEmail` / `EmptyPassword` for unusable input.
    /// - `EmailTaken` when the normalized email already exists.
    pub fn register_user(&self, email: &str, password: &str) -> ServiceResult<User> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(ServiceError::EmptyPassword);
        }
        if self.users.find_user_by_email(&email)?.is_some() {
            return Err(ServiceError::EmailTaken(email));
        }

        let user = self.users.add_user(User::new(email, password))?;
        info!(
            "event=user_register module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Looks up an account by email using the registration normalization.
    pub fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let email = normalize_email(email)?;
        Ok(self.users.find_user_by_email(&email)?)
    }

    /// Creates a habit for an existing user.
    pub fn create_habit(
        &self,
        user_id: &str,
        name: &str,
        fields: HabitFields,
    ) -> ServiceResult<Habit> {
        let name = normalize_habit_name(name)?;
        self.require_user(user_id)?;

        let mut habit = Habit::new(user_id, name);
        habit.fields = fields;
        Ok(self.habits.add_habit(habit)?)
    }

    /// Lists the habits owned by `user_id`.
    pub fn user_habits(&self, user_id: &str) -> ServiceResult<Vec<Habit>> {
        Ok(self.habits.list_user_habits(user_id)?)
    }

    /// Applies a partial update to a habit owned by `user_id`.
    ///
    /// An update that changes nothing reports `HabitNotFound`, the same as
    /// the persistence layer's zero-modified answer.
    pub fn update_habit(
        &self,
        user_id: &str,
        habit_id: &str,
        mut updates: HabitFields,
    ) -> ServiceResult<Habit> {
        if let Some(value) = updates.get_mut(FIELD_NAME) {
            let Value::String(raw) = value else {
                return Err(ServiceError::InvalidHabitName(
                    "name must be a string".to_string(),
                ));
            };
            *value = Value::String(normalize_habit_name(raw)?);
        }
        self.require_owned_habit(user_id, habit_id)?;

        self.habits
            .update_habit(habit_id, &updates)?
            .ok_or_else(|| ServiceError::HabitNotFound(habit_id.to_string()))
    }

    /// Renames a habit owned by `user_id`.
    pub fn rename_habit(&self, user_id: &str, habit_id: &str, name: &str) -> ServiceResult<Habit> {
        let mut updates = HabitFields::new();
        updates.insert(FIELD_NAME.to_string(), Value::String(name.to_string()));
        self.update_habit(user_id, habit_id, updates)
    }

    /// Deletes a habit owned by `user_id` together with its logs.
    pub fn delete_habit(&self, user_id: &str, habit_id: &str) -> ServiceResult<()> {
        self.require_owned_habit(user_id, habit_id)?;
        Ok(self.habits.delete_habit(habit_id)?)
    }

    /// Records the completion state of a habit on `date`.
    pub fn set_completion(
        &self,
        user_id: &str,
        habit_id: &str,
        date: &str,
        completed: bool,
    ) -> ServiceResult<DailyLog> {
        validate_date(date)?;
        self.require_owned_habit(user_id, habit_id)?;
        Ok(self.logs.upsert_log(user_id, habit_id, date, completed)?)
    }

    /// Flips the completion state of a habit on `date`.
    ///
    /// A day without a record counts as not completed.
    pub fn toggle_completion(
        &self,
        user_id: &str,
        habit_id: &str,
        date: &str,
    ) -> ServiceResult<DailyLog> {
        validate_date(date)?;
        self.require_owned_habit(user_id, habit_id)?;
        let completed = self
            .logs
            .find_log(user_id, habit_id, date)?
            .is_some_and(|log| log.completed);
        Ok(self.logs.upsert_log(user_id, habit_id, date, !completed)?)
    }

    /// Lists the logs of `user_id` for one month.
    pub fn month_logs(&self, user_id: &str, year: i32, month: u32) -> ServiceResult<Vec<DailyLog>> {
        MonthRange::new(year, month).ok_or(ServiceError::InvalidMonth { year, month })?;
        Ok(self.logs.user_logs_for_month(user_id, year, month)?)
    }

    /// Builds the dashboard summary of `user_id` for one month.
    pub fn monthly_metrics(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> ServiceResult<MonthlyMetrics> {
        let range = MonthRange::new(year, month).ok_or(ServiceError::InvalidMonth { year, month })?;
        let habits = self.habits.list_user_habits(user_id)?;
        let logs = self.logs.user_logs_for_month(user_id, year, month)?;
        Ok(summarize_month(&range, &habits, &logs))
    }

    fn require_user(&self, user_id: &str) -> ServiceResult<User> {
        self.users
            .find_user_by_id(user_id)?
            .ok_or_else(|| ServiceError::UserNotFound(user_id.to_string()))
    }

    fn require_owned_habit(&self, user_id: &str, habit_id: &str) -> ServiceResult<Habit> {
        self.habits
            .find_habit(habit_id)?
            .filter(|habit| habit.user_id == user_id)
            .ok_or_else(|| ServiceError::HabitNotFound(habit_id.to_string()))
    }
}

/// Trims and lowercases an email, rejecting obviously unusable values.
pub fn normalize_email(email: &str) -> ServiceResult<String> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return Err(ServiceError::InvalidEmail(email.to_string()));
    }
    Ok(normalized)
}

/// Trims a habit name and checks it against the naming rules.
pub fn normalize_habit_name(name: &str) -> ServiceResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidHabitName(
            "habit name cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > HABIT_NAME_MAX_CHARS {
        return Err(ServiceError::InvalidHabitName(format!(
            "habit name must be {HABIT_NAME_MAX_CHARS} characters or less"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_date(date: &str) -> ServiceResult<()> {
    // `%Y-%m-%d` alone would accept `2024-3-5`; require the padded width.
    let well_formed = date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(ServiceError::InvalidDate(date.to_string()))
    }
}
