//! Daily log repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Upsert completion records keyed by `(user_id, habit_id, date)`.
//! - Answer calendar-month queries per user or per habit.
//!
//! # Invariants
//! - At most one row exists per `(user_id, habit_id, date)`.
//! - `upsert_log` replaces every non-key column and stamps a fresh
//!   `updated_at`.
//! - Month queries use the half-open range `[YYYY-MM-01, next month)`, so
//!   unpadded dates such as `2024-3-01` never match.

use crate::model::daily_log::DailyLog;
use crate::model::month::MonthRange;
use crate::repo::{bool_to_int, ensure_connection_ready, RepoError, RepoResult, TableShape};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const DAILY_LOGS_SHAPE: TableShape = (
    "daily_logs",
    &["user_id", "habit_id", "date", "completed", "updated_at"],
);

const LOG_SELECT_SQL: &str = "SELECT user_id, habit_id, date, completed, updated_at FROM daily_logs";

/// Repository interface for daily completion records.
pub trait DailyLogRepository {
    /// Lists every log ordered by `date ASC, habit_id ASC`.
    fn list_logs(&self) -> RepoResult<Vec<DailyLog>>;
    /// Lists the logs of `user_id` dated inside `year`/`month`.
    ///
    /// An invalid month yields an empty list.
    fn user_logs_for_month(&self, user_id: &str, year: i32, month: u32)
        -> RepoResult<Vec<DailyLog>>;
    /// Lists the logs of `habit_id` dated inside `year`/`month`.
    ///
    /// An invalid month yields an empty list.
    fn habit_logs_for_month(
        &self,
        habit_id: &str,
        year: i32,
        month: u32,
    ) -> RepoResult<Vec<DailyLog>>;
    fn find_log(&self, user_id: &str, habit_id: &str, date: &str) -> RepoResult<Option<DailyLog>>;
    /// Writes the record for the triple, replacing any previous one.
    fn upsert_log(
        &self,
        user_id: &str,
        habit_id: &str,
        date: &str,
        completed: bool,
    ) -> RepoResult<DailyLog>;
}

/// SQLite-backed daily log repository.
pub struct SqliteDailyLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDailyLogRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[DAILY_LOGS_SHAPE])?;
        Ok(Self { conn })
    }

    fn query_logs(&self, filter: &str, bind_values: Vec<Value>) -> RepoResult<Vec<DailyLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LOG_SELECT_SQL} {filter} ORDER BY date ASC, habit_id ASC, user_id ASC;"
        ))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(parse_log_row(row)?);
        }
        Ok(logs)
    }

    fn logs_for_month(
        &self,
        owner_column: &str,
        owner: &str,
        year: i32,
        month: u32,
    ) -> RepoResult<Vec<DailyLog>> {
        let Some(range) = MonthRange::new(year, month) else {
            debug!("event=log_query module=repo status=empty reason=invalid_month year={year} month={month}");
            return Ok(Vec::new());
        };

        self.query_logs(
            &format!("WHERE {owner_column} = ?1 AND date >= ?2 AND date < ?3"),
            vec![
                Value::Text(owner.to_string()),
                Value::Text(range.start().to_string()),
                Value::Text(range.end().to_string()),
            ],
        )
    }
}

impl DailyLogRepository for SqliteDailyLogRepository<'_> {
    fn list_logs(&self) -> RepoResult<Vec<DailyLog>> {
        self.query_logs("", Vec::new())
    }

    fn user_logs_for_month(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> RepoResult<Vec<DailyLog>> {
        self.logs_for_month("user_id", user_id, year, month)
    }

    fn habit_logs_for_month(
        &self,
        habit_id: &str,
        year: i32,
        month: u32,
    ) -> RepoResult<Vec<DailyLog>> {
        self.logs_for_month("habit_id", habit_id, year, month)
    }

    fn find_log(&self, user_id: &str, habit_id: &str, date: &str) -> RepoResult<Option<DailyLog>> {
        let mut logs = self.query_logs(
            "WHERE user_id = ?1 AND habit_id = ?2 AND date = ?3",
            vec![
                Value::Text(user_id.to_string()),
                Value::Text(habit_id.to_string()),
                Value::Text(date.to_string()),
            ],
        )?;
        Ok(logs.pop())
    }

    fn upsert_log(
        &self,
        user_id: &str,
        habit_id: &str,
        date: &str,
        completed: bool,
    ) -> RepoResult<DailyLog> {
        // Stored with microsecond precision; truncate so the returned record
        // equals what a later read yields.
        let updated_at = Utc::now().trunc_subsecs(6);

        self.conn.execute(
            "INSERT INTO daily_logs (user_id, habit_id, date, completed, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (user_id, habit_id, date) DO UPDATE SET
                completed = excluded.completed,
                updated_at = excluded.updated_at;",
            params![
                user_id,
                habit_id,
                date,
                bool_to_int(completed),
                format_timestamp(updated_at),
            ],
        )?;

        debug!(
            "event=log_upsert module=repo status=ok user_id={user_id} habit_id={habit_id} date={date} completed={completed}"
        );
        Ok(DailyLog {
            user_id: user_id.to_string(),
            habit_id: habit_id.to_string(),
            date: date.to_string(),
            completed,
            updated_at,
        })
    }
}

fn parse_log_row(row: &Row<'_>) -> RepoResult<DailyLog> {
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in daily_logs.completed"
            )));
        }
    };

    let updated_at_text: String = row.get("updated_at")?;
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_text)
        .map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{updated_at_text}` in daily_logs.updated_at"
            ))
        })?
        .with_timezone(&Utc);

    Ok(DailyLog {
        user_id: row.get("user_id")?,
        habit_id: row.get("habit_id")?,
        date: row.get("date")?,
        completed,
        updated_at,
    })
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}
