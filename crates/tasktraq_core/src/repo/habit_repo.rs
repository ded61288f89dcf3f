//! Habit repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Store habits as identity columns plus a JSON field document.
//! - Apply partial updates with field-merge (`$set`-like) semantics.
//! - Delete a habit together with all of its daily logs.
//!
//! # Invariants
//! - `update_habit` returns `None` both for a missing habit and for an update
//!   that leaves the stored document unchanged.
//! - `delete_habit` removes the habit row and its logs in one transaction;
//!   either both deletes land or neither does.

use crate::model::habit::{is_identity_field, Habit, HabitFields, FIELD_NAME};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult, TableShape};
use log::{debug, info};
use rusqlite::types::Value as SqlValue;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use serde_json::Value;

const HABITS_SHAPE: TableShape = ("habits", &["seq", "id", "user_id", "document"]);
const DAILY_LOGS_SHAPE: TableShape = ("daily_logs", &["habit_id"]);

const HABIT_SELECT_SQL: &str = "SELECT id, user_id, document FROM habits";

/// Repository interface for habit records.
pub trait HabitRepository {
    /// Lists every habit in insertion order.
    fn list_habits(&self) -> RepoResult<Vec<Habit>>;
    /// Persists `habit` and returns the stored form.
    fn add_habit(&self, habit: Habit) -> RepoResult<Habit>;
    /// Lists the habits owned by `user_id` in insertion order.
    fn list_user_habits(&self, user_id: &str) -> RepoResult<Vec<Habit>>;
    fn find_habit(&self, habit_id: &str) -> RepoResult<Option<Habit>>;
    /// Merges `updates` into the stored habit document.
    ///
    /// Returns the updated habit only when the stored document changed.
    fn update_habit(&self, habit_id: &str, updates: &HabitFields) -> RepoResult<Option<Habit>>;
    /// Deletes the habit and every daily log that references it.
    fn delete_habit(&self, habit_id: &str) -> RepoResult<()>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[HABITS_SHAPE, DAILY_LOGS_SHAPE])?;
        Ok(Self { conn })
    }

    fn query_habits(&self, sql: &str, bind_values: Vec<SqlValue>) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn begin_immediate(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn list_habits(&self) -> RepoResult<Vec<Habit>> {
        self.query_habits(&format!("{HABIT_SELECT_SQL} ORDER BY seq ASC;"), Vec::new())
    }

    fn add_habit(&self, habit: Habit) -> RepoResult<Habit> {
        let document = habit.to_document();
        self.conn.execute(
            "INSERT INTO habits (id, user_id, document) VALUES (?1, ?2, ?3);",
            params![
                habit.id.as_str(),
                habit.user_id.as_str(),
                encode_document(&document)?,
            ],
        )?;

        Habit::from_document(habit.id, habit.user_id, document).map_err(RepoError::InvalidData)
    }

    fn list_user_habits(&self, user_id: &str) -> RepoResult<Vec<Habit>> {
        self.query_habits(
            &format!("{HABIT_SELECT_SQL} WHERE user_id = ?1 ORDER BY seq ASC;"),
            vec![SqlValue::Text(user_id.to_string())],
        )
    }

    fn find_habit(&self, habit_id: &str) -> RepoResult<Option<Habit>> {
        let mut habits = self.query_habits(
            &format!("{HABIT_SELECT_SQL} WHERE id = ?1;"),
            vec![SqlValue::Text(habit_id.to_string())],
        )?;
        Ok(habits.pop())
    }

    fn update_habit(&self, habit_id: &str, updates: &HabitFields) -> RepoResult<Option<Habit>> {
        validate_updates(updates)?;

        let tx = self.begin_immediate()?;
        let stored = tx
            .query_row(
                "SELECT user_id, document FROM habits WHERE id = ?1;",
                [habit_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        let Some((user_id, document_text)) = stored else {
            return Ok(None);
        };

        let current = decode_document(&document_text)?;
        let mut merged = current.clone();
        for (key, value) in updates {
            merged.insert(key.clone(), value.clone());
        }
        if merged == current {
            debug!("event=habit_update module=repo status=unchanged habit_id={habit_id}");
            return Ok(None);
        }

        tx.execute(
            "UPDATE habits SET document = ?2 WHERE id = ?1;",
            params![habit_id, encode_document(&merged)?],
        )?;
        tx.commit()?;

        Habit::from_document(habit_id, user_id, merged)
            .map(Some)
            .map_err(RepoError::InvalidData)
    }

    fn delete_habit(&self, habit_id: &str) -> RepoResult<()> {
        let tx = self.begin_immediate()?;
        let habits_removed = tx.execute("DELETE FROM habits WHERE id = ?1;", [habit_id])?;
        let logs_removed = tx.execute("DELETE FROM daily_logs WHERE habit_id = ?1;", [habit_id])?;
        tx.commit()?;

        info!(
            "event=habit_delete module=repo status=ok habit_id={habit_id} habits_removed={habits_removed} logs_removed={logs_removed}"
        );
        Ok(())
    }
}

fn validate_updates(updates: &HabitFields) -> RepoResult<()> {
    if let Some(key) = updates.keys().find(|key| is_identity_field(key)) {
        return Err(RepoError::InvalidUpdate(format!(
            "`{key}` is an identity field and cannot be updated"
        )));
    }
    match updates.get(FIELD_NAME) {
        Some(Value::String(_)) | None => Ok(()),
        Some(other) => Err(RepoError::InvalidUpdate(format!(
            "`{FIELD_NAME}` must be a string, got `{other}`"
        ))),
    }
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let id: String = row.get("id")?;
    let user_id: String = row.get("user_id")?;
    let document_text: String = row.get("document")?;
    let document = decode_document(&document_text)?;
    Habit::from_document(id.as_str(), user_id, document)
        .map_err(|message| RepoError::InvalidData(format!("habit `{id}`: {message}")))
}

fn encode_document(document: &HabitFields) -> RepoResult<String> {
    serde_json::to_string(document)
        .map_err(|err| RepoError::InvalidData(format!("habit document is not serializable: {err}")))
}

fn decode_document(text: &str) -> RepoResult<HabitFields> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(RepoError::InvalidData(format!(
            "habit document must be a JSON object, got `{other}`"
        ))),
        Err(err) => Err(RepoError::InvalidData(format!(
            "habit document is not valid JSON: {err}"
        ))),
    }
}
