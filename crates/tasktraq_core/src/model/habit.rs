//! Habit record and its stored document form.
//!
//! # Invariants
//! - `id` and `user_id` are identity fields and never appear inside the
//!   stored document.
//! - `name` is always present in the stored document as a JSON string.
//! - Any other descriptive field is carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::user::UserId;

/// Stable habit identifier.
pub type HabitId = String;

/// Open-ended descriptive fields of a habit (also the partial update shape).
pub type HabitFields = Map<String, Value>;

pub const FIELD_ID: &str = "id";
pub const FIELD_USER_ID: &str = "user_id";
pub const FIELD_NAME: &str = "name";

/// Habit owned by exactly one user.
///
/// Serializes flat: `{"id": .., "user_id": .., "name": .., <fields>...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub user_id: UserId,
    pub name: String,
    #[serde(flatten)]
    pub fields: HabitFields,
}

impl Habit {
    /// Creates a habit with a generated UUID v4 id and no extra fields.
    pub fn new(user_id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), user_id, name)
    }

    /// Creates a habit with a caller-provided id.
    pub fn with_id(
        id: impl Into<HabitId>,
        user_id: impl Into<UserId>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            fields: HabitFields::new(),
        }
    }

    /// Adds or replaces one descriptive field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Builds the document persisted for this habit.
    ///
    /// Identity keys smuggled into `fields` are dropped; `name` always wins
    /// over a `name` entry in `fields`.
    pub fn to_document(&self) -> HabitFields {
        let mut document: HabitFields = self
            .fields
            .iter()
            .filter(|(key, _)| !is_identity_field(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        document.insert(FIELD_NAME.to_string(), Value::String(self.name.clone()));
        document
    }

    /// Rebuilds a habit from identity columns and its stored document.
    ///
    /// Returns a description of the problem when the document has no string
    /// `name`.
    pub fn from_document(
        id: impl Into<HabitId>,
        user_id: impl Into<UserId>,
        mut document: HabitFields,
    ) -> Result<Self, String> {
        let name = match document.remove(FIELD_NAME) {
            Some(Value::String(name)) => name,
            Some(other) => return Err(format!("habit name must be a string, got `{other}`")),
            None => return Err("habit document has no name".to_string()),
        };
        document.retain(|key, _| !is_identity_field(key));

        Ok(Self {
            id: id.into(),
            user_id: user_id.into(),
            name,
            fields: document,
        })
    }
}

/// Returns whether `key` names an identity field that updates may not touch.
pub fn is_identity_field(key: &str) -> bool {
    key == FIELD_ID || key == FIELD_USER_ID
}
