//! User record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable user identifier.
pub type UserId = String;

/// Registered account.
///
/// `password` holds whatever credential form the caller stores; hashing is
/// decided outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password: String,
}

impl User {
    /// Creates a user with a generated UUID v4 id.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), email, password)
    }

    /// Creates a user with a caller-provided id.
    pub fn with_id(
        id: impl Into<UserId>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}
