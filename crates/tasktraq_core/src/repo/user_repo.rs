//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `add_user` performs no email uniqueness check; duplicate emails coexist.
//! - Lookups by email return the earliest inserted match.

use crate::model::user::{User, UserId};
use crate::repo::{ensure_connection_ready, RepoResult, TableShape};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USERS_SHAPE: TableShape = ("users", &["seq", "id", "email", "password"]);

const USER_SELECT_SQL: &str = "SELECT id, email, password FROM users";

/// Repository interface for user records.
pub trait UserRepository {
    /// Lists every user in insertion order.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Persists `user` as given and returns it.
    fn add_user(&self, user: User) -> RepoResult<User>;
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    fn find_user_by_id(&self, id: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[USERS_SHAPE])?;
        Ok(Self { conn })
    }

    fn find_one(&self, column: &str, value: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE {column} = ?1 ORDER BY seq ASC LIMIT 1;"),
                [value],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY seq ASC;"))?;
        let users = stmt
            .query_map([], parse_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn add_user(&self, user: User) -> RepoResult<User> {
        self.conn.execute(
            "INSERT INTO users (id, email, password) VALUES (?1, ?2, ?3);",
            params![user.id.as_str(), user.email.as_str(), user.password.as_str()],
        )?;
        Ok(user)
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_one("email", email)
    }

    fn find_user_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        self.find_one("id", id)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get::<_, UserId>("id")?,
        email: row.get("email")?,
        password: row.get("password")?,
    })
}
