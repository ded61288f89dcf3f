//! Tracker domain model.
//!
//! # Responsibility
//! - Define the record shapes persisted by the repository layer.
//! - Keep storage-internal keys out of every public shape.
//!
//! # Invariants
//! - Entities reference each other by plain string ids (non-owning).
//! - Daily log dates are ISO `YYYY-MM-DD` strings stored verbatim.

pub mod daily_log;
pub mod habit;
pub mod month;
pub mod user;
