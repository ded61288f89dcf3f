//! Tracker use-case services.
//!
//! # Responsibility
//! - Apply the business rules the persistence layer leaves to callers
//!   (email uniqueness, habit name rules, ownership checks).
//! - Derive dashboard projections from stored habits and logs.
//!
//! # See also
//! - `crate::repo` for the raw persistence contracts.

pub mod dashboard;
pub mod tracker_service;
