//! Monthly dashboard projection.
//!
//! # Invariants
//! - Only completed logs of the summarized habits count.
//! - A log whose date is not a well-formed day of the month is ignored.
//! - Percentages are rounded to one decimal and are `0.0` when there is
//!   nothing to divide by.

use crate::model::daily_log::DailyLog;
use crate::model::habit::{Habit, HabitId};
use crate::model::month::MonthRange;
use serde::Serialize;
use std::collections::HashMap;

/// Per-habit completion summary for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitSummary {
    pub id: HabitId,
    pub name: String,
    /// One entry per day of the month: `1` completed, `0` otherwise.
    pub days: Vec<u8>,
    pub total: u32,
    pub percent_complete: f64,
}

/// Dashboard summary across all habits of a user for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMetrics {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    pub habit_summaries: Vec<HabitSummary>,
    pub total_completed_days: u32,
    pub total_possible_days: u32,
    pub overall_completion_percent: f64,
}

/// Builds the monthly summary for `habits` from `logs`.
///
/// Habit order is preserved in `habit_summaries`.
pub fn summarize_month(range: &MonthRange, habits: &[Habit], logs: &[DailyLog]) -> MonthlyMetrics {
    let days_in_month = range.days_in_month();
    let mut grids: HashMap<&str, Vec<u8>> = habits
        .iter()
        .map(|habit| (habit.id.as_str(), vec![0; days_in_month as usize]))
        .collect();

    for log in logs.iter().filter(|log| log.completed) {
        let Some(day) = range.day_of(&log.date) else {
            continue;
        };
        if let Some(slot) = grids
            .get_mut(log.habit_id.as_str())
            .and_then(|days| days.get_mut(day as usize - 1))
        {
            *slot = 1;
        }
    }

    let habit_summaries: Vec<HabitSummary> = habits
        .iter()
        .map(|habit| {
            let days = grids.remove(habit.id.as_str()).unwrap_or_default();
            let total: u32 = days.iter().map(|&day| u32::from(day)).sum();
            HabitSummary {
                id: habit.id.clone(),
                name: habit.name.clone(),
                days,
                total,
                percent_complete: percent(total, days_in_month),
            }
        })
        .collect();

    let total_completed_days: u32 = habit_summaries.iter().map(|summary| summary.total).sum();
    let total_possible_days = days_in_month * habit_summaries.len() as u32;

    MonthlyMetrics {
        year: range.year(),
        month: range.month(),
        days_in_month,
        habit_summaries,
        total_completed_days,
        total_possible_days,
        overall_completion_percent: percent(total_completed_days, total_possible_days),
    }
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = f64::from(part) * 100.0 / f64::from(whole);
    (raw * 10.0).round() / 10.0
}
