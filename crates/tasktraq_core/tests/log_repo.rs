use tasktraq_core::db::open_db_in_memory;
use tasktraq_core::{DailyLog, DailyLogRepository, SqliteDailyLogRepository};

#[test]
fn upsert_then_overwrite_leaves_single_record_with_latest_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDailyLogRepository::try_new(&conn).unwrap();

    let first = repo.upsert_log("u1", "h1", "2024-03-05", true).unwrap();
    let second = repo.upsert_log("u1", "h1", "2024-03-05", false).unwrap();

    let all = repo.list_logs().unwrap();
    assert_eq!(all.len(), 1);
    assert!(!all[0].completed);
    assert_eq!(all[0], second);
    assert!(second.updated_at >= first.updated_at);
}

#[test]
fn repeated_upserts_track_the_most_recent_call() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDailyLogRepository::try_new(&conn).unwrap();

    let mut previous: Option<DailyLog> = None;
    for completed in [true, true, false, true, false, false, true] {
        let written = repo.upsert_log("u1", "h1", "2024-03-07", completed).unwrap();
        if let Some(previous) = &previous {
            assert!(written.updated_at >= previous.updated_at);
        }
        let found = repo.find_log("u1", "h1", "2024-03-07").unwrap().unwrap();
        assert_eq!(found, written);
        previous = Some(written);
    }

    assert_eq!(repo.list_logs().unwrap().len(), 1);
    assert!(repo.find_log("u1", "h1", "2024-03-07").unwrap().unwrap().completed);
}

#[test]
fn find_log_requires_the_exact_triple() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDailyLogRepository::try_new(&conn).unwrap();
    repo.upsert_log("u1", "h1", "2024-03-05", true).unwrap();

    assert!(repo.find_log("u1", "h1", "2024-03-05").unwrap().is_some());
    assert!(repo.find_log("u2", "h1", "2024-03-05").unwrap().is_none());
    assert!(repo.find_log("u1", "h2", "2024-03-05").unwrap().is_none());
    assert!(repo.find_log("u1", "h1", "2024-03-06").unwrap().is_none());
}

#[test]
fn distinct_triples_are_distinct_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDailyLogRepository::try_new(&conn).unwrap();

    repo.upsert_log("u1", "h1", "2024-03-05", true).unwrap();
    repo.upsert_log("u2", "h1", "2024-03-05", true).unwrap();
    repo.upsert_log("u1", "h2", "2024-03-05", true).unwrap();
    repo.upsert_log("u1", "h1", "2024-03-06", true).unwrap();

    assert_eq!(repo.list_logs().unwrap().len(), 4);
}

#[test]
fn user_month_query_matches_only_padded_dates_of_that_user() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDailyLogRepository::try_new(&conn).unwrap();

    repo.upsert_log("u1", "h1", "2024-03-01", true).unwrap();
    repo.upsert_log("u1", "h2", "2024-03-31", false).unwrap();
    repo.upsert_log("u1", "h1", "2024-3-01", true).unwrap();
    repo.upsert_log("u1", "h1", "2024-02-29", true).unwrap();
    repo.upsert_log("u1", "h1", "2024-04-01", true).unwrap();
    repo.upsert_log("u1", "h1", "2023-03-15", true).unwrap();
    repo.upsert_log("u2", "h1", "2024-03-10", true).unwrap();

    let logs = repo.user_logs_for_month("u1", 2024, 3).unwrap();
    let dates: Vec<&str> = logs.iter().map(|log| log.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-03-31"]);
    assert!(logs.iter().all(|log| log.user_id == "u1"));
}

#[test]
fn habit_month_query_spans_users_of_that_habit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDailyLogRepository::try_new(&conn).unwrap();

    repo.upsert_log("u1", "h1", "2024-12-01", true).unwrap();
    repo.upsert_log("u2", "h1", "2024-12-31", true).unwrap();
    repo.upsert_log("u1", "h2", "2024-12-02", true).unwrap();
    repo.upsert_log("u1", "h1", "2025-01-01", true).unwrap();

    let logs = repo.habit_logs_for_month("h1", 2024, 12).unwrap();
    let dates: Vec<&str> = logs.iter().map(|log| log.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-12-01", "2024-12-31"]);
}

#[test]
fn invalid_month_yields_empty_result() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDailyLogRepository::try_new(&conn).unwrap();
    repo.upsert_log("u1", "h1", "2024-03-01", true).unwrap();

    assert!(repo.user_logs_for_month("u1", 2024, 0).unwrap().is_empty());
    assert!(repo.user_logs_for_month("u1", 2024, 13).unwrap().is_empty());
    assert!(repo.habit_logs_for_month("h1", -5, 3).unwrap().is_empty());
}

#[test]
fn upsert_stores_dates_verbatim() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDailyLogRepository::try_new(&conn).unwrap();

    let log = repo.upsert_log("u1", "h1", "2024-3-1", true).unwrap();
    assert_eq!(log.date, "2024-3-1");
    assert!(repo.find_log("u1", "h1", "2024-3-1").unwrap().is_some());
}
