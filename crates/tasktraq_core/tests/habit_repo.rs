use serde_json::{json, Value};
use tasktraq_core::db::open_db_in_memory;
use tasktraq_core::{
    DailyLogRepository, Habit, HabitFields, HabitRepository, RepoError, SqliteDailyLogRepository,
    SqliteHabitRepository,
};

fn fields(value: Value) -> HabitFields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn add_and_find_habit_keeps_descriptive_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();

    let habit = Habit::with_id("h1", "u1", "Read")
        .with_field("goal", 20)
        .with_field("color", "#3b82f6");
    let stored = repo.add_habit(habit.clone()).unwrap();
    assert_eq!(stored, habit);

    let loaded = repo.find_habit("h1").unwrap().unwrap();
    assert_eq!(loaded, habit);
    assert_eq!(loaded.fields.get("goal"), Some(&json!(20)));
    assert!(repo.find_habit("missing").unwrap().is_none());
}

#[test]
fn add_habit_strips_identity_keys_from_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();

    let habit = Habit::with_id("h1", "u1", "Read").with_field("user_id", "someone-else");
    let stored = repo.add_habit(habit).unwrap();
    assert!(stored.fields.is_empty());
    assert_eq!(stored.user_id, "u1");
}

#[test]
fn duplicate_habit_id_is_a_store_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();

    repo.add_habit(Habit::with_id("h1", "u1", "Read")).unwrap();
    let err = repo.add_habit(Habit::with_id("h1", "u2", "Run")).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn list_habits_and_filter_by_user() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();

    repo.add_habit(Habit::with_id("h1", "u1", "Read")).unwrap();
    repo.add_habit(Habit::with_id("h2", "u2", "Run")).unwrap();
    repo.add_habit(Habit::with_id("h3", "u1", "Write")).unwrap();

    let all: Vec<String> = repo
        .list_habits()
        .unwrap()
        .into_iter()
        .map(|habit| habit.id)
        .collect();
    assert_eq!(all, vec!["h1", "h2", "h3"]);

    let mine: Vec<String> = repo
        .list_user_habits("u1")
        .unwrap()
        .into_iter()
        .map(|habit| habit.id)
        .collect();
    assert_eq!(mine, vec!["h1", "h3"]);
    assert!(repo.list_user_habits("nobody").unwrap().is_empty());
}

#[test]
fn update_habit_merges_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();
    repo.add_habit(Habit::with_id("h1", "u1", "Read").with_field("goal", 20))
        .unwrap();

    let updated = repo
        .update_habit("h1", &fields(json!({"name": "Read more", "color": "#10b981"})))
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Read more");
    assert_eq!(updated.fields.get("goal"), Some(&json!(20)));
    assert_eq!(updated.fields.get("color"), Some(&json!("#10b981")));
    assert_eq!(repo.find_habit("h1").unwrap().unwrap(), updated);
}

#[test]
fn update_missing_habit_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();

    let result = repo
        .update_habit("missing", &fields(json!({"name": "Anything"})))
        .unwrap();
    assert!(result.is_none());
}

// A no-op update is indistinguishable from a missing habit: nothing was
// modified, so the answer is `None` even though the record exists.
#[test]
fn update_with_identical_values_returns_none_although_habit_exists() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();
    repo.add_habit(Habit::with_id("h1", "u1", "Read").with_field("goal", 20))
        .unwrap();

    let result = repo
        .update_habit("h1", &fields(json!({"name": "Read", "goal": 20})))
        .unwrap();
    assert!(result.is_none());
    assert!(repo.find_habit("h1").unwrap().is_some());
}

#[test]
fn update_rejects_identity_fields_and_non_string_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();
    repo.add_habit(Habit::with_id("h1", "u1", "Read")).unwrap();

    let err = repo
        .update_habit("h1", &fields(json!({"user_id": "u2"})))
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidUpdate(_)));

    let err = repo
        .update_habit("h1", &fields(json!({"name": 42})))
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidUpdate(_)));

    assert_eq!(repo.find_habit("h1").unwrap().unwrap().name, "Read");
}

#[test]
fn delete_habit_cascades_to_its_logs_only() {
    let conn = open_db_in_memory().unwrap();
    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let logs = SqliteDailyLogRepository::try_new(&conn).unwrap();

    habits.add_habit(Habit::with_id("h1", "u1", "Read")).unwrap();
    habits.add_habit(Habit::with_id("h2", "u1", "Run")).unwrap();
    logs.upsert_log("u1", "h1", "2024-03-01", true).unwrap();
    logs.upsert_log("u1", "h1", "2024-03-02", false).unwrap();
    logs.upsert_log("u1", "h2", "2024-03-01", true).unwrap();

    habits.delete_habit("h1").unwrap();

    assert!(habits.find_habit("h1").unwrap().is_none());
    assert!(logs.habit_logs_for_month("h1", 2024, 3).unwrap().is_empty());
    assert!(logs.find_log("u1", "h1", "2024-03-01").unwrap().is_none());

    let remaining = logs.user_logs_for_month("u1", 2024, 3).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].habit_id, "h2");
    assert!(habits.find_habit("h2").unwrap().is_some());
}

#[test]
fn delete_missing_habit_still_clears_stray_logs() {
    let conn = open_db_in_memory().unwrap();
    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let logs = SqliteDailyLogRepository::try_new(&conn).unwrap();

    logs.upsert_log("u1", "ghost", "2024-03-01", true).unwrap();
    habits.delete_habit("ghost").unwrap();

    assert!(logs.list_logs().unwrap().is_empty());
}

#[test]
fn delete_habit_rolls_back_when_log_delete_fails() {
    let conn = open_db_in_memory().unwrap();
    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let logs = SqliteDailyLogRepository::try_new(&conn).unwrap();

    habits.add_habit(Habit::with_id("h1", "u1", "Read")).unwrap();
    logs.upsert_log("u1", "h1", "2024-03-01", true).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER block_log_delete BEFORE DELETE ON daily_logs
         BEGIN
            SELECT RAISE(ABORT, 'log delete blocked');
         END;",
    )
    .unwrap();

    let err = habits.delete_habit("h1").unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    assert!(habits.find_habit("h1").unwrap().is_some());
    assert_eq!(logs.list_logs().unwrap().len(), 1);
}

#[test]
fn corrupt_habit_document_surfaces_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO habits (id, user_id, document) VALUES ('h1', 'u1', '[1, 2]');",
        [],
    )
    .unwrap();

    let err = repo.find_habit("h1").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
