//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire environment config, logging and the tracker store together.
//! - Print a deterministic summary for quick local sanity checks.

use log::error;
use std::process::ExitCode;
use tasktraq_core::db::open_db;
use tasktraq_core::{
    core_version, init_logging, AppConfig, DailyLogRepository, HabitRepository,
    SqliteDailyLogRepository, SqliteHabitRepository, SqliteUserRepository, UserRepository,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("tasktraq: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path)?;
    let users = SqliteUserRepository::try_new(&conn)?.list_users()?;
    let habits = SqliteHabitRepository::try_new(&conn)?.list_habits()?;
    let logs = SqliteDailyLogRepository::try_new(&conn)?.list_logs()?;

    println!("tasktraq_core version={}", core_version());
    println!("store path={}", config.db_path.display());
    println!(
        "store users={} habits={} daily_logs={}",
        users.len(),
        habits.len(),
        logs.len()
    );
    Ok(())
}
