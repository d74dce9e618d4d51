pub mod add;
pub mod clear;
pub mod day;
pub mod delete;
pub mod month;
pub mod search;
pub mod update;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use daybook_core::error::PersistenceResult;
use owo_colors::OwoColorize;

/// Parse YYYY-MM-DD
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

/// Parse YYYY-MM as the first day of that month
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid month format '{}'. Expected YYYY-MM", s))
}

/// Report a failed save without failing the command: the change still
/// applied for this run, it just won't be there next time.
pub fn warn_if_unsaved<T>(result: PersistenceResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("changes could not be saved ({err})").yellow()
            );
            None
        }
    }
}
