// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between a front end and the services
// - Commands parse user strings, call services, return DTOs
// - Commands handle error conversion to ErrorResponse
// - Commands NEVER contain business logic

pub mod backup_commands;
pub mod book_commands;
pub mod search_commands;
pub mod statistics_commands;

pub use backup_commands::*;
pub use book_commands::*;
pub use search_commands::*;
pub use statistics_commands::*;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::application::dto::DATE_FORMAT;
use crate::application::error_handling::ErrorResponse;
use crate::domain::{BookId, Language, ReadingStatus};

/// Result type of every command
pub type CommandResult<T> = Result<T, ErrorResponse>;

pub(crate) fn parse_book_id(raw: &str) -> CommandResult<BookId> {
    raw.parse::<BookId>()
        .map_err(|e| ErrorResponse::validation(e.to_string()))
}

pub(crate) fn parse_status(raw: &str) -> CommandResult<ReadingStatus> {
    raw.parse::<ReadingStatus>().map_err(|_| {
        ErrorResponse::validation(format!(
            "Unknown reading status '{}'. Use to-read, reading or finished",
            raw
        ))
    })
}

pub(crate) fn parse_language(raw: &str) -> Language {
    Language::from_code(raw)
}

/// `YYYY-MM-DD` at midnight UTC; `none` or an empty string clears the date.
pub(crate) fn parse_optional_date(raw: &str) -> CommandResult<Option<DateTime<Utc>>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(|date| Some(date.and_time(NaiveTime::MIN).and_utc()))
        .map_err(|_| {
            ErrorResponse::validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", raw))
        })
}
