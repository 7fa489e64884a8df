// src/application/commands/statistics_commands.rs

use chrono::Utc;

use crate::application::commands::CommandResult;
use crate::application::{dto::*, state::AppState};

/// Library totals, currently reading and top favorites
pub fn get_user_stats(state: &AppState) -> CommandResult<UserStatsDto> {
    let stats = state.statistics_service.user_stats()?;
    Ok(UserStatsDto::from(stats))
}

/// Reading pace and this year's calendar
pub fn get_reading_statistics(state: &AppState) -> CommandResult<ReadingStatisticsDto> {
    let stats = state.statistics_service.reading_statistics(Utc::now())?;
    Ok(ReadingStatisticsDto::from(stats))
}
