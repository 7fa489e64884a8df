// src/application/commands/search_commands.rs

use crate::application::commands::{parse_language, CommandResult};
use crate::application::{dto::*, state::AppState};

/// Search every catalog, marking books already in the library.
///
/// `language` overrides the configured language for this search.
pub async fn search_books(
    state: &AppState,
    query: &str,
    language: Option<&str>,
) -> CommandResult<Vec<SearchHitDto>> {
    let language = language.map(parse_language).unwrap_or_else(|| state.language());

    let hits = state.search_service.search_marked(query, language).await?;

    Ok(hits.into_iter().map(SearchHitDto::from).collect())
}
