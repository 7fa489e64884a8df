// src/application/commands/book_commands.rs
//
// Book Command Handlers
//
// RULES:
// - Accept user strings
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::commands::{
    parse_book_id, parse_optional_date, parse_status, CommandResult,
};
use crate::application::error_handling::ErrorResponse;
use crate::application::{dto::*, state::AppState};

/// List the library, optionally one reading bucket
pub fn list_books(state: &AppState, status: Option<&str>) -> CommandResult<Vec<BookDto>> {
    let books = match status {
        Some(raw) => state.library_service.list_by_status(parse_status(raw)?)?,
        None => state.library_service.list_all()?,
    };

    Ok(books.into_iter().map(BookDto::from).collect())
}

/// Get a single book by ID
pub fn get_book(state: &AppState, book_id: &str) -> CommandResult<Option<BookDto>> {
    let id = parse_book_id(book_id)?;
    let book = state.library_service.get_book(id)?;
    Ok(book.map(BookDto::from))
}

/// Search and add the `pick`-th result (1-based) to the library.
/// A result that is already tracked is rejected so its reading data survives.
pub async fn add_from_search(
    state: &AppState,
    query: &str,
    pick: usize,
    status: Option<&str>,
) -> CommandResult<BookDto> {
    let status = status.map(parse_status).transpose()?;

    let hits = state
        .search_service
        .search_marked(query, state.language())
        .await?;

    let total = hits.len();
    let hit = pick
        .checked_sub(1)
        .and_then(|index| hits.into_iter().nth(index))
        .ok_or_else(|| {
            ErrorResponse::validation(format!(
                "Result {} is out of range (1..={})",
                pick, total
            ))
        })?;

    if let Some(local_status) = hit.local_status {
        return Err(ErrorResponse::validation(format!(
            "'{}' is already in your library ({})",
            hit.book.title, local_status
        )));
    }

    let mut book = hit.book;
    if let Some(status) = status {
        book.reading_status = status;
    }

    let added = state.library_service.add_book(book)?;
    Ok(BookDto::from(added))
}

pub fn update_status(state: &AppState, book_id: &str, status: &str) -> CommandResult<BookDto> {
    let id = parse_book_id(book_id)?;
    let status = parse_status(status)?;

    let book = state.library_service.update_status(id, status)?;
    Ok(BookDto::from(book))
}

/// `None` clears the rating
pub fn rate_book(state: &AppState, book_id: &str, rating: Option<u8>) -> CommandResult<BookDto> {
    let id = parse_book_id(book_id)?;
    let book = state.library_service.rate_book(id, rating)?;
    Ok(BookDto::from(book))
}

/// `None` or blank text clears the review
pub fn review_book(
    state: &AppState,
    book_id: &str,
    review: Option<String>,
) -> CommandResult<BookDto> {
    let id = parse_book_id(book_id)?;
    let book = state.library_service.review_book(id, review)?;
    Ok(BookDto::from(book))
}

/// Set the favorite flag, or flip it when `value` is None
pub fn set_favorite(state: &AppState, book_id: &str, value: Option<bool>) -> CommandResult<bool> {
    let id = parse_book_id(book_id)?;

    let is_favorite = match value {
        Some(value) => state.library_service.set_favorite(id, value)?.is_favorite,
        None => state.library_service.toggle_favorite(id)?,
    };

    Ok(is_favorite)
}

/// Update reading dates. Each argument is `YYYY-MM-DD`, `none` to clear,
/// or absent to leave unchanged.
pub fn set_reading_dates(
    state: &AppState,
    book_id: &str,
    start: Option<&str>,
    finish: Option<&str>,
) -> CommandResult<BookDto> {
    let id = parse_book_id(book_id)?;

    if start.is_none() && finish.is_none() {
        return Err(ErrorResponse::validation(
            "Provide a start date, a finish date or both".to_string(),
        ));
    }

    let start = start.map(parse_optional_date).transpose()?;
    let finish = finish.map(parse_optional_date).transpose()?;

    let book = state.library_service.update_dates(id, start, finish)?;
    Ok(BookDto::from(book))
}

pub fn remove_book(state: &AppState, book_id: &str) -> CommandResult<()> {
    let id = parse_book_id(book_id)?;
    state.library_service.remove_book(id)?;
    Ok(())
}

/// Returns how many books were removed
pub fn clear_library(state: &AppState) -> CommandResult<usize> {
    Ok(state.library_service.clear_all()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error_handling::ErrorType;
    use crate::config::AppConfig;
    use crate::db::test_pool;
    use crate::domain::{Book, BookId, Language};
    use crate::integrations::catalog::MockCatalogSource;
    use crate::integrations::CatalogSource;
    use std::sync::Arc;

    fn state_with_results(books: Vec<Book>) -> AppState {
        let mut mock = MockCatalogSource::new();
        mock.expect_name().return_const("mock");
        mock.expect_search().returning(move |_| Ok(books.clone()));

        let sources: Vec<Arc<dyn CatalogSource>> = vec![Arc::new(mock)];
        let config = AppConfig {
            language: Language::English,
            ..AppConfig::default()
        };
        AppState::new(test_pool(), sources, config)
    }

    fn english(id: i64, title: &str) -> Book {
        let mut book = Book::new(BookId(id), title, vec!["Herman Melville".into()]);
        book.languages = vec!["en".into()];
        book
    }

    #[tokio::test]
    async fn test_add_from_search_with_status() {
        let state = state_with_results(vec![english(1, "Moby Dick"), english(2, "Typee")]);

        let added = add_from_search(&state, "melville", 2, Some("reading"))
            .await
            .unwrap();
        assert_eq!(added.id, 2);
        assert_eq!(added.reading_status, "READING");

        let listed = list_books(&state, Some("reading")).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(list_books(&state, Some("finished")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_from_search_out_of_range() {
        let state = state_with_results(vec![english(1, "Moby Dick")]);

        for pick in [0, 2] {
            let err = add_from_search(&state, "melville", pick, None).await.unwrap_err();
            assert_eq!(err.error_type, ErrorType::Validation);
        }
    }

    #[tokio::test]
    async fn test_add_from_search_keeps_tracked_book() {
        let state = state_with_results(vec![english(1, "Moby Dick")]);
        add_from_search(&state, "moby", 1, Some("finished")).await.unwrap();
        rate_book(&state, "1", Some(5)).unwrap();
        review_book(&state, "1", Some("Masterpiece".into())).unwrap();
        set_favorite(&state, "1", Some(true)).unwrap();

        let err = add_from_search(&state, "moby", 1, None).await.unwrap_err();
        assert_eq!(err.error_type, ErrorType::Validation);
        assert!(err.message.contains("already in your library (FINISHED)"));

        let book = get_book(&state, "1").unwrap().unwrap();
        assert_eq!(book.reading_status, "FINISHED");
        assert_eq!(book.rating, Some(5));
        assert_eq!(book.review.as_deref(), Some("Masterpiece"));
        assert!(book.is_favorite);
    }

    #[tokio::test]
    async fn test_rating_flow() {
        let state = state_with_results(vec![english(1, "Moby Dick")]);
        add_from_search(&state, "moby", 1, None).await.unwrap();

        let err = rate_book(&state, "1", Some(5)).unwrap_err();
        assert_eq!(err.error_type, ErrorType::Validation);

        update_status(&state, "1", "finished").unwrap();
        assert_eq!(rate_book(&state, "1", Some(5)).unwrap().rating, Some(5));
        assert_eq!(
            review_book(&state, "1", Some("Call me Ishmael".into())).unwrap().review.as_deref(),
            Some("Call me Ishmael")
        );
    }

    #[tokio::test]
    async fn test_dates_and_favorite() {
        let state = state_with_results(vec![english(1, "Moby Dick")]);
        add_from_search(&state, "moby", 1, Some("finished")).await.unwrap();

        let book = set_reading_dates(&state, "1", Some("2024-01-10"), Some("2024-02-09")).unwrap();
        assert_eq!(book.reading_days, Some(30));

        let book = set_reading_dates(&state, "1", Some("none"), None).unwrap();
        assert!(book.start_date.is_none());
        assert_eq!(book.finish_date.as_deref(), Some("2024-02-09"));

        assert!(set_reading_dates(&state, "1", None, None).is_err());

        assert!(set_favorite(&state, "1", None).unwrap());
        assert!(!set_favorite(&state, "1", Some(false)).unwrap());
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let state = state_with_results(vec![english(1, "Moby Dick"), english(2, "Typee")]);
        add_from_search(&state, "melville", 1, None).await.unwrap();
        add_from_search(&state, "melville", 2, None).await.unwrap();

        remove_book(&state, "1").unwrap();
        assert_eq!(
            remove_book(&state, "1").unwrap_err().error_type,
            ErrorType::NotFound
        );
        assert!(get_book(&state, "1").unwrap().is_none());

        assert_eq!(clear_library(&state).unwrap(), 1);
    }

    #[test]
    fn test_invalid_id_is_validation_error() {
        let state = state_with_results(vec![]);
        assert_eq!(
            get_book(&state, "not-a-number").unwrap_err().error_type,
            ErrorType::Validation
        );
    }
}
