// src/services/search_service.rs
//
// Multi-catalog search
//
// - All catalogs are queried concurrently and awaited together
// - One failing catalog never hides the others' results
// - Results are pooled in catalog order, filtered by language and de-duplicated

use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::book::{Book, Language, ReadingStatus};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, SearchCompleted};
use crate::integrations::CatalogSource;
use crate::repositories::BookRepository;

/// A search result annotated with its place in the local library
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub book: Book,
    pub in_library: bool,
    /// Status of the stored copy, if any
    pub local_status: Option<ReadingStatus>,
}

pub struct SearchService {
    sources: Vec<Arc<dyn CatalogSource>>,
    book_repo: Arc<dyn BookRepository>,
    event_bus: Arc<EventBus>,
}

impl SearchService {
    pub fn new(
        sources: Vec<Arc<dyn CatalogSource>>,
        book_repo: Arc<dyn BookRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            sources,
            book_repo,
            event_bus,
        }
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Search every catalog for `query`.
    ///
    /// Fails only when every catalog fails, with the first catalog's error.
    pub async fn search(&self, query: &str, language: Language) -> AppResult<Vec<Book>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::validation("Search query cannot be empty"));
        }

        let outcomes = join_all(self.sources.iter().map(|source| async move {
            (source.name(), source.search(query).await)
        }))
        .await;

        let mut pooled = Vec::new();
        let mut failed_sources = Vec::new();
        let mut first_error = None;

        for (name, outcome) in outcomes {
            match outcome {
                Ok(books) => {
                    log::debug!("[{}] {} results for {:?}", name, books.len(), query);
                    pooled.extend(books);
                }
                Err(e) => {
                    log::warn!("[{}] search failed: {}", name, e);
                    failed_sources.push(name.to_string());
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(err) = first_error {
            if failed_sources.len() == self.sources.len() {
                self.event_bus
                    .emit(SearchCompleted::new(query.to_string(), 0, failed_sources));
                return Err(err);
            }
        }

        let books = dedup_books(filter_by_language(pooled, language));

        self.event_bus.emit(SearchCompleted::new(
            query.to_string(),
            books.len(),
            failed_sources,
        ));

        Ok(books)
    }

    /// Search and mark which results are already in the library.
    ///
    /// An empty result is reported as [`AppError::NoResults`].
    pub async fn search_marked(&self, query: &str, language: Language) -> AppResult<Vec<SearchHit>> {
        let books = self.search(query, language).await?;
        if books.is_empty() {
            return Err(AppError::NoResults);
        }

        let library_ids = self.book_repo.list_ids()?;

        books
            .into_iter()
            .map(|book| {
                let local_status = if library_ids.contains(&book.id) {
                    self.book_repo
                        .get_by_id(book.id)?
                        .map(|stored| stored.reading_status)
                } else {
                    None
                };

                Ok::<_, AppError>(SearchHit {
                    in_library: local_status.is_some(),
                    local_status,
                    book,
                })
            })
            .collect()
    }
}

/// Keep the books in `language`, or all of them when none match.
fn filter_by_language(mut books: Vec<Book>, language: Language) -> Vec<Book> {
    let code = language.code();
    if books.iter().any(|b| b.matches_language(code)) {
        books.retain(|b| b.matches_language(code));
    }
    books
}

/// First occurrence of each title/authors pair wins.
fn dedup_books(mut books: Vec<Book>) -> Vec<Book> {
    let mut seen = HashSet::new();
    books.retain(|b| seen.insert(b.dedup_key()));
    books
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::domain::book::BookId;
    use crate::integrations::catalog::MockCatalogSource;
    use crate::repositories::SqliteBookRepository;

    fn book(id: i64, title: &str, author: &str, lang: &str) -> Book {
        let mut b = Book::new(BookId(id), title, vec![author.to_string()]);
        b.languages = vec![lang.to_string()];
        b
    }

    fn source(name: &'static str, books: Vec<Book>) -> Arc<dyn CatalogSource> {
        let mut mock = MockCatalogSource::new();
        mock.expect_name().return_const(name);
        mock.expect_search().returning(move |_| Ok(books.clone()));
        Arc::new(mock)
    }

    fn failing(name: &'static str) -> Arc<dyn CatalogSource> {
        let mut mock = MockCatalogSource::new();
        mock.expect_name().return_const(name);
        mock.expect_search().returning(move |_| {
            Err(AppError::Timeout {
                source_name: name.to_string(),
            })
        });
        Arc::new(mock)
    }

    fn service(sources: Vec<Arc<dyn CatalogSource>>) -> (SearchService, Arc<SqliteBookRepository>) {
        let repo = Arc::new(SqliteBookRepository::new(test_pool()));
        let bus = Arc::new(EventBus::new());
        (SearchService::new(sources, repo.clone(), bus), repo)
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let (service, _) = service(vec![]);
        assert!(matches!(
            service.search("   ", Language::English).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_pools_in_source_order_and_dedups() {
        let (service, _) = service(vec![
            source("a", vec![book(1, "Emma", "Jane Austen", "en")]),
            source(
                "b",
                vec![
                    book(2, "EMMA", "jane austen", "en"),
                    book(3, "Persuasion", "Jane Austen", "en"),
                ],
            ),
        ]);

        let books = service.search("austen", Language::English).await.unwrap();
        let ids: Vec<i64> = books.iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_language_filter_with_fallback() {
        let (mixed, _) = service(vec![source(
            "a",
            vec![
                book(1, "Don Quijote", "Cervantes", "es"),
                book(2, "Don Quixote", "Cervantes", "en"),
            ],
        )]);

        let spanish = mixed.search("quijote", Language::Spanish).await.unwrap();
        assert_eq!(spanish.len(), 1);
        assert_eq!(spanish[0].id, BookId(1));

        let (english_only, _) =
            service(vec![source("a", vec![book(2, "Don Quixote", "Cervantes", "en")])]);
        let fallback = english_only.search("quixote", Language::Spanish).await.unwrap();
        assert_eq!(fallback.len(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_returns_survivors() {
        let (service, _) = service(vec![
            failing("a"),
            source("b", vec![book(5, "Dracula", "Bram Stoker", "en")]),
        ]);

        let books = service.search("dracula", Language::English).await.unwrap();
        assert_eq!(books.len(), 1);
    }

    #[tokio::test]
    async fn test_all_failures_return_first_error() {
        let (service, _) = service(vec![failing("first"), failing("second")]);

        match service.search("anything", Language::English).await {
            Err(AppError::Timeout { source_name }) => assert_eq!(source_name, "first"),
            other => panic!("expected timeout, got {:?}", other.map(|b| b.len())),
        }
    }

    #[tokio::test]
    async fn test_search_marked_flags_library_books() {
        let (service, repo) = service(vec![source(
            "a",
            vec![
                book(1, "Walden", "Thoreau", "en"),
                book(2, "Civil Disobedience", "Thoreau", "en"),
            ],
        )]);

        let mut stored = book(2, "Civil Disobedience", "Thoreau", "en");
        stored.reading_status = ReadingStatus::Reading;
        repo.save(&stored).unwrap();

        let hits = service.search_marked("thoreau", Language::English).await.unwrap();
        assert!(!hits[0].in_library);
        assert_eq!(hits[0].local_status, None);
        assert!(hits[1].in_library);
        assert_eq!(hits[1].local_status, Some(ReadingStatus::Reading));
    }

    #[tokio::test]
    async fn test_search_marked_empty_is_no_results() {
        let (service, _) = service(vec![source("a", vec![])]);
        assert!(matches!(
            service.search_marked("zzzz", Language::English).await,
            Err(AppError::NoResults)
        ));
    }
}
