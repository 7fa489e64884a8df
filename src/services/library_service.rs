// src/services/library_service.rs
//
// Local library: the books the user tracks and everything they record about them

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::book::invariants::validate_rating;
use crate::domain::book::{now_millis, validate_book, Book, BookId, ReadingStatus};
use crate::domain::DomainError;
use crate::error::{AppError, AppResult};
use crate::events::{
    BookAdded, BookRated, BookRemoved, BookReviewed, EventBus, FavoriteToggled, LibraryCleared,
    ReadingDatesUpdated, ReadingStatusChanged,
};
use crate::repositories::BookRepository;

pub struct LibraryService {
    book_repo: Arc<dyn BookRepository>,
    event_bus: Arc<EventBus>,
}

impl LibraryService {
    pub fn new(book_repo: Arc<dyn BookRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            book_repo,
            event_bus,
        }
    }

    /// Store a book, replacing any book with the same id.
    ///
    /// `date_added` is set to now.
    pub fn add_book(&self, mut book: Book) -> AppResult<Book> {
        book.date_added = now_millis();
        book.normalize();

        validate_book(&book).map_err(AppError::Domain)?;
        self.book_repo.save(&book)?;

        self.event_bus.emit(BookAdded::new(
            book.id,
            book.title.clone(),
            book.reading_status,
        ));

        Ok(book)
    }

    pub fn remove_book(&self, id: BookId) -> AppResult<()> {
        self.book_repo.delete(id)?;
        self.event_bus.emit(BookRemoved::new(id));
        Ok(())
    }

    pub fn get_book(&self, id: BookId) -> AppResult<Option<Book>> {
        self.book_repo.get_by_id(id)
    }

    /// Newest additions first
    pub fn list_all(&self) -> AppResult<Vec<Book>> {
        self.book_repo.list_all()
    }

    pub fn list_by_status(&self, status: ReadingStatus) -> AppResult<Vec<Book>> {
        self.book_repo.list_by_status(status)
    }

    pub fn list_favorites(&self, limit: usize) -> AppResult<Vec<Book>> {
        self.book_repo.list_favorites(limit)
    }

    pub fn library_ids(&self) -> AppResult<HashSet<BookId>> {
        self.book_repo.list_ids()
    }

    /// Move a book to another bucket. Dates are left untouched.
    pub fn update_status(&self, id: BookId, status: ReadingStatus) -> AppResult<Book> {
        let mut book = self.require(id)?;
        let previous = book.reading_status;

        if previous == status {
            return Ok(book);
        }

        book.reading_status = status;
        self.book_repo.save(&book)?;

        self.event_bus
            .emit(ReadingStatusChanged::new(id, previous, status));
        Ok(book)
    }

    /// Set or clear the star rating. Only finished books can be rated.
    pub fn rate_book(&self, id: BookId, rating: Option<u8>) -> AppResult<Book> {
        validate_rating(rating).map_err(AppError::Domain)?;

        let mut book = self.require(id)?;
        if rating.is_some() {
            Self::require_finished(&book, "rated")?;
        }

        book.rating = rating;
        self.book_repo.save(&book)?;

        self.event_bus.emit(BookRated::new(id, rating));
        Ok(book)
    }

    /// Set or clear the review. Blank text clears it.
    pub fn review_book(&self, id: BookId, review: Option<String>) -> AppResult<Book> {
        let review = review
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let mut book = self.require(id)?;
        if review.is_some() {
            Self::require_finished(&book, "reviewed")?;
        }

        book.review = review;
        self.book_repo.save(&book)?;

        self.event_bus
            .emit(BookReviewed::new(id, book.review.is_some()));
        Ok(book)
    }

    pub fn set_favorite(&self, id: BookId, is_favorite: bool) -> AppResult<Book> {
        let mut book = self.require(id)?;

        if book.is_favorite != is_favorite {
            book.is_favorite = is_favorite;
            self.book_repo.save(&book)?;
            self.event_bus.emit(FavoriteToggled::new(id, is_favorite));
        }

        Ok(book)
    }

    /// Returns the new favorite flag
    pub fn toggle_favorite(&self, id: BookId) -> AppResult<bool> {
        let current = self.require(id)?.is_favorite;
        let book = self.set_favorite(id, !current)?;
        Ok(book.is_favorite)
    }

    pub fn set_start_date(&self, id: BookId, date: Option<DateTime<Utc>>) -> AppResult<Book> {
        self.update_dates(id, Some(date), None)
    }

    pub fn set_finish_date(&self, id: BookId, date: Option<DateTime<Utc>>) -> AppResult<Book> {
        self.update_dates(id, None, Some(date))
    }

    /// Change either or both reading dates; the ordering is checked once,
    /// after both are applied. An outer `None` leaves that date unchanged.
    pub fn update_dates(
        &self,
        id: BookId,
        start: Option<Option<DateTime<Utc>>>,
        finish: Option<Option<DateTime<Utc>>>,
    ) -> AppResult<Book> {
        let mut book = self.require(id)?;
        if let Some(date) = start {
            book.start_date = date;
        }
        if let Some(date) = finish {
            book.finish_date = date;
        }

        validate_book(&book).map_err(AppError::Domain)?;
        self.book_repo.save(&book)?;

        self.event_bus.emit(ReadingDatesUpdated::new(
            book.id,
            book.start_date,
            book.finish_date,
        ));
        Ok(book)
    }

    /// Remove every book. Returns how many were removed.
    pub fn clear_all(&self) -> AppResult<usize> {
        let removed = self.book_repo.delete_all()?;
        self.event_bus.emit(LibraryCleared::new(removed));
        Ok(removed)
    }

    fn require(&self, id: BookId) -> AppResult<Book> {
        self.book_repo.get_by_id(id)?.ok_or(AppError::NotFound)
    }

    fn require_finished(book: &Book, action: &str) -> AppResult<()> {
        if book.reading_status != ReadingStatus::Finished {
            return Err(AppError::Domain(DomainError::InvalidStateTransition(format!(
                "'{}' is {} and can only be {} once finished",
                book.title, book.reading_status, action
            ))));
        }
        Ok(())
    }
}
