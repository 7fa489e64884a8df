// src/services/statistics_service.rs
//
// Derived figures over the library. Nothing here is a source of truth:
// every call recomputes from the books and records a snapshot.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::book::ReadingStatus;
use crate::domain::statistics::{
    ReadingStatistics, StatisticsSnapshot, StatisticsType, UserStats,
};
use crate::error::AppResult;
use crate::repositories::{BookRepository, StatisticsRepository};

/// Favorites shown in the profile summary
pub const FAVORITES_SHOWN: usize = 3;

pub struct StatisticsService {
    statistics_repo: Arc<dyn StatisticsRepository>,
    book_repo: Arc<dyn BookRepository>,
}

impl StatisticsService {
    pub fn new(
        statistics_repo: Arc<dyn StatisticsRepository>,
        book_repo: Arc<dyn BookRepository>,
    ) -> Self {
        Self {
            statistics_repo,
            book_repo,
        }
    }

    pub fn user_stats(&self) -> AppResult<UserStats> {
        let stats = UserStats {
            total_books_read: self.book_repo.count_by_status(ReadingStatus::Finished)?,
            total_books_to_read: self.book_repo.count_by_status(ReadingStatus::ToRead)?,
            total_books_reading: self.book_repo.count_by_status(ReadingStatus::Reading)?,
            average_rating: self.book_repo.average_rating_finished()?.unwrap_or(0.0),
            currently_reading: self.book_repo.list_by_status(ReadingStatus::Reading)?,
            favorite_books: self.book_repo.list_favorites(FAVORITES_SHOWN)?,
        };

        self.record(StatisticsType::Summary, &stats)?;
        Ok(stats)
    }

    /// Reading pace and calendar breakdown relative to `now`
    pub fn reading_statistics(&self, now: DateTime<Utc>) -> AppResult<ReadingStatistics> {
        let finished = self.book_repo.list_by_status(ReadingStatus::Finished)?;
        let stats = ReadingStatistics::compute(&finished, now);

        self.record(StatisticsType::Reading, &stats)?;
        Ok(stats)
    }

    /// The last figures computed, without touching the library
    pub fn latest_snapshot(&self, kind: StatisticsType) -> AppResult<Option<StatisticsSnapshot>> {
        self.statistics_repo.latest_snapshot(kind)
    }

    fn record<T: serde::Serialize>(&self, kind: StatisticsType, stats: &T) -> AppResult<()> {
        let snapshot = StatisticsSnapshot::new(kind, serde_json::to_value(stats)?);
        self.statistics_repo.save_snapshot(&snapshot)?;
        log::debug!("Recorded {} statistics snapshot {}", kind, snapshot.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::domain::book::{Book, BookId};
    use crate::repositories::{SqliteBookRepository, SqliteStatisticsRepository};
    use chrono::{Duration, TimeZone};

    fn setup() -> (StatisticsService, Arc<SqliteBookRepository>) {
        let pool = test_pool();
        let books = Arc::new(SqliteBookRepository::new(Arc::clone(&pool)));
        let stats = Arc::new(SqliteStatisticsRepository::new(pool));
        (StatisticsService::new(stats, books.clone()), books)
    }

    fn stored(repo: &SqliteBookRepository, id: i64, status: ReadingStatus, rating: Option<u8>, favorite: bool) {
        let mut book = Book::new(BookId(id), format!("Book {}", id), vec!["A".into()]);
        book.reading_status = status;
        book.rating = rating;
        book.is_favorite = favorite;
        repo.save(&book).unwrap();
    }

    #[test]
    fn test_user_stats_on_empty_library() {
        let (service, _) = setup();
        let stats = service.user_stats().unwrap();

        assert_eq!(stats.total_books_read, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert!(stats.favorite_books.is_empty());
    }

    #[test]
    fn test_user_stats_totals() {
        let (service, repo) = setup();
        stored(&repo, 1, ReadingStatus::Finished, Some(5), true);
        stored(&repo, 2, ReadingStatus::Finished, Some(4), true);
        stored(&repo, 3, ReadingStatus::Finished, None, true);
        stored(&repo, 4, ReadingStatus::Finished, Some(3), true);
        stored(&repo, 5, ReadingStatus::Reading, None, true);
        stored(&repo, 6, ReadingStatus::ToRead, None, false);

        let stats = service.user_stats().unwrap();
        assert_eq!(stats.total_books_read, 4);
        assert_eq!(stats.total_books_reading, 1);
        assert_eq!(stats.total_books_to_read, 1);
        assert_eq!(stats.average_rating, 4.0);
        assert_eq!(stats.currently_reading.len(), 1);
        assert_eq!(stats.favorite_books.len(), FAVORITES_SHOWN);
        assert!(stats
            .favorite_books
            .iter()
            .all(|b| b.reading_status == ReadingStatus::Finished));

        let snapshot = service.latest_snapshot(StatisticsType::Summary).unwrap().unwrap();
        assert_eq!(snapshot.value["total_books_read"], 4);
    }

    #[test]
    fn test_reading_statistics_snapshot() {
        let (service, repo) = setup();
        let now = Utc.with_ymd_and_hms(2025, 4, 20, 12, 0, 0).unwrap();

        let mut book = Book::new(BookId(1), "Middlemarch", vec!["George Eliot".into()]);
        book.reading_status = ReadingStatus::Finished;
        book.start_date = Some(now - Duration::days(40));
        book.finish_date = Some(now - Duration::days(10));
        repo.save(&book).unwrap();

        let stats = service.reading_statistics(now).unwrap();
        assert_eq!(stats.total_finished, 1);
        assert_eq!(stats.average_reading_days, Some(30.0));
        assert_eq!(stats.books_this_month, 1);

        let snapshot = service.latest_snapshot(StatisticsType::Reading).unwrap().unwrap();
        assert_eq!(snapshot.value["reader_title"], "Casual reader");
    }
}
