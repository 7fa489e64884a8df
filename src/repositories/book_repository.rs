// src/repositories/book_repository.rs
//
// Book persistence

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};

use crate::db::ConnectionPool;
use crate::domain::book::{Book, BookId, ReadingStatus};
use crate::error::{AppError, AppResult};

pub trait BookRepository: Send + Sync {
    /// Insert or replace
    fn save(&self, book: &Book) -> AppResult<()>;
    fn get_by_id(&self, id: BookId) -> AppResult<Option<Book>>;
    fn list_all(&self) -> AppResult<Vec<Book>>;
    fn list_by_status(&self, status: ReadingStatus) -> AppResult<Vec<Book>>;
    /// Favorite books that are finished
    fn list_favorites(&self, limit: usize) -> AppResult<Vec<Book>>;
    fn list_ids(&self) -> AppResult<HashSet<BookId>>;
    fn delete(&self, id: BookId) -> AppResult<()>;
    fn exists(&self, id: BookId) -> AppResult<bool>;
    fn count_by_status(&self, status: ReadingStatus) -> AppResult<u32>;
    /// Mean rating of rated, finished books
    fn average_rating_finished(&self) -> AppResult<Option<f64>>;
    fn delete_all(&self) -> AppResult<usize>;
    /// Store `books` in one transaction, optionally clearing the table first.
    /// Nothing changes if any write fails.
    fn replace_all(&self, books: &[Book], clear_first: bool) -> AppResult<usize>;
}

const BOOK_COLUMNS: &str = "id, title, authors, subjects, languages, formats, reading_status,
     rating, start_date, finish_date, review, is_favorite, date_added";

/// Position of `rating` in [`BOOK_COLUMNS`]
const RATING_COLUMN: usize = 7;

pub struct SqliteBookRepository {
    pool: Arc<ConnectionPool>,
}

fn to_sql_date(date: &DateTime<Utc>) -> String {
    // Fixed width so that text ordering matches chronological ordering
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_sql_date(raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Insert or replace one row; works on a pooled connection or a transaction
fn insert_book(conn: &Connection, book: &Book) -> AppResult<()> {
    let authors_json = serde_json::to_string(&book.authors)?;
    let subjects_json = serde_json::to_string(&book.subjects)?;
    let languages_json = serde_json::to_string(&book.languages)?;
    let formats_json = serde_json::to_string(&book.formats)?;

    conn.execute(
        "INSERT OR REPLACE INTO books (
            id, title, authors, subjects, languages, formats, reading_status,
            rating, start_date, finish_date, review, is_favorite, date_added
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            book.id.0,
            book.title,
            authors_json,
            subjects_json,
            languages_json,
            formats_json,
            book.reading_status.as_str(),
            book.rating.map(i64::from),
            book.start_date.as_ref().map(to_sql_date),
            book.finish_date.as_ref().map(to_sql_date),
            book.review,
            book.is_favorite,
            to_sql_date(&book.date_added),
        ],
    )?;

    Ok(())
}

impl SqliteBookRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to Book - returns rusqlite::Error for query_map compatibility
    fn row_to_book(row: &Row) -> Result<Book, rusqlite::Error> {
        let id: i64 = row.get("id")?;
        let title: String = row.get("title")?;

        let authors_json: String = row.get("authors")?;
        let authors: Vec<String> = serde_json::from_str(&authors_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let subjects_json: String = row.get("subjects")?;
        let subjects: Vec<String> = serde_json::from_str(&subjects_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let languages_json: String = row.get("languages")?;
        let languages: Vec<String> = serde_json::from_str(&languages_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let formats_json: String = row.get("formats")?;
        let formats: BTreeMap<String, String> = serde_json::from_str(&formats_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let status_str: String = row.get("reading_status")?;
        let reading_status = match status_str.as_str() {
            "TO_READ" => ReadingStatus::ToRead,
            "READING" => ReadingStatus::Reading,
            "FINISHED" => ReadingStatus::Finished,
            _ => return Err(rusqlite::Error::InvalidQuery),
        };

        let rating = row
            .get::<_, Option<i64>>("rating")?
            .map(|r| {
                u8::try_from(r).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        RATING_COLUMN,
                        rusqlite::types::Type::Integer,
                        Box::new(e),
                    )
                })
            })
            .transpose()?;

        let start_date = row
            .get::<_, Option<String>>("start_date")?
            .map(|s| parse_sql_date(&s))
            .transpose()?;

        let finish_date = row
            .get::<_, Option<String>>("finish_date")?
            .map(|s| parse_sql_date(&s))
            .transpose()?;

        let date_added = parse_sql_date(&row.get::<_, String>("date_added")?)?;

        Ok(Book {
            id: BookId(id),
            title,
            authors,
            subjects,
            languages,
            formats,
            reading_status,
            rating,
            start_date,
            finish_date,
            review: row.get("review")?,
            is_favorite: row.get("is_favorite")?,
            date_added,
        })
    }

    fn query_books(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<Book>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;

        let books: Vec<Book> = stmt
            .query_map(params, Self::row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(books)
    }
}

impl BookRepository for SqliteBookRepository {
    fn save(&self, book: &Book) -> AppResult<()> {
        let conn = self.pool.get()?;
        insert_book(&conn, book)
    }

    fn replace_all(&self, books: &[Book], clear_first: bool) -> AppResult<usize> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        if clear_first {
            let removed = tx.execute("DELETE FROM books", [])?;
            log::debug!("Cleared {} books inside import transaction", removed);
        }
        for book in books {
            insert_book(&tx, book)?;
        }

        tx.commit()?;
        Ok(books.len())
    }

    fn get_by_id(&self, id: BookId) -> AppResult<Option<Book>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM books WHERE id = ?1", BOOK_COLUMNS))?;

        match stmt.query_row(params![id.0], Self::row_to_book) {
            Ok(book) => Ok(Some(book)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Book>> {
        self.query_books(
            &format!("SELECT {} FROM books ORDER BY date_added DESC, id", BOOK_COLUMNS),
            &[],
        )
    }

    fn list_by_status(&self, status: ReadingStatus) -> AppResult<Vec<Book>> {
        let order_by = match status {
            ReadingStatus::ToRead => "date_added DESC",
            ReadingStatus::Reading => "start_date DESC",
            ReadingStatus::Finished => "finish_date DESC",
        };

        self.query_books(
            &format!(
                "SELECT {} FROM books WHERE reading_status = ?1 ORDER BY {}, id",
                BOOK_COLUMNS, order_by
            ),
            &[&status.as_str()],
        )
    }

    fn list_favorites(&self, limit: usize) -> AppResult<Vec<Book>> {
        let limit = limit as i64;
        self.query_books(
            &format!(
                "SELECT {} FROM books
                 WHERE is_favorite = 1 AND reading_status = 'FINISHED'
                 ORDER BY finish_date DESC, id
                 LIMIT ?1",
                BOOK_COLUMNS
            ),
            &[&limit],
        )
    }

    fn list_ids(&self) -> AppResult<HashSet<BookId>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id FROM books")?;

        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .map(|r| r.map(BookId))
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(ids)
    }

    fn delete(&self, id: BookId) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM books WHERE id = ?1", params![id.0])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn exists(&self, id: BookId) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM books WHERE id = ?1",
            params![id.0],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn count_by_status(&self, status: ReadingStatus) -> AppResult<u32> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM books WHERE reading_status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;

        Ok(count as u32)
    }

    fn average_rating_finished(&self) -> AppResult<Option<f64>> {
        let conn = self.pool.get()?;

        let avg: Option<f64> = conn.query_row(
            "SELECT AVG(rating) FROM books WHERE rating IS NOT NULL AND reading_status = 'FINISHED'",
            [],
            |row| row.get(0),
        )?;

        Ok(avg)
    }

    fn delete_all(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let removed = conn.execute("DELETE FROM books", [])?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use chrono::{Duration, TimeZone};

    fn repo() -> SqliteBookRepository {
        SqliteBookRepository::new(test_pool())
    }

    fn book(id: i64, title: &str) -> Book {
        let mut b = Book::new(BookId(id), title, vec!["Author One".into(), "Author Two".into()]);
        b.languages = vec!["en".into()];
        b.formats.insert("image/jpeg".into(), "https://covers/1.jpg".into());
        b
    }

    #[test]
    fn test_save_and_get_round_trip() {
        let repo = repo();
        let mut original = book(11, "Alice's Adventures in Wonderland");
        original.reading_status = ReadingStatus::Finished;
        original.rating = Some(4);
        original.review = Some("Curiouser and curiouser".into());
        original.start_date = Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        original.finish_date = Some(Utc.with_ymd_and_hms(2024, 1, 9, 21, 30, 0).unwrap());
        original.is_favorite = true;

        repo.save(&original).unwrap();
        let loaded = repo.get_by_id(BookId(11)).unwrap().unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_get_missing_returns_none() {
        assert!(repo().get_by_id(BookId(404)).unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_existing() {
        let repo = repo();
        repo.save(&book(1, "First title")).unwrap();
        repo.save(&book(1, "Second title")).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Second title");
    }

    #[test]
    fn test_list_by_status_ordering() {
        let repo = repo();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let mut early = book(1, "Early");
        early.reading_status = ReadingStatus::Finished;
        early.finish_date = Some(base);
        let mut late = book(2, "Late");
        late.reading_status = ReadingStatus::Finished;
        late.finish_date = Some(base + Duration::days(3));
        let mut queued = book(3, "Queued");
        queued.date_added = base;

        repo.save(&early).unwrap();
        repo.save(&late).unwrap();
        repo.save(&queued).unwrap();

        let finished = repo.list_by_status(ReadingStatus::Finished).unwrap();
        let titles: Vec<_> = finished.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Late", "Early"]);

        let to_read = repo.list_by_status(ReadingStatus::ToRead).unwrap();
        assert_eq!(to_read.len(), 1);
        assert_eq!(repo.count_by_status(ReadingStatus::Finished).unwrap(), 2);
        assert_eq!(repo.count_by_status(ReadingStatus::Reading).unwrap(), 0);
    }

    #[test]
    fn test_favorites_only_finished_and_limited() {
        let repo = repo();
        for id in 1..=5 {
            let mut b = book(id, &format!("Fav {}", id));
            b.is_favorite = true;
            b.reading_status = ReadingStatus::Finished;
            repo.save(&b).unwrap();
        }
        let mut unfinished = book(6, "Unfinished favorite");
        unfinished.is_favorite = true;
        repo.save(&unfinished).unwrap();

        let favs = repo.list_favorites(3).unwrap();
        assert_eq!(favs.len(), 3);
        assert!(favs.iter().all(|b| b.reading_status == ReadingStatus::Finished));
    }

    #[test]
    fn test_average_rating_ignores_unfinished() {
        let repo = repo();
        assert_eq!(repo.average_rating_finished().unwrap(), None);

        let mut a = book(1, "A");
        a.reading_status = ReadingStatus::Finished;
        a.rating = Some(5);
        let mut b = book(2, "B");
        b.reading_status = ReadingStatus::Finished;
        b.rating = Some(2);
        let mut c = book(3, "C");
        c.rating = Some(1);
        for x in [&a, &b, &c] {
            repo.save(x).unwrap();
        }

        assert_eq!(repo.average_rating_finished().unwrap(), Some(3.5));
    }

    #[test]
    fn test_delete_and_ids() {
        let repo = repo();
        repo.save(&book(1, "One")).unwrap();
        repo.save(&book(2, "Two")).unwrap();

        let ids = repo.list_ids().unwrap();
        assert!(ids.contains(&BookId(1)) && ids.contains(&BookId(2)));

        repo.delete(BookId(1)).unwrap();
        assert!(!repo.exists(BookId(1)).unwrap());
        assert!(matches!(repo.delete(BookId(1)), Err(AppError::NotFound)));

        assert_eq!(repo.delete_all().unwrap(), 1);
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_replace_all_swaps_library() {
        let repo = repo();
        repo.save(&book(1, "Old")).unwrap();

        let stored = repo.replace_all(&[book(2, "New"), book(3, "Newer")], true).unwrap();
        assert_eq!(stored, 2);

        let ids = repo.list_ids().unwrap();
        assert_eq!(ids, HashSet::from([BookId(2), BookId(3)]));
    }

    #[test]
    fn test_replace_all_rolls_back_on_failed_write() {
        let repo = repo();
        for id in 100..105 {
            repo.save(&book(id, &format!("Kept {}", id))).unwrap();
        }

        // The schema rejects this rating, so the second insert fails
        let mut rejected = book(2, "Rejected");
        rejected.rating = Some(9);

        let result = repo.replace_all(&[book(1, "Accepted"), rejected], true);
        assert!(matches!(result, Err(AppError::Database(_))));

        let ids = repo.list_ids().unwrap();
        assert_eq!(ids, (100..105).map(BookId).collect::<HashSet<_>>());
    }

    #[test]
    fn test_out_of_range_rating_is_a_decode_error() {
        let pool = test_pool();
        let repo = SqliteBookRepository::new(Arc::clone(&pool));
        repo.save(&book(1, "Legacy row")).unwrap();
        {
            let conn = pool.get().unwrap();
            conn.execute_batch(
                "PRAGMA ignore_check_constraints = ON;
                 UPDATE books SET rating = 300 WHERE id = 1;",
            )
            .unwrap();
        }

        assert!(matches!(
            repo.get_by_id(BookId(1)),
            Err(AppError::Database(rusqlite::Error::FromSqlConversionFailure(..)))
        ));
    }
}
