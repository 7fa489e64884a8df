// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are front-end-friendly representations
// - DTOs NEVER leak domain invariants
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookDuration, ReadingStatistics, UserStats};
use crate::services::{ImportSummary, SearchHit};

/// Calendar dates are shown without a time component
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// BOOK DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub authors: Vec<String>,
    pub subjects: Vec<String>,
    pub languages: Vec<String>,
    pub cover_url: Option<String>,
    pub reading_status: String,
    pub rating: Option<u8>,
    pub start_date: Option<String>,
    pub finish_date: Option<String>,
    pub reading_days: Option<i64>,
    pub review: Option<String>,
    pub is_favorite: bool,
    pub date_added: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHitDto {
    pub book: BookDto,
    pub in_library: bool,
    pub local_status: Option<String>,
}

// ============================================================================
// STATISTICS DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsDto {
    pub total_books_read: u32,
    pub total_books_to_read: u32,
    pub total_books_reading: u32,
    /// Rounded to one decimal
    pub average_rating: f64,
    pub currently_reading: Vec<BookDto>,
    pub favorite_books: Vec<BookDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDurationDto {
    pub title: String,
    pub days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingStatisticsDto {
    pub total_finished: u32,
    pub average_rating: f64,
    pub average_reading_days: Option<f64>,
    pub fastest: Option<BookDurationDto>,
    pub slowest: Option<BookDurationDto>,
    pub books_this_year: u32,
    pub books_this_month: u32,
    pub monthly_counts: Vec<u32>,
    pub reader_title: String,
}

// ============================================================================
// BACKUP DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummaryDto {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDto {
    pub path: String,
    pub book_count: usize,
}

// ============================================================================
// RESPONSE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// ============================================================================
// CONVERSION HELPERS (Domain → DTO)
// ============================================================================

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            cover_url: book.cover_url().map(str::to_string),
            reading_days: book.reading_days(),
            id: book.id.0,
            title: book.title,
            authors: book.authors,
            subjects: book.subjects,
            languages: book.languages,
            reading_status: book.reading_status.to_string(),
            rating: book.rating,
            start_date: book.start_date.map(|d| d.format(DATE_FORMAT).to_string()),
            finish_date: book.finish_date.map(|d| d.format(DATE_FORMAT).to_string()),
            review: book.review,
            is_favorite: book.is_favorite,
            date_added: book.date_added.to_rfc3339(),
        }
    }
}

impl From<SearchHit> for SearchHitDto {
    fn from(hit: SearchHit) -> Self {
        Self {
            book: BookDto::from(hit.book),
            in_library: hit.in_library,
            local_status: hit.local_status.map(|s| s.to_string()),
        }
    }
}

impl From<UserStats> for UserStatsDto {
    fn from(stats: UserStats) -> Self {
        Self {
            total_books_read: stats.total_books_read,
            total_books_to_read: stats.total_books_to_read,
            total_books_reading: stats.total_books_reading,
            average_rating: round1(stats.average_rating),
            currently_reading: stats.currently_reading.into_iter().map(BookDto::from).collect(),
            favorite_books: stats.favorite_books.into_iter().map(BookDto::from).collect(),
        }
    }
}

impl From<BookDuration> for BookDurationDto {
    fn from(duration: BookDuration) -> Self {
        Self {
            title: duration.title,
            days: duration.days,
        }
    }
}

impl From<ReadingStatistics> for ReadingStatisticsDto {
    fn from(stats: ReadingStatistics) -> Self {
        Self {
            total_finished: stats.total_finished,
            average_rating: round1(stats.average_rating),
            average_reading_days: stats.average_reading_days.map(round1),
            fastest: stats.fastest.map(BookDurationDto::from),
            slowest: stats.slowest.map(BookDurationDto::from),
            books_this_year: stats.books_this_year,
            books_this_month: stats.books_this_month,
            monthly_counts: stats.monthly_counts.to_vec(),
            reader_title: stats.reader_title,
        }
    }
}

impl From<ImportSummary> for ImportSummaryDto {
    fn from(summary: ImportSummary) -> Self {
        Self {
            imported: summary.imported,
            skipped: summary.skipped,
        }
    }
}
