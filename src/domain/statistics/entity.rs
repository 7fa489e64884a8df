use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::book::{Book, ReadingStatus};
use crate::domain::DomainError;

/// Represents a derived statistics snapshot
/// Statistics are NEVER a source of truth and can be recalculated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub id: Uuid,
    pub kind: StatisticsType,
    /// The computed figures, stored as JSON
    pub value: serde_json::Value,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsType {
    /// Library totals and highlights
    Summary,
    /// Reading pace and calendar breakdown of finished books
    Reading,
}

impl StatisticsSnapshot {
    pub fn new(kind: StatisticsType, value: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            value,
            generated_at: crate::domain::book::now_millis(),
        }
    }
}

impl std::fmt::Display for StatisticsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatisticsType::Summary => write!(f, "summary"),
            StatisticsType::Reading => write!(f, "reading"),
        }
    }
}

impl FromStr for StatisticsType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(StatisticsType::Summary),
            "reading" => Ok(StatisticsType::Reading),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown statistics type: {}",
                other
            ))),
        }
    }
}

/// Library totals shown on the profile screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total_books_read: u32,
    pub total_books_to_read: u32,
    pub total_books_reading: u32,
    pub average_rating: f64,
    pub currently_reading: Vec<Book>,
    pub favorite_books: Vec<Book>,
}

/// A finished book and how long it took
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDuration {
    pub title: String,
    pub days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingStatistics {
    pub total_finished: u32,
    pub average_rating: f64,
    pub average_reading_days: Option<f64>,
    pub fastest: Option<BookDuration>,
    pub slowest: Option<BookDuration>,
    pub books_this_year: u32,
    pub books_this_month: u32,
    /// Finished books per month of the current year, January first
    pub monthly_counts: [u32; 12],
    pub reader_title: String,
}

impl ReadingStatistics {
    /// Compute statistics from a set of books. Only finished books count.
    pub fn compute(books: &[Book], now: DateTime<Utc>) -> Self {
        let finished: Vec<&Book> = books
            .iter()
            .filter(|b| b.reading_status == ReadingStatus::Finished)
            .collect();

        let ratings: Vec<f64> = finished
            .iter()
            .filter_map(|b| b.rating)
            .filter(|r| *r > 0)
            .map(f64::from)
            .collect();
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().sum::<f64>() / ratings.len() as f64
        };

        let durations: Vec<BookDuration> = finished
            .iter()
            .filter_map(|b| {
                b.reading_days().map(|days| BookDuration {
                    title: b.title.clone(),
                    days,
                })
            })
            .collect();

        let average_reading_days = if durations.is_empty() {
            None
        } else {
            Some(durations.iter().map(|d| d.days as f64).sum::<f64>() / durations.len() as f64)
        };

        // First minimum / first maximum wins on ties
        let fastest = durations
            .iter()
            .fold(None::<&BookDuration>, |best, d| match best {
                Some(b) if b.days <= d.days => Some(b),
                _ => Some(d),
            })
            .cloned();
        let slowest = durations
            .iter()
            .fold(None::<&BookDuration>, |best, d| match best {
                Some(b) if b.days >= d.days => Some(b),
                _ => Some(d),
            })
            .cloned();

        let mut monthly_counts = [0u32; 12];
        let mut books_this_year = 0;
        let mut books_this_month = 0;
        for finish in finished.iter().filter_map(|b| b.finish_date) {
            if finish.year() == now.year() {
                books_this_year += 1;
                monthly_counts[finish.month0() as usize] += 1;
                if finish.month() == now.month() {
                    books_this_month += 1;
                }
            }
        }

        Self {
            total_finished: finished.len() as u32,
            average_rating,
            average_reading_days,
            fastest,
            slowest,
            books_this_year,
            books_this_month,
            monthly_counts,
            reader_title: reader_title(books_this_year).to_string(),
        }
    }
}

/// Reader rank earned from the number of books finished this year
pub fn reader_title(books_this_year: u32) -> &'static str {
    match books_this_year {
        0 => "New reader",
        1..=4 => "Casual reader",
        5..=11 => "Passionate reader",
        12..=23 => "Voracious reader",
        24..=49 => "Extreme reader",
        _ => "Literary legend",
    }
}
