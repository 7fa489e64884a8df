use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Identifier of a tracked book
///
/// Values come from the catalog that produced the book: Gutendex ids are used
/// as-is, other catalogs derive one from their own string key
/// (see [`BookId::from_source_key`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub i64);

impl BookId {
    /// Offset applied to Open Library keys
    pub const OPEN_LIBRARY_OFFSET: i32 = 1_000_000;
    /// Offset applied to Google Books volume ids
    pub const GOOGLE_BOOKS_OFFSET: i32 = 2_000_000;

    /// Synthesize an id from a catalog key and a per-source offset.
    ///
    /// The arithmetic wraps on 32 bits so ids stay identical to those found in
    /// existing backup files.
    pub fn from_source_key(key: &str, offset: i32) -> Self {
        BookId(legacy_string_hash(key).wrapping_add(offset) as i64)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(BookId)
            .map_err(|_| DomainError::InvariantViolation(format!("Invalid book id: {}", s)))
    }
}

/// 32-bit polynomial string hash over UTF-16 code units (`h = 31*h + c`).
pub fn legacy_string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Current time at millisecond precision, the resolution of stored dates
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Reading bucket a book belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingStatus {
    #[default]
    ToRead,
    Reading,
    Finished,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::ToRead,
        ReadingStatus::Reading,
        ReadingStatus::Finished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::ToRead => "TO_READ",
            ReadingStatus::Reading => "READING",
            ReadingStatus::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "to_read" | "toread" => Ok(ReadingStatus::ToRead),
            "reading" => Ok(ReadingStatus::Reading),
            "finished" | "read" => Ok(ReadingStatus::Finished),
            _ => Err(DomainError::InvariantViolation(format!(
                "Unknown reading status: {}",
                s
            ))),
        }
    }
}

/// Preferred language for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Spanish,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
        }
    }

    /// Unknown codes fall back to the default language.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Language::English,
            _ => Language::Spanish,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A book, either fresh from a catalog search or tracked in the local library
///
/// The serialized form (camelCase keys, epoch-millisecond dates) is the
/// backup file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,

    pub title: String,

    #[serde(default)]
    pub authors: Vec<String>,

    #[serde(default)]
    pub subjects: Vec<String>,

    /// Language codes as reported by the catalog
    #[serde(default)]
    pub languages: Vec<String>,

    /// MIME type -> URL (cover images, downloadable formats)
    #[serde(default)]
    pub formats: BTreeMap<String, String>,

    #[serde(default)]
    pub reading_status: ReadingStatus,

    /// 1..=5 stars
    #[serde(default)]
    pub rating: Option<u8>,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub finish_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub review: Option<String>,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default = "now_millis", with = "chrono::serde::ts_milliseconds")]
    pub date_added: DateTime<Utc>,
}

impl Book {
    pub fn new(id: BookId, title: impl Into<String>, authors: Vec<String>) -> Self {
        Self {
            id,
            title: title.into(),
            authors,
            subjects: Vec::new(),
            languages: Vec::new(),
            formats: BTreeMap::new(),
            reading_status: ReadingStatus::ToRead,
            rating: None,
            start_date: None,
            finish_date: None,
            review: None,
            is_favorite: false,
            date_added: now_millis(),
        }
    }

    pub fn authors_string(&self) -> String {
        self.authors.join(", ")
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.formats.get("image/jpeg").map(String::as_str)
    }

    /// Key used to collapse the same work reported by several catalogs
    pub fn dedup_key(&self) -> String {
        format!(
            "{}_{}",
            self.title.to_lowercase(),
            self.authors_string().to_lowercase()
        )
    }

    /// True if any reported language code contains `code` (case-insensitive).
    pub fn matches_language(&self, code: &str) -> bool {
        let code = code.to_lowercase();
        self.languages
            .iter()
            .any(|lang| lang.to_lowercase().contains(&code))
    }

    /// Fold legacy encodings into their canonical form: a zero rating means
    /// "unrated" and a blank review means "no review".
    pub fn normalize(&mut self) {
        if self.rating == Some(0) {
            self.rating = None;
        }
        if self
            .review
            .as_ref()
            .map(|r| r.trim().is_empty())
            .unwrap_or(false)
        {
            self.review = None;
        }
    }

    /// Whole days spent reading, never less than one.
    pub fn reading_days(&self) -> Option<i64> {
        match (self.start_date, self.finish_date) {
            (Some(start), Some(finish)) => Some((finish - start).num_days().max(1)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_legacy_string_hash_matches_reference_values() {
        assert_eq!(legacy_string_hash(""), 0);
        assert_eq!(legacy_string_hash("a"), 97);
        assert_eq!(legacy_string_hash("hello"), 99162322);
        // Overflows and wraps
        assert_eq!(legacy_string_hash("polygenelubricants"), i32::MIN);
    }

    #[test]
    fn test_source_offsets_differ() {
        let ol = BookId::from_source_key("abc", BookId::OPEN_LIBRARY_OFFSET);
        let gb = BookId::from_source_key("abc", BookId::GOOGLE_BOOKS_OFFSET);
        assert_eq!(gb.0 - ol.0, 1_000_000);
    }

    #[test]
    fn test_reading_status_parsing() {
        assert_eq!("to-read".parse::<ReadingStatus>().unwrap(), ReadingStatus::ToRead);
        assert_eq!("TO_READ".parse::<ReadingStatus>().unwrap(), ReadingStatus::ToRead);
        assert_eq!("Reading".parse::<ReadingStatus>().unwrap(), ReadingStatus::Reading);
        assert_eq!("finished".parse::<ReadingStatus>().unwrap(), ReadingStatus::Finished);
        assert!("abandoned".parse::<ReadingStatus>().is_err());
    }

    #[test]
    fn test_language_fallback() {
        assert_eq!(Language::from_code("EN"), Language::English);
        assert_eq!(Language::from_code("fr"), Language::Spanish);
        assert_eq!(Language::default().code(), "es");
    }

    #[test]
    fn test_backup_field_names() {
        let mut book = Book::new(BookId(84), "Frankenstein", vec!["Shelley, Mary".into()]);
        book.date_added = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        book.is_favorite = true;

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["readingStatus"], "TO_READ");
        assert_eq!(json["isFavorite"], true);
        assert_eq!(json["dateAdded"], 1_700_000_000_000i64);
        assert_eq!(json["id"], 84);
    }

    #[test]
    fn test_minimal_record_deserializes_with_defaults() {
        let book: Book = serde_json::from_str(r#"{"id": 7, "title": "Dracula"}"#).unwrap();
        assert_eq!(book.reading_status, ReadingStatus::ToRead);
        assert!(book.authors.is_empty());
        assert!(book.start_date.is_none());
    }

    #[test]
    fn test_reading_days_clamped() {
        let mut book = Book::new(BookId(1), "Short", vec![]);
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        book.start_date = Some(start);
        book.finish_date = Some(start + chrono::Duration::hours(5));
        assert_eq!(book.reading_days(), Some(1));

        book.finish_date = Some(start + chrono::Duration::days(10));
        assert_eq!(book.reading_days(), Some(10));
    }

    #[test]
    fn test_normalize() {
        let mut book = Book::new(BookId(1), "T", vec![]);
        book.rating = Some(0);
        book.review = Some("   ".into());
        book.normalize();
        assert_eq!(book.rating, None);
        assert_eq!(book.review, None);
    }
}
