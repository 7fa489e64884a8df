// events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::book::{BookId, ReadingStatus};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($ty:ident) => {
        impl DomainEvent for $ty {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                stringify!($ty)
            }
        }
    };
}

// ============================================================================
// LIBRARY EVENTS
// ============================================================================

/// Emitted when a book is stored (new or replaced)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
    pub title: String,
    pub status: ReadingStatus,
}

impl BookAdded {
    pub fn new(book_id: BookId, title: String, status: ReadingStatus) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
            title,
            status,
        }
    }
}

impl_domain_event!(BookAdded);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
}

impl BookRemoved {
    pub fn new(book_id: BookId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
        }
    }
}

impl_domain_event!(BookRemoved);

/// Emitted when a book moves between reading buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingStatusChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
    pub from: ReadingStatus,
    pub to: ReadingStatus,
}

impl ReadingStatusChanged {
    pub fn new(book_id: BookId, from: ReadingStatus, to: ReadingStatus) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
            from,
            to,
        }
    }
}

impl_domain_event!(ReadingStatusChanged);

/// `rating` is None when the rating was cleared
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
    pub rating: Option<u8>,
}

impl BookRated {
    pub fn new(book_id: BookId, rating: Option<u8>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
            rating,
        }
    }
}

impl_domain_event!(BookRated);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookReviewed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
    pub has_review: bool,
}

impl BookReviewed {
    pub fn new(book_id: BookId, has_review: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
            has_review,
        }
    }
}

impl_domain_event!(BookReviewed);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteToggled {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
    pub is_favorite: bool,
}

impl FavoriteToggled {
    pub fn new(book_id: BookId, is_favorite: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
            is_favorite,
        }
    }
}

impl_domain_event!(FavoriteToggled);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingDatesUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
    pub start_date: Option<DateTime<Utc>>,
    pub finish_date: Option<DateTime<Utc>>,
}

impl ReadingDatesUpdated {
    pub fn new(
        book_id: BookId,
        start_date: Option<DateTime<Utc>>,
        finish_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
            start_date,
            finish_date,
        }
    }
}

impl_domain_event!(ReadingDatesUpdated);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub books_removed: usize,
}

impl LibraryCleared {
    pub fn new(books_removed: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            books_removed,
        }
    }
}

impl_domain_event!(LibraryCleared);

// ============================================================================
// BACKUP EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryImported {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub source: PathBuf,
    pub imported: usize,
    pub skipped: usize,
}

impl LibraryImported {
    pub fn new(source: PathBuf, imported: usize, skipped: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            source,
            imported,
            skipped,
        }
    }
}

impl_domain_event!(LibraryImported);

/// `destination` is None when the backup was produced in memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryExported {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub destination: Option<PathBuf>,
    pub book_count: usize,
}

impl LibraryExported {
    pub fn new(destination: Option<PathBuf>, book_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            destination,
            book_count,
        }
    }
}

impl_domain_event!(LibraryExported);

// ============================================================================
// SEARCH EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCompleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub query: String,
    pub result_count: usize,
    /// Names of catalogs that failed during this search
    pub failed_sources: Vec<String>,
}

impl SearchCompleted {
    pub fn new(query: String, result_count: usize, failed_sources: Vec<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            query,
            result_count,
            failed_sources,
        }
    }
}

impl_domain_event!(SearchCompleted);
