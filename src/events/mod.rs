// src/events/mod.rs
//
// Internal Event System - Public API

pub mod bus;
pub mod handlers;
pub mod types;

// ============================================================================
// PUBLIC EXPORTS
// ============================================================================

pub use types::DomainEvent;

pub use types::{
    // Library
    BookAdded,
    BookRated,
    BookRemoved,
    BookReviewed,
    FavoriteToggled,
    LibraryCleared,
    ReadingDatesUpdated,
    ReadingStatusChanged,

    // Backup
    LibraryExported,
    LibraryImported,

    // Search
    SearchCompleted,
};

pub use bus::{EventBus, EventLogEntry};
pub use handlers::register_activity_log;
