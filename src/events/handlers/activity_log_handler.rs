// src/events/handlers/activity_log_handler.rs
//
// Activity Log Handler
//
// Turns library, backup and search events into structured log records
// under the `booktracker::activity` target.
//
// - Observes only; never calls back into services
// - One record per event

use crate::events::types::{
    BookAdded, BookRated, BookRemoved, BookReviewed, FavoriteToggled, LibraryCleared,
    LibraryExported, LibraryImported, ReadingDatesUpdated, ReadingStatusChanged, SearchCompleted,
};
use crate::events::EventBus;

const TARGET: &str = "booktracker::activity";

/// Registers the activity log handlers with the event bus.
pub fn register_activity_log(bus: &EventBus) {
    bus.subscribe::<BookAdded, _>(|e| {
        log::info!(target: TARGET, "book_added id={} status={} title={:?}", e.book_id, e.status, e.title);
    });

    bus.subscribe::<BookRemoved, _>(|e| {
        log::info!(target: TARGET, "book_removed id={}", e.book_id);
    });

    bus.subscribe::<ReadingStatusChanged, _>(|e| {
        log::info!(target: TARGET, "status_changed id={} from={} to={}", e.book_id, e.from, e.to);
    });

    bus.subscribe::<BookRated, _>(|e| match e.rating {
        Some(rating) => log::info!(target: TARGET, "book_rated id={} rating={}", e.book_id, rating),
        None => log::info!(target: TARGET, "rating_cleared id={}", e.book_id),
    });

    bus.subscribe::<BookReviewed, _>(|e| {
        log::info!(target: TARGET, "book_reviewed id={} has_review={}", e.book_id, e.has_review);
    });

    bus.subscribe::<FavoriteToggled, _>(|e| {
        log::info!(target: TARGET, "favorite_toggled id={} favorite={}", e.book_id, e.is_favorite);
    });

    bus.subscribe::<ReadingDatesUpdated, _>(|e| {
        log::info!(
            target: TARGET,
            "dates_updated id={} start={:?} finish={:?}",
            e.book_id,
            e.start_date.map(|d| d.date_naive()),
            e.finish_date.map(|d| d.date_naive())
        );
    });

    bus.subscribe::<LibraryCleared, _>(|e| {
        log::warn!(target: TARGET, "library_cleared removed={}", e.books_removed);
    });

    bus.subscribe::<LibraryImported, _>(|e| {
        log::info!(
            target: TARGET,
            "library_imported source={} imported={} skipped={}",
            e.source.display(),
            e.imported,
            e.skipped
        );
    });

    bus.subscribe::<LibraryExported, _>(|e| match &e.destination {
        Some(path) => log::info!(target: TARGET, "library_exported path={} books={}", path.display(), e.book_count),
        None => log::info!(target: TARGET, "library_exported books={}", e.book_count),
    });

    bus.subscribe::<SearchCompleted, _>(|e| {
        if e.failed_sources.is_empty() {
            log::info!(target: TARGET, "search query={:?} results={}", e.query, e.result_count);
        } else {
            log::info!(
                target: TARGET,
                "search query={:?} results={} failed_sources={}",
                e.query,
                e.result_count,
                e.failed_sources.join(",")
            );
        }
    });

    log::debug!("Activity log handlers registered");
}
