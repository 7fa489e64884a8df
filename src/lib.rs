// src/lib.rs
// BookTracker - Local-first personal book tracker
//
// Architecture:
// - Domain-centric: books, reading buckets and statistics live in `domain`
// - Event-driven: services announce every change on the event bus
// - Explicit: No implicit behavior, no magic
// - Local-first: the library is a SQLite file the user owns
// - Catalogs: Gutendex, Open Library and Google Books are searched together

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_book,
    // Book
    Book,
    BookDuration,
    BookId,
    DomainError,
    Language,
    ReadingStatistics,
    ReadingStatus,
    // Statistics
    StatisticsSnapshot,
    StatisticsType,
    UserStats,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Configuration
// ============================================================================

pub use config::{AppConfig, CatalogConfig, CatalogsConfig, HttpConfig};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{register_activity_log, DomainEvent, EventBus, EventLogEntry};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    BookRepository, SqliteBookRepository, SqliteStatisticsRepository, StatisticsRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    BackupService, ExportedBackup, ImportMode, ImportSummary, LibraryService, SearchHit, SearchService,
    StatisticsService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, ErrorResponse, ErrorType};

// Re-export application submodules
pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    build_catalogs, create_http_client, CatalogSource, GoogleBooksClient, GutendexClient,
    OpenLibraryClient,
};
