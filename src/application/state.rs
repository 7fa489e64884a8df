// src/application/state.rs

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::ConnectionPool;
use crate::domain::Language;
use crate::events::{register_activity_log, EventBus};
use crate::integrations::CatalogSource;
use crate::repositories::{SqliteBookRepository, SqliteStatisticsRepository};
use crate::services::{BackupService, LibraryService, SearchService, StatisticsService};

/// Application state shared by every command.
/// All fields are Arc-wrapped for thread-safe sharing across commands.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub library_service: Arc<LibraryService>,
    pub search_service: Arc<SearchService>,
    pub statistics_service: Arc<StatisticsService>,
    pub backup_service: Arc<BackupService>,
    pub config: AppConfig,
}

impl AppState {
    /// Wire repositories, services and event handlers over an initialized pool.
    pub fn new(
        pool: Arc<ConnectionPool>,
        sources: Vec<Arc<dyn CatalogSource>>,
        config: AppConfig,
    ) -> Self {
        // Event bus
        let event_bus = Arc::new(EventBus::new());

        // Repositories
        let book_repo = Arc::new(SqliteBookRepository::new(Arc::clone(&pool)));
        let statistics_repo = Arc::new(SqliteStatisticsRepository::new(pool));

        // Services
        let library_service = Arc::new(LibraryService::new(
            book_repo.clone(),
            Arc::clone(&event_bus),
        ));
        let search_service = Arc::new(SearchService::new(
            sources,
            book_repo.clone(),
            Arc::clone(&event_bus),
        ));
        let statistics_service = Arc::new(StatisticsService::new(
            statistics_repo,
            book_repo.clone(),
        ));
        let backup_service = Arc::new(BackupService::new(book_repo, Arc::clone(&event_bus)));

        // Event handlers
        register_activity_log(&event_bus);

        Self {
            event_bus,
            library_service,
            search_service,
            statistics_service,
            backup_service,
            config,
        }
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    /// Configured export directory, or the current directory
    pub fn export_dir(&self) -> PathBuf {
        self.config
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
