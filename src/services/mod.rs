// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod backup_service;
pub mod library_service;
pub mod search_service;
pub mod statistics_service;

// Re-export all services and their types
pub use backup_service::{BackupService, ExportedBackup, ImportMode, ImportSummary};

pub use library_service::LibraryService;

pub use search_service::{SearchHit, SearchService};

pub use statistics_service::{StatisticsService, FAVORITES_SHOWN};
