// src/services/backup_service.rs
//
// JSON backup of the whole library
//
// The file is a pretty-printed array of books with camelCase keys and
// epoch-millisecond dates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::book::{validate_book, Book};
use crate::error::AppResult;
use crate::events::{EventBus, LibraryExported, LibraryImported};
use crate::repositories::BookRepository;

/// How an import treats the books already stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Clear the library, then load the file
    #[default]
    Replace,
    /// Upsert the file's books, keeping everything else
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// A backup file written by [`BackupService::export_to`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedBackup {
    pub path: PathBuf,
    pub book_count: usize,
}

pub struct BackupService {
    book_repo: Arc<dyn BookRepository>,
    event_bus: Arc<EventBus>,
}

impl BackupService {
    pub fn new(book_repo: Arc<dyn BookRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            book_repo,
            event_bus,
        }
    }

    /// `BookTracker_backup_YYYY-MM-DD_HH-MM-SS.json`
    pub fn backup_file_name(now: DateTime<Utc>) -> String {
        format!("BookTracker_backup_{}.json", now.format("%Y-%m-%d_%H-%M-%S"))
    }

    /// The whole library as backup JSON
    pub fn export_json(&self) -> AppResult<String> {
        let books = self.book_repo.list_all()?;
        let json = serde_json::to_string_pretty(&books)?;

        self.event_bus.emit(LibraryExported::new(None, books.len()));
        Ok(json)
    }

    /// Write a backup file into `dir`.
    pub fn export_to(&self, dir: &Path, now: DateTime<Utc>) -> AppResult<ExportedBackup> {
        let books = self.book_repo.list_all()?;
        let json = serde_json::to_string_pretty(&books)?;

        fs::create_dir_all(dir)?;
        let path = dir.join(Self::backup_file_name(now));
        fs::write(&path, json)?;

        log::info!("Exported {} books to {}", books.len(), path.display());
        self.event_bus
            .emit(LibraryExported::new(Some(path.clone()), books.len()));
        Ok(ExportedBackup {
            path,
            book_count: books.len(),
        })
    }

    /// Load a backup file.
    ///
    /// The file must be a JSON array; anything else fails before the library
    /// is touched. Entries that do not decode or fail validation are skipped.
    pub fn import_from(&self, path: &Path, mode: ImportMode) -> AppResult<ImportSummary> {
        let content = fs::read_to_string(path)?;
        let summary = self.import_json(&content, mode)?;

        self.event_bus.emit(LibraryImported::new(
            path.to_path_buf(),
            summary.imported,
            summary.skipped,
        ));
        Ok(summary)
    }

    pub fn import_json(&self, content: &str, mode: ImportMode) -> AppResult<ImportSummary> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(content)?;

        let mut books = Vec::with_capacity(entries.len());
        let mut summary = ImportSummary::default();

        for (index, entry) in entries.into_iter().enumerate() {
            let mut book: Book = match serde_json::from_value(entry) {
                Ok(book) => book,
                Err(e) => {
                    log::warn!("Skipping backup entry {}: {}", index, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            book.normalize();
            if let Err(e) = validate_book(&book) {
                log::warn!("Skipping backup entry {} ({}): {}", index, book.id, e);
                summary.skipped += 1;
                continue;
            }
            books.push(book);
        }

        // One transaction: a failed write leaves the previous library in place
        summary.imported = self
            .book_repo
            .replace_all(&books, mode == ImportMode::Replace)?;

        log::info!(
            "Imported {} books ({} skipped, mode {:?})",
            summary.imported,
            summary.skipped,
            mode
        );
        Ok(summary)
    }
}
