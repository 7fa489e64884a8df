// src/application/commands/backup_commands.rs

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::application::commands::CommandResult;
use crate::application::{dto::*, state::AppState};
use crate::services::ImportMode;

/// Write a backup file into `dir`, or the configured export directory.
pub fn export_library(state: &AppState, dir: Option<&Path>) -> CommandResult<ExportDto> {
    let dir: PathBuf = dir.map(Path::to_path_buf).unwrap_or_else(|| state.export_dir());

    let exported = state.backup_service.export_to(&dir, Utc::now())?;

    Ok(ExportDto {
        path: exported.path.display().to_string(),
        book_count: exported.book_count,
    })
}

/// Backup content without writing a file
pub fn export_library_json(state: &AppState) -> CommandResult<String> {
    Ok(state.backup_service.export_json()?)
}

/// Load a backup file. Without `merge` the library is replaced.
pub fn import_library(state: &AppState, path: &Path, merge: bool) -> CommandResult<ImportSummaryDto> {
    let mode = if merge {
        ImportMode::Merge
    } else {
        ImportMode::Replace
    };

    let summary = state.backup_service.import_from(path, mode)?;
    Ok(ImportSummaryDto::from(summary))
}
