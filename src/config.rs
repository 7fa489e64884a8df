// src/config.rs
//
// Application configuration (config.toml)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::book::Language;
use crate::error::{AppError, AppResult};

/// Root application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database file; the platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Where `export` writes backups; the current directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// Preferred search language
    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub catalogs: CatalogsConfig,
}

/// Shared HTTP client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for catalog requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogsConfig {
    #[serde(default = "defaults::gutendex")]
    pub gutendex: CatalogConfig,

    #[serde(default = "defaults::open_library")]
    pub open_library: CatalogConfig,

    #[serde(default = "defaults::google_books")]
    pub google_books: CatalogConfig,
}

impl Default for CatalogsConfig {
    fn default() -> Self {
        Self {
            gutendex: defaults::gutendex(),
            open_library: defaults::open_library(),
            google_books: defaults::google_books(),
        }
    }
}

/// One search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// Root URL, without trailing path
    pub base_url: String,

    /// Maximum results requested per search (ignored by paginated catalogs)
    #[serde(default = "defaults::limit")]
    pub limit: u32,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or the defaults when no file exists yet.
    ///
    /// A file that exists but does not parse is an error, never silently
    /// replaced by defaults.
    pub fn load_if_exists(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path).map_err(|e| {
            AppError::config(format!("Could not read {}: {}", path.display(), e))
        })
    }

    /// Persist a new search language, keeping every other setting in the file.
    pub fn set_language(path: impl AsRef<Path>, language: Language) -> AppResult<Self> {
        let path = path.as_ref();
        let mut config = Self::load_if_exists(path)?;
        config.language = language;
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as TOML, creating the parent directory.
    pub fn save(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> AppResult<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        for (name, catalog) in self.catalogs.iter() {
            if !catalog.base_url.starts_with("http://") && !catalog.base_url.starts_with("https://") {
                return Err(AppError::config(format!(
                    "catalogs.{}.base_url must be an http(s) URL",
                    name
                )));
            }
            if catalog.limit == 0 {
                return Err(AppError::config(format!("catalogs.{}.limit must be > 0", name)));
            }
        }
        if !self.catalogs.iter().any(|(_, c)| c.enabled) {
            return Err(AppError::config("At least one catalog must be enabled"));
        }
        Ok(())
    }

    /// `{config_dir}/booktracker/config.toml`
    pub fn default_path() -> AppResult<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| AppError::config("Could not determine config directory"))?;
        Ok(dir.join("booktracker").join("config.toml"))
    }
}

impl CatalogsConfig {
    /// Catalogs in search order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &CatalogConfig)> {
        [
            ("gutendex", &self.gutendex),
            ("open_library", &self.open_library),
            ("google_books", &self.google_books),
        ]
        .into_iter()
    }
}

mod defaults {
    use super::CatalogConfig;

    pub fn timeout() -> u64 {
        30
    }

    pub fn user_agent() -> String {
        format!("booktracker/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn enabled() -> bool {
        true
    }

    pub fn limit() -> u32 {
        20
    }

    fn catalog(base_url: &str) -> CatalogConfig {
        CatalogConfig {
            enabled: true,
            base_url: base_url.to_string(),
            limit: limit(),
        }
    }

    pub fn gutendex() -> CatalogConfig {
        catalog("https://gutendex.com")
    }

    pub fn open_library() -> CatalogConfig {
        catalog("https://openlibrary.org")
    }

    pub fn google_books() -> CatalogConfig {
        catalog("https://www.googleapis.com")
    }
}
