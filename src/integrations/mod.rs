// src/integrations/mod.rs
//
// External Integrations Module
//
// One client per book catalog, all behind `CatalogSource`.

pub mod catalog;
pub mod google_books;
pub mod gutendex;
pub mod open_library;

use std::sync::Arc;

use reqwest::Client;

pub use catalog::{create_http_client, CatalogSource};
pub use google_books::GoogleBooksClient;
pub use gutendex::GutendexClient;
pub use open_library::OpenLibraryClient;

use crate::config::CatalogsConfig;

/// Build the enabled catalogs in search order: Gutendex, Open Library, Google Books.
pub fn build_catalogs(config: &CatalogsConfig, http: &Client) -> Vec<Arc<dyn CatalogSource>> {
    let mut sources: Vec<Arc<dyn CatalogSource>> = Vec::new();

    if config.gutendex.enabled {
        sources.push(Arc::new(GutendexClient::new(
            http.clone(),
            config.gutendex.base_url.clone(),
        )));
    }
    if config.open_library.enabled {
        sources.push(Arc::new(OpenLibraryClient::new(
            http.clone(),
            config.open_library.base_url.clone(),
            config.open_library.limit,
        )));
    }
    if config.google_books.enabled {
        sources.push(Arc::new(GoogleBooksClient::new(
            http.clone(),
            config.google_books.base_url.clone(),
            config.google_books.limit,
        )));
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_catalogs_respects_order_and_flags() {
        let http = Client::new();
        let mut config = CatalogsConfig::default();

        let names: Vec<_> = build_catalogs(&config, &http).iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["gutendex", "open_library", "google_books"]);

        config.open_library.enabled = false;
        let names: Vec<_> = build_catalogs(&config, &http).iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["gutendex", "google_books"]);
    }
}
