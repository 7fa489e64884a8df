// src/integrations/gutendex/client.rs
//
// Gutendex (Project Gutenberg) search client

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::book::{Book, BookId};
use crate::error::AppResult;
use crate::integrations::catalog::{endpoint, get_json, CatalogSource};

pub const SOURCE_NAME: &str = "gutendex";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<BookDto>,
}

#[derive(Debug, Deserialize)]
struct BookDto {
    id: i64,
    title: String,
    #[serde(default)]
    authors: Vec<AuthorDto>,
    #[serde(default)]
    subjects: Vec<String>,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    formats: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct AuthorDto {
    name: String,
}

pub struct GutendexClient {
    http: Client,
    base_url: String,
}

impl GutendexClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Gutendex ids are used directly as book ids.
    fn map_book(dto: BookDto) -> Book {
        let mut book = Book::new(
            BookId(dto.id),
            dto.title,
            dto.authors.into_iter().map(|a| a.name).collect(),
        );
        book.subjects = dto.subjects;
        book.languages = dto.languages;
        book.formats = dto.formats;
        book
    }
}

#[async_trait]
impl CatalogSource for GutendexClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let url = endpoint(&self.base_url, "books");
        let response: SearchResponse = get_json(
            &self.http,
            SOURCE_NAME,
            &url,
            &[("search", query.to_string()), ("page", "1".to_string())],
        )
        .await?;

        Ok(response.results.into_iter().map(Self::map_book).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "count": 1,
        "next": null,
        "results": [{
            "id": 1342,
            "title": "Pride and Prejudice",
            "authors": [{"name": "Austen, Jane", "birth_year": 1775, "death_year": 1817}],
            "subjects": ["England -- Fiction", "Courtship -- Fiction"],
            "languages": ["en"],
            "download_count": 52000,
            "formats": {
                "image/jpeg": "https://www.gutenberg.org/cache/epub/1342/pg1342.cover.medium.jpg",
                "text/html": "https://www.gutenberg.org/ebooks/1342.html.images"
            }
        }]
    }"#;

    #[test]
    fn test_map_search_response() {
        let response: SearchResponse = serde_json::from_str(SAMPLE).unwrap();
        let books: Vec<Book> = response.results.into_iter().map(GutendexClient::map_book).collect();

        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.id, BookId(1342));
        assert_eq!(book.authors, vec!["Austen, Jane".to_string()]);
        assert_eq!(book.languages, vec!["en".to_string()]);
        assert!(book.cover_url().unwrap().ends_with("pg1342.cover.medium.jpg"));
        assert_eq!(book.formats.len(), 2);
    }

    #[test]
    fn test_missing_results_is_empty() {
        let response: SearchResponse = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(response.results.is_empty());
    }
}
