// src/integrations/open_library/client.rs
//
// Open Library search client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::book::{Book, BookId};
use crate::error::AppResult;
use crate::integrations::catalog::{endpoint, get_json, CatalogSource, UNKNOWN};

pub const SOURCE_NAME: &str = "open_library";

const MAX_SUBJECTS: usize = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<DocDto>,
}

#[derive(Debug, Deserialize)]
struct DocDto {
    /// Work key, e.g. "/works/OL45804W"
    key: String,
    title: Option<String>,
    author_name: Option<Vec<String>>,
    subject: Option<Vec<String>>,
    language: Option<Vec<String>>,
    cover_i: Option<i64>,
}

impl DocDto {
    fn cover_url(&self) -> Option<String> {
        self.cover_i
            .map(|id| format!("https://covers.openlibrary.org/b/id/{}-L.jpg", id))
    }
}

pub struct OpenLibraryClient {
    http: Client,
    base_url: String,
    limit: u32,
}

impl OpenLibraryClient {
    pub fn new(http: Client, base_url: impl Into<String>, limit: u32) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            limit,
        }
    }

    fn map_doc(doc: DocDto) -> Book {
        let cover = doc.cover_url();
        let id = BookId::from_source_key(&doc.key, BookId::OPEN_LIBRARY_OFFSET);

        let authors = doc
            .author_name
            .unwrap_or_else(|| vec![UNKNOWN.to_string()]);
        let mut book = Book::new(id, doc.title.unwrap_or_else(|| UNKNOWN.to_string()), authors);

        book.subjects = doc
            .subject
            .map(|s| s.into_iter().take(MAX_SUBJECTS).collect())
            .unwrap_or_default();
        book.languages = doc.language.unwrap_or_default();
        if let Some(url) = cover {
            book.formats.insert("image/jpeg".to_string(), url);
        }
        book
    }
}

#[async_trait]
impl CatalogSource for OpenLibraryClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let url = endpoint(&self.base_url, "search.json");
        let response: SearchResponse = get_json(
            &self.http,
            SOURCE_NAME,
            &url,
            &[("q", query.to_string()), ("limit", self.limit.to_string())],
        )
        .await?;

        Ok(response.docs.into_iter().map(Self::map_doc).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::legacy_string_hash;

    #[test]
    fn test_map_full_doc() {
        let doc: DocDto = serde_json::from_str(
            r#"{
                "key": "/works/OL45804W",
                "title": "Fantastic Mr Fox",
                "author_name": ["Roald Dahl"],
                "subject": ["Animals", "Foxes", "Farmers", "Fiction", "Humor", "Thieves", "Tunnels"],
                "language": ["eng", "spa"],
                "cover_i": 6498519
            }"#,
        )
        .unwrap();

        let book = OpenLibraryClient::map_doc(doc);
        assert_eq!(
            book.id.0,
            legacy_string_hash("/works/OL45804W").wrapping_add(1_000_000) as i64
        );
        assert_eq!(book.subjects.len(), 5);
        assert_eq!(
            book.cover_url(),
            Some("https://covers.openlibrary.org/b/id/6498519-L.jpg")
        );
        assert!(book.matches_language("spa"));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let doc: DocDto = serde_json::from_str(r#"{"key": "/works/OL1W"}"#).unwrap();
        let book = OpenLibraryClient::map_doc(doc);

        assert_eq!(book.title, "Unknown");
        assert_eq!(book.authors, vec!["Unknown".to_string()]);
        assert!(book.subjects.is_empty());
        assert!(book.formats.is_empty());
    }

    #[test]
    fn test_id_is_stable() {
        let a: DocDto = serde_json::from_str(r#"{"key": "/works/OL2W"}"#).unwrap();
        let b: DocDto = serde_json::from_str(r#"{"key": "/works/OL2W", "title": "x"}"#).unwrap();
        assert_eq!(OpenLibraryClient::map_doc(a).id, OpenLibraryClient::map_doc(b).id);
    }
}
