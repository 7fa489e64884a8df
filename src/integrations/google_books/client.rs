// src/integrations/google_books/client.rs
//
// Google Books volumes search client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::book::{Book, BookId};
use crate::error::AppResult;
use crate::integrations::catalog::{endpoint, get_json, CatalogSource, UNKNOWN};

pub const SOURCE_NAME: &str = "google_books";

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    /// Absent when nothing matched
    items: Option<Vec<VolumeDto>>,
}

#[derive(Debug, Deserialize)]
struct VolumeDto {
    id: String,
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfoDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfoDto {
    title: Option<String>,
    authors: Option<Vec<String>>,
    categories: Option<Vec<String>>,
    language: Option<String>,
    image_links: Option<ImageLinksDto>,
}

#[derive(Debug, Deserialize)]
struct ImageLinksDto {
    thumbnail: Option<String>,
}

pub struct GoogleBooksClient {
    http: Client,
    base_url: String,
    limit: u32,
}

impl GoogleBooksClient {
    pub fn new(http: Client, base_url: impl Into<String>, limit: u32) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            limit,
        }
    }

    fn map_volume(volume: VolumeDto) -> Book {
        let id = BookId::from_source_key(&volume.id, BookId::GOOGLE_BOOKS_OFFSET);
        let info = volume.volume_info;

        let authors = info.authors.unwrap_or_else(|| vec![UNKNOWN.to_string()]);
        let mut book = Book::new(id, info.title.unwrap_or_else(|| UNKNOWN.to_string()), authors);

        book.subjects = info.categories.unwrap_or_default();
        book.languages = info.language.into_iter().collect();
        if let Some(thumbnail) = info.image_links.and_then(|links| links.thumbnail) {
            book.formats.insert(
                "image/jpeg".to_string(),
                thumbnail.replace("http://", "https://"),
            );
        }
        book
    }
}

#[async_trait]
impl CatalogSource for GoogleBooksClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let url = endpoint(&self.base_url, "books/v1/volumes");
        let response: VolumesResponse = get_json(
            &self.http,
            SOURCE_NAME,
            &url,
            &[("q", query.to_string()), ("maxResults", self.limit.to_string())],
        )
        .await?;

        Ok(response
            .items
            .unwrap_or_default()
            .into_iter()
            .map(Self::map_volume)
            .collect())
    }
}
