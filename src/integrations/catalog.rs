// src/integrations/catalog.rs
//
// Catalog abstraction shared by the book search clients
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Clients only map catalog payloads into `Book` values
// - No persistence, no retries

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::HttpConfig;
use crate::domain::book::Book;
use crate::error::{AppError, AppResult};

/// Title and author used when a catalog omits them
pub const UNKNOWN: &str = "Unknown";

/// A remote book catalog that can be searched by free text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Stable identifier used in logs and error messages
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str) -> AppResult<Vec<Book>>;
}

/// Create the HTTP client shared by every catalog.
pub fn create_http_client(config: &HttpConfig) -> AppResult<Client> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AppError::config(format!("Failed to create HTTP client: {}", e)))
}

/// GET `url` with query parameters and decode the JSON body.
///
/// Transport, status and decode failures are classified per [`AppError::from_http`].
pub(crate) async fn get_json<T>(
    http: &Client,
    source_name: &str,
    url: &str,
    query: &[(&str, String)],
) -> AppResult<T>
where
    T: DeserializeOwned,
{
    log::debug!("[{}] GET {}", source_name, url);

    let response = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| AppError::from_http(source_name, e))?
        .error_for_status()
        .map_err(|e| AppError::from_http(source_name, e))?;

    response
        .json::<T>()
        .await
        .map_err(|e| AppError::from_http(source_name, e))
}

/// Join a configured base URL and an endpoint path.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        assert_eq!(endpoint("https://gutendex.com/", "/books"), "https://gutendex.com/books");
        assert_eq!(
            endpoint("https://openlibrary.org", "search.json"),
            "https://openlibrary.org/search.json"
        );
    }

    #[test]
    fn test_http_client_from_config() {
        assert!(create_http_client(&HttpConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let http = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        // Port 9 on localhost is expected to refuse connections
        let result: AppResult<serde_json::Value> =
            get_json(&http, "local", "http://127.0.0.1:9/books", &[]).await;

        assert!(matches!(
            result,
            Err(AppError::Network { .. }) | Err(AppError::Timeout { .. })
        ));
    }
}
