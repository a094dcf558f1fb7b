//! Google Books API provider
//!
//! API Flow:
//! 1. Volume search: GET /books/v1/volumes?q=<text>&maxResults=<n>
//! 2. `items` (optional) is mapped into `Book` records; items without an id are skipped

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    models::{ApiVolume, ApiVolumesResponse, Book},
    services::providers::{BookCatalog, MAX_RESULTS_LIMIT},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const DEFAULT_CACHE_TTL: u64 = 3600; // 1 hour
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct GoogleBooksProvider {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
    cache: Cache,
    cache_ttl: u64,
}

impl GoogleBooksProvider {
    pub fn new(cache: Cache, api_url: String, api_key: Option<String>) -> AppResult<Self> {
        Self::with_timeout(cache, api_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        cache: Cache,
        api_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            cache,
            cache_ttl: DEFAULT_CACHE_TTL,
        })
    }

    pub fn with_cache_ttl(mut self, ttl_secs: u64) -> Self {
        self.cache_ttl = ttl_secs;
        self
    }

    fn validate(query: &str, max_results: u32) -> AppResult<()> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        if max_results == 0 || max_results > MAX_RESULTS_LIMIT {
            return Err(AppError::InvalidInput(format!(
                "max_results must be between 1 and {}",
                MAX_RESULTS_LIMIT
            )));
        }
        Ok(())
    }

    async fn fetch_volumes(&self, query: &str, max_results: u32) -> AppResult<Vec<Book>> {
        let max_results = max_results.to_string();
        let mut params = vec![("q", query), ("maxResults", max_results.as_str())];
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Google Books API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let parsed: ApiVolumesResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize Google Books response"
            );
            AppError::ExternalApi(format!("Failed to parse Google Books response: {}", e))
        })?;

        let books: Vec<Book> = parsed
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| match volume_to_book(item) {
                Ok(book) => Some(book),
                Err(reason) => {
                    tracing::debug!(error = %reason, "Skipping volume");
                    None
                }
            })
            .collect();

        tracing::info!(
            query = %query,
            results = books.len(),
            provider = "google_books",
            "Volume search completed"
        );

        Ok(books)
    }
}

fn volume_to_book(item: serde_json::Value) -> Result<Book, String> {
    let volume: ApiVolume = serde_json::from_value(item).map_err(|e| e.to_string())?;
    Book::try_from(volume).map_err(|e| e.to_string())
}

#[async_trait::async_trait]
impl BookCatalog for GoogleBooksProvider {
    async fn search_volumes(&self, query: &str, max_results: u32) -> AppResult<Vec<Book>> {
        Self::validate(query, max_results)?;

        let key = CacheKey::VolumeSearch {
            query: query.to_string(),
            max_results,
        };

        cached!(
            self.cache,
            key,
            self.cache_ttl,
            self.fetch_volumes(query, max_results)
        )
    }

    fn name(&self) -> &'static str {
        "google_books"
    }
}
