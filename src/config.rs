use chrono::TimeDelta;
use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Google Books volumes endpoint
    #[serde(default = "default_books_api_url")]
    pub books_api_url: String,

    /// Optional Google Books API key (anonymous access works with lower quota)
    #[serde(default)]
    pub books_api_key: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout for outbound catalog requests, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long catalog search responses stay cached, in seconds
    #[serde(default = "default_search_cache_ttl_secs")]
    pub search_cache_ttl_secs: u64,

    /// Default number of results for a free-text search
    #[serde(default = "default_search_max_results")]
    pub search_max_results: u32,

    /// Number of results when browsing a category
    #[serde(default = "default_browse_max_results")]
    pub browse_max_results: u32,

    /// Vocabulary cap for the TF-IDF vectorizer
    #[serde(default = "default_tfidf_max_features")]
    pub tfidf_max_features: usize,

    /// Minimum similarity ratio for fuzzy title matching
    #[serde(default = "default_title_match_cutoff")]
    pub title_match_cutoff: f64,

    /// Idle sessions older than this are purged, in seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

fn default_books_api_url() -> String {
    "https://www.googleapis.com/books/v1/volumes".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_search_cache_ttl_secs() -> u64 {
    3600
}

fn default_search_max_results() -> u32 {
    40
}

fn default_browse_max_results() -> u32 {
    10
}

fn default_tfidf_max_features() -> usize {
    5000
}

fn default_title_match_cutoff() -> f64 {
    0.4
}

fn default_session_ttl_secs() -> u64 {
    86_400
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.session_ttl()?;
        Ok(config)
    }

    /// Session idle TTL, rejecting values chrono cannot represent
    pub fn session_ttl(&self) -> anyhow::Result<TimeDelta> {
        i64::try_from(self.session_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Failed to load config: SESSION_TTL_SECS {} is out of range",
                    self.session_ttl_secs
                )
            })
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
