use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    VolumeSearch { query: String, max_results: u32 },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::VolumeSearch { query, max_results } => {
                write!(f, "volumes:{}:{}", query.trim().to_lowercase(), max_results)
            }
        }
    }
}

/// Default number of entries kept before the oldest are evicted
pub const DEFAULT_CAPACITY: usize = 512;

struct CacheEntry {
    value: String,
    inserted_at: Instant,
    expires_at: Instant,
}

/// In-process cache of serialized catalog responses with per-entry TTL
#[derive(Clone)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    capacity: usize,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Cache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Retrieves a value from the cache by key
    ///
    /// Expired entries are treated as misses.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let entries = self.entries.read().await;

        match entries.get(&key.to_string()) {
            Some(entry) if entry.expires_at > Instant::now() => {
                let data = serde_json::from_str(&entry.value).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            _ => Ok(None),
        }
    }

    /// Stores a value, evicting expired entries and then the oldest entry when full
    pub async fn set<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let key = key.to_string();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            entries.retain(|_, entry| entry.expires_at > now);

            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            CacheEntry {
                value: json,
                inserted_at: now,
                expires_at: now + Duration::from_secs(ttl),
            },
        );
    }

    /// Stores a value without making the caller wait for the write lock
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_value(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let cache = self.clone();
        let key = key.clone();
        tokio::spawn(async move {
            cache.set(&key, &json, ttl).await;
        });
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_key(query: &str) -> CacheKey {
        CacheKey::VolumeSearch {
            query: query.to_string(),
            max_results: 40,
        }
    }

    #[test]
    fn test_cache_key_display_is_normalized() {
        assert_eq!(search_key("  Stephen KING ").to_string(), "volumes:stephen king:40");
    }

    #[test]
    fn test_cache_key_includes_result_count() {
        let key = CacheKey::VolumeSearch {
            query: "history".to_string(),
            max_results: 10,
        };
        assert_eq!(key.to_string(), "volumes:history:10");
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = Cache::default();
        let retrieved: Option<Vec<String>> =
            cache.get_from_cache(&search_key("nothing")).await.unwrap();
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = Cache::default();
        let value = vec!["item1".to_string(), "item2".to_string()];
        cache.set(&search_key("dune"), &value, 60).await;

        let retrieved: Option<Vec<String>> =
            cache.get_from_cache(&search_key("DUNE")).await.unwrap();
        assert_eq!(retrieved, Some(value));
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = Cache::default();
        cache.set(&search_key("dune"), &vec![1, 2, 3], 0).await;

        let retrieved: Option<Vec<i32>> = cache.get_from_cache(&search_key("dune")).await.unwrap();
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_oldest_entry_evicted_at_capacity() {
        let cache = Cache::new(2);
        cache.set(&search_key("a"), &1, 60).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.set(&search_key("b"), &2, 60).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.set(&search_key("c"), &3, 60).await;

        assert_eq!(cache.len().await, 2);
        let a: Option<i32> = cache.get_from_cache(&search_key("a")).await.unwrap();
        let c: Option<i32> = cache.get_from_cache(&search_key("c")).await.unwrap();
        assert_eq!(a, None);
        assert_eq!(c, Some(3));
    }

    #[tokio::test]
    async fn test_set_in_background_writes_to_cache() {
        let cache = Cache::default();
        let value = vec!["background".to_string()];
        cache.set_in_background(&search_key("bg"), &value, 60);

        tokio::time::sleep(Duration::from_millis(50)).await;

        let retrieved: Option<Vec<String>> =
            cache.get_from_cache(&search_key("bg")).await.unwrap();
        assert_eq!(retrieved, Some(value));
    }

    #[tokio::test]
    async fn test_wrong_type_is_deserialization_error() {
        let cache = Cache::default();
        cache.set(&search_key("typed"), &"a string", 60).await;

        let result: AppResult<Option<Vec<u32>>> = cache.get_from_cache(&search_key("typed")).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
