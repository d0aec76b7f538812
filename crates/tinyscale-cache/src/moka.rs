use async_trait::async_trait;
use moka::future::Cache;
use tinyscale_core::cache::Result;
use tinyscale_core::{Alias, UrlCache};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-memory cache implementation using Moka.
///
/// Suited to single-node deployments. Entries have no TTL; the capacity
/// bound only evicts, and evicted entries are repaired from the durable
/// store on the next read.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<String, String>,
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache holding at most 10,000 entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a new Moka URL cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, alias: &Alias) -> Result<Option<String>> {
        trace!(alias = %alias, "Fetching long URL from Moka cache");

        match self.cache.get(alias.as_str()).await {
            Some(long_url) => {
                debug!(alias = %alias, "Cache hit in Moka");
                Ok(Some(long_url))
            }
            None => {
                trace!(alias = %alias, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set_url(&self, alias: &Alias, long_url: &str) -> Result<()> {
        trace!(alias = %alias, "Storing long URL in Moka cache");

        self.cache
            .insert(alias.as_str().to_owned(), long_url.to_owned())
            .await;
        debug!(alias = %alias, "Cached long URL in Moka");
        Ok(())
    }
}

/// Configuration for creating a MokaUrlCache with custom settings.
#[derive(Debug, TypedBuilder, Default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Number of entries to pre-allocate room for.
    #[builder(default, setter(strip_option))]
    initial_capacity: Option<usize>,
}

impl From<CacheConfig> for MokaUrlCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(initial) = config.initial_capacity {
            builder = builder.initial_capacity(initial);
        }

        MokaUrlCache {
            cache: builder.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(s: &str) -> Alias {
        Alias::new_unchecked(s)
    }

    #[tokio::test]
    async fn cache_get_and_set() {
        let cache = MokaUrlCache::new();
        let a = alias("abc123");

        assert!(cache.get_url(&a).await.unwrap().is_none());

        cache.set_url(&a, "https://example.com").await.unwrap();

        let result = cache.get_url(&a).await.unwrap();
        assert_eq!(result.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let cache = MokaUrlCache::new();
        let other = cache.clone();
        let a = alias("abc123");

        cache.set_url(&a, "https://example.com").await.unwrap();

        assert_eq!(
            other.get_url(&a).await.unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn cache_builder_pattern() {
        let cache: MokaUrlCache = MokaUrlCache::builder()
            .max_capacity(1000)
            .initial_capacity(16)
            .build()
            .into();

        let a = alias("abc123");
        cache.set_url(&a, "https://example.com").await.unwrap();
        assert!(cache.get_url(&a).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn cache_handles_many_entries() {
        let cache = MokaUrlCache::with_capacity(100);

        for i in 0..50 {
            let a = alias(&format!("code{:02}", i));
            cache
                .set_url(&a, &format!("https://example{}", i))
                .await
                .unwrap();
        }

        assert_eq!(
            cache.get_url(&alias("code00")).await.unwrap().as_deref(),
            Some("https://example0")
        );
        assert_eq!(
            cache.get_url(&alias("code25")).await.unwrap().as_deref(),
            Some("https://example25")
        );
        assert!(cache.get_url(&alias("code49")).await.unwrap().is_some());
    }
}
