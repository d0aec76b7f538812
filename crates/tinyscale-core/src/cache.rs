use crate::alias::Alias;
use crate::error::CacheError;
use async_trait::async_trait;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A fast lookup namespace in front of the durable store.
///
/// Keys are aliases and values are long URLs. Entries never expire on their
/// own but may be evicted or lost at any time; callers must be able to
/// repopulate them from the durable store.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get the long URL cached for `alias`.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, alias: &Alias) -> Result<Option<String>>;

    /// Store the long URL for `alias`.
    ///
    /// Callers must only pass values already accepted by the durable store.
    async fn set_url(&self, alias: &Alias, long_url: &str) -> Result<()>;
}
