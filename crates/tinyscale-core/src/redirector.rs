use crate::alias::Alias;
use crate::error::RedirectorError;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, RedirectorError>;

/// Where a resolved long URL was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Served from the cache without touching the durable store.
    Cache,
    /// Served from the durable store and repaired into the cache.
    Store,
}

/// A successfully resolved alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub long_url: String,
    pub source: ResolutionSource,
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves an alias to its long URL.
    /// Returns `None` if the alias does not exist.
    async fn resolve(&self, alias: &Alias) -> Result<Option<Resolution>>;
}
