use std::sync::Arc;

use async_trait::async_trait;
use tinyscale_core::{
    Alias, ReadRepository, Redirector, RedirectorError, Resolution, ResolutionSource, UrlCache,
};
use tracing::{debug, trace, warn};

/// Service for resolving aliases back to long URLs.
///
/// Cache failures never fail a lookup: a cache error on read is treated as a
/// miss and a failed repair is only logged. Store failures are returned.
#[derive(Debug)]
pub struct RedirectorService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
}

impl<R, C> Clone for RedirectorService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<R: ReadRepository, C: UrlCache> RedirectorService<R, C> {
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self { repository, cache }
    }

    async fn cached(&self, alias: &Alias) -> Option<String> {
        match self.cache.get_url(alias).await {
            Ok(Some(long_url)) if !long_url.is_empty() => Some(long_url),
            Ok(_) => {
                trace!(alias = %alias, "cache miss");
                None
            }
            Err(e) => {
                warn!(alias = %alias, error = %e, "cache read failed, falling back to store");
                None
            }
        }
    }

    async fn repair(&self, alias: &Alias, long_url: &str) {
        if let Err(e) = self.cache.set_url(alias, long_url).await {
            warn!(alias = %alias, error = %e, "failed to repair cache entry");
        } else {
            trace!(alias = %alias, "repaired cache entry");
        }
    }
}

#[async_trait]
impl<R: ReadRepository, C: UrlCache> Redirector for RedirectorService<R, C> {
    async fn resolve(&self, alias: &Alias) -> Result<Option<Resolution>, RedirectorError> {
        trace!(alias = %alias, "resolving alias");

        if let Some(long_url) = self.cached(alias).await {
            debug!(alias = %alias, "resolved from cache");
            return Ok(Some(Resolution {
                long_url,
                source: ResolutionSource::Cache,
            }));
        }

        let Some(record) = self.repository.get(alias).await? else {
            trace!(alias = %alias, "alias not found");
            return Ok(None);
        };

        self.repair(alias, &record.long_url).await;

        debug!(alias = %alias, "resolved from store");
        Ok(Some(Resolution {
            long_url: record.long_url,
            source: ResolutionSource::Store,
        }))
    }
}
