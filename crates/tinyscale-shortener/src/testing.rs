//! Fakes for failure and race injection.

use async_trait::async_trait;
use parking_lot::Mutex;
use tinyscale_core::repository::Result;
use tinyscale_core::{
    Alias, CacheError, ReadRepository, Repository, StorageError, UrlCache, UrlRecord,
};
use tinyscale_storage::InMemoryRepository;
use tokio::sync::watch;

/// A durable store whose backend is always down.
pub struct FailingRepository;

#[async_trait]
impl ReadRepository for FailingRepository {
    async fn get(&self, _alias: &Alias) -> Result<Option<UrlRecord>> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl Repository for FailingRepository {
    async fn insert(&self, _alias: &Alias, _record: UrlRecord) -> Result<()> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
}

/// A cache whose backend is always down.
pub struct FailingCache;

#[async_trait]
impl UrlCache for FailingCache {
    async fn get_url(&self, _alias: &Alias) -> tinyscale_core::cache::Result<Option<String>> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set_url(&self, _alias: &Alias, _long_url: &str) -> tinyscale_core::cache::Result<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

/// A store whose inserts block until [`open`](GatedRepository::open) is called.
pub struct GatedRepository {
    inner: InMemoryRepository,
    open: watch::Sender<bool>,
}

impl GatedRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryRepository::new(),
            open: watch::Sender::new(false),
        }
    }

    pub fn open(&self) {
        self.open.send_replace(true);
    }
}

#[async_trait]
impl ReadRepository for GatedRepository {
    async fn get(&self, alias: &Alias) -> Result<Option<UrlRecord>> {
        self.inner.get(alias).await
    }
}

#[async_trait]
impl Repository for GatedRepository {
    async fn insert(&self, alias: &Alias, record: UrlRecord) -> Result<()> {
        let mut open = self.open.subscribe();
        let _ = open.wait_for(|open| *open).await;
        self.inner.insert(alias, record).await
    }
}

/// A store where a rival request commits `rival_url` under the same alias
/// just before our first insert lands, after our lookup saw it free.
pub struct RacingRepository {
    pub inner: InMemoryRepository,
    rival_url: Mutex<Option<String>>,
}

impl RacingRepository {
    pub fn new(rival_url: impl Into<String>) -> Self {
        Self {
            inner: InMemoryRepository::new(),
            rival_url: Mutex::new(Some(rival_url.into())),
        }
    }
}

#[async_trait]
impl ReadRepository for RacingRepository {
    async fn get(&self, alias: &Alias) -> Result<Option<UrlRecord>> {
        self.inner.get(alias).await
    }
}

#[async_trait]
impl Repository for RacingRepository {
    async fn insert(&self, alias: &Alias, record: UrlRecord) -> Result<()> {
        let rival = self.rival_url.lock().take();
        if let Some(rival) = rival {
            self.inner.insert(alias, UrlRecord::new(rival)).await?;
        }
        self.inner.insert(alias, record).await
    }
}
