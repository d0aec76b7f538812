use crate::alias::Alias;
use crate::error::StorageError;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// The durable half of a URL mapping, keyed by its [`Alias`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The long URL the alias points at.
    pub long_url: String,
    /// When the mapping was accepted.
    pub created_at: Timestamp,
}

impl UrlRecord {
    /// Creates a record for `long_url` stamped with the current time.
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
            created_at: Timestamp::now(),
        }
    }
}

/// A read-only view of the durable store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given alias.
    /// Returns `None` if the alias does not exist.
    async fn get(&self, alias: &Alias) -> Result<Option<UrlRecord>>;
}

/// The durable store of URL mappings.
///
/// Mappings are immutable once inserted: there is no update or delete.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new mapping. Returns `Err(Conflict)` if the alias already exists.
    async fn insert(&self, alias: &Alias, record: UrlRecord) -> Result<()>;
}
