use crate::alias::Alias;
use crate::error::ShortenerError;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Maps `long_url` to an alias, creating the mapping if needed.
    ///
    /// Calling this twice with the same URL returns the same alias.
    async fn shorten(&self, long_url: &str) -> Result<Alias>;
}
