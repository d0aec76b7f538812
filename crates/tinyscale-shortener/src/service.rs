use crate::writer::MappingWriter;
use async_trait::async_trait;
use std::sync::Arc;
use tinyscale_core::{
    Alias, Repository, Shortener, ShortenerError, StorageError, UrlCache, UrlRecord,
};
use tinyscale_generator::{EncodedDigest, Fingerprint};
use tracing::{debug, trace};

/// A concrete implementation of the `Shortener` trait.
///
/// The long URL is fingerprinted once; candidates are then sliced from the
/// encoded digest at offsets 0, 1, 2, ... until one is either free (and is
/// written) or already bound to the same long URL (and is reused). The loop
/// is bounded by the encoded digest's length.
///
/// No in-process lock is held: concurrent creations racing for the same
/// alias are arbitrated by the durable store's uniqueness constraint, and
/// the loser re-reads the alias and either reuses it or advances.
pub struct ShortenerService<R, C, F> {
    writer: Arc<MappingWriter<R, C>>,
    fingerprint: F,
}

impl<R: Repository, C: UrlCache, F: Fingerprint> ShortenerService<R, C, F> {
    pub fn new(writer: Arc<MappingWriter<R, C>>, fingerprint: F) -> Self {
        Self {
            writer,
            fingerprint,
        }
    }

    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.trim().is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `alias` turned out to be bound to `long_url` after our write
    /// to it was rejected.
    async fn won_by_same_url(&self, alias: &Alias, long_url: &str) -> Result<bool, ShortenerError> {
        let current = self.writer.lookup(alias).await?;
        Ok(current.as_deref() == Some(long_url))
    }
}

#[async_trait]
impl<R: Repository, C: UrlCache, F: Fingerprint> Shortener for ShortenerService<R, C, F> {
    async fn shorten(&self, long_url: &str) -> Result<Alias, ShortenerError> {
        Self::validate_url(long_url)?;

        let encoded = EncodedDigest::new(&self.fingerprint.digest(long_url));

        for (offset, candidate) in encoded.candidates_from(0) {
            trace!(alias = %candidate, offset, "trying alias candidate");

            match self.writer.lookup(&candidate).await? {
                None => match self
                    .writer
                    .write(&candidate, UrlRecord::new(long_url))
                    .await
                {
                    Ok(()) => {
                        debug!(alias = %candidate, offset, "assigned new alias");
                        return Ok(candidate);
                    }
                    Err(StorageError::Conflict(_)) => {
                        if self.won_by_same_url(&candidate, long_url).await? {
                            debug!(alias = %candidate, offset, "concurrent request stored the same url");
                            return Ok(candidate);
                        }
                        debug!(alias = %candidate, offset, "lost insert race, advancing");
                    }
                    Err(e) => return Err(e.into()),
                },
                Some(existing) if existing == long_url => {
                    debug!(alias = %candidate, offset, "url already shortened");
                    return Ok(candidate);
                }
                Some(_) => {
                    debug!(alias = %candidate, offset, "alias collision, advancing");
                }
            }
        }

        Err(ShortenerError::Exhausted {
            attempts: encoded.max_attempts(),
        })
    }
}
