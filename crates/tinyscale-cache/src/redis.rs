use async_trait::async_trait;
use redis::AsyncCommands;
use tinyscale_core::cache::Result;
use tinyscale_core::{Alias, CacheError, UrlCache};
use tracing::{debug, info, trace, warn};

/// Name of the Redis hash holding every alias -> long URL entry.
pub const DEFAULT_HASH_KEY: &str = "urls";

/// A Redis-based implementation of [`UrlCache`].
///
/// All entries live as fields of a single Redis hash (`urls` by default),
/// keyed by alias, with the long URL as the plain string value. No TTL is
/// set on the hash or its fields.
#[derive(Clone)]
pub struct RedisUrlCache {
    conn: redis::aio::MultiplexedConnection,
    hash_key: String,
}

impl std::fmt::Debug for RedisUrlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisUrlCache")
            .field("hash_key", &self.hash_key)
            .finish_non_exhaustive()
    }
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        CacheError::Timeout(message)
    } else if err.is_io_error() {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisUrlCache {
    /// Creates a new Redis URL cache on the default `urls` hash.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_hash_key(conn, DEFAULT_HASH_KEY)
    }

    /// Creates a new Redis URL cache on a custom hash.
    pub fn with_hash_key(
        conn: redis::aio::MultiplexedConnection,
        hash_key: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            hash_key: hash_key.into(),
        }
    }

    /// Opens a multiplexed connection to `redis_url` and checks it with `PING`.
    pub async fn connect(redis_url: &str, hash_key: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;

        let cache = Self::with_hash_key(conn, hash_key);
        let pong = cache.ping().await?;
        info!(reply = %pong, hash_key = %cache.hash_key, "connected to Redis");
        Ok(cache)
    }

    /// Sends `PING` and returns the server reply.
    pub async fn ping(&self) -> Result<String> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to ping Redis", e))
    }

    /// Name of the backing Redis hash.
    pub fn hash_key(&self) -> &str {
        &self.hash_key
    }
}

#[async_trait]
impl UrlCache for RedisUrlCache {
    async fn get_url(&self, alias: &Alias) -> Result<Option<String>> {
        trace!(alias = %alias, "Fetching long URL from Redis cache");

        let mut conn = self.conn.clone();
        match conn
            .hget::<_, _, Option<String>>(&self.hash_key, alias.as_str())
            .await
        {
            Ok(Some(long_url)) if !long_url.is_empty() => {
                debug!(alias = %alias, "Cache hit in Redis");
                Ok(Some(long_url))
            }
            Ok(_) => {
                trace!(alias = %alias, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(alias = %alias, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set_url(&self, alias: &Alias, long_url: &str) -> Result<()> {
        trace!(alias = %alias, "Storing long URL in Redis cache");

        let mut conn = self.conn.clone();
        match conn
            .hset::<_, _, _, ()>(&self.hash_key, alias.as_str(), long_url)
            .await
        {
            Ok(()) => {
                debug!(alias = %alias, "Cached long URL in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(alias = %alias, error = %e, "Failed to cache long URL in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }
}
