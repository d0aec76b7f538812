//! Cache implementations for the alias -> long URL namespace.

pub mod moka;
pub mod redis;

pub use self::moka::{CacheConfig, MokaUrlCache};
pub use self::redis::{RedisUrlCache, DEFAULT_HASH_KEY};
pub use tinyscale_core::{CacheError, UrlCache};
