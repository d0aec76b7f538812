//! Read path of the URL shortener.
//!
//! [`RedirectorService`] resolves an alias by consulting the cache first and
//! falling back to the durable store. A store hit is written back into the
//! cache (read-repair), so mappings lost from the cache are restored on
//! their next lookup.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tinyscale_cache::MokaUrlCache;
//! use tinyscale_core::{Alias, Redirector};
//! use tinyscale_redirector::RedirectorService;
//! use tinyscale_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RedirectorService::new(
//!     Arc::new(InMemoryRepository::new()),
//!     Arc::new(MokaUrlCache::new()),
//! );
//!
//! let alias = Alias::new("abc123")?;
//! if let Some(resolution) = service.resolve(&alias).await? {
//!     println!("Redirect to: {}", resolution.long_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod service;

pub use service::RedirectorService;
