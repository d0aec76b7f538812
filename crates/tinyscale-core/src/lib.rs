//! Core types and traits for the tinyscale URL shortener.
//!
//! This crate provides the shared vocabulary used by the generator,
//! the durable stores, the caches, and the shortener/redirector services.

pub mod alias;
pub mod cache;
pub mod error;
pub mod redirector;
pub mod repository;
pub mod shortener;

pub use alias::{Alias, ALIAS_LEN};
pub use cache::UrlCache;
pub use error::{CacheError, CoreError, RedirectorError, ShortenerError, StorageError};
pub use redirector::{Redirector, Resolution, ResolutionSource};
pub use repository::{ReadRepository, Repository, UrlRecord};
pub use shortener::Shortener;
