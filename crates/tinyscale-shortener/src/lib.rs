//! URL shortener service implementation.
//!
//! [`ShortenerService`] turns a long URL into a confirmed alias, advancing
//! through the candidates of its digest on collision, and hands the new
//! mapping to a [`MappingWriter`] that persists it durably and mirrors it
//! into the cache.

pub mod service;
pub mod writer;

#[cfg(test)]
mod testing;

pub use service::ShortenerService;
pub use writer::{MappingWriter, WriteMode, WriterConfig};
