//! Durable stores for URL mappings.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;
pub use tinyscale_core::{ReadRepository, Repository, StorageError, UrlRecord};
