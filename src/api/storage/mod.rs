//! Storage module for the API.
//!
//! Provides storage backends for PostgreSQL and in-memory storage.

pub mod error;
pub mod fixtures;
pub mod traits;
pub mod user_store;

// Storage backend implementations
pub mod memory;
pub mod postgres;

pub use error::StorageError;
pub use memory::InMemoryStorageBackend;
pub use postgres::PostgresStorageBackend;
pub use traits::{DiagramPatch, StorageBackend};
pub use user_store::{InMemoryUserStore, SharedUserStore, UserStore};
