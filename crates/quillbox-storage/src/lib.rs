//! Storage abstraction layer for the Quillbox notes server.
//!
//! Defines the ports every persistent backend must implement, the storage
//! error taxonomy, and an in-memory backend used by tests and local
//! development.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{ErrorCategory, StorageError};
pub use memory::InMemoryStore;
pub use traits::{NoteStore, UserStore};
