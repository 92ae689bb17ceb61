//! Document stores for persisted records
//!
//! This module provides two backends:
//! 1. In-memory (volatile, for tests and demos)
//! 2. JSON file (persistent)

mod json_file;
mod memory;
mod traits;

pub use json_file::{default_data_dir, JsonFileStore};
pub use memory::MemoryStore;
pub use traits::{DeleteResult, Document, DocumentStore, InsertOneResult, APP_ID_FIELD, STORAGE_ID_FIELD};
