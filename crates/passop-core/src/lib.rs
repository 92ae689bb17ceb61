//! # passop-core
//!
//! Core functionality for the PassOP password manager including:
//! - AES-256-CBC + HMAC-SHA256 encryption of stored passwords
//! - Document stores (in-memory and JSON file)
//! - Credential service with per-record decryption tolerance
//! - Startup configuration around a single secret key

pub mod config;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod store;

pub use config::{Config, StorageConfig, SECRET_KEY_ENV};
pub use credential::{
    CredentialService, ListedCredential, ListedPassword, NewCredential, NewGeneratedPassword,
};
pub use crypto::{CryptoCodec, EncryptedPayload, SecretKey};
pub use error::{Result, VaultError};
pub use store::{DeleteResult, Document, DocumentStore, InsertOneResult, JsonFileStore, MemoryStore};
