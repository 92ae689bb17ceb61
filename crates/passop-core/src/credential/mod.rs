//! Credential management over encrypted document storage

mod service;
mod types;

pub use service::{CredentialService, CREDENTIALS_COLLECTION, GENERATED_PASSWORDS_COLLECTION};
pub use types::*;
