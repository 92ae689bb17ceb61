//! Cryptographic primitives for at-rest password encryption
//!
//! This module provides:
//! - AES-256-CBC encryption authenticated with HMAC-SHA256
//! - The zeroize-on-drop process secret key

mod codec;
mod secret_key;

pub use codec::{CryptoCodec, EncryptedPayload, IV_LEN};
pub use secret_key::{SecretKey, SECRET_KEY_LEN};
