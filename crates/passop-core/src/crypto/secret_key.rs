//! Process secret key with automatic zeroization

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, VaultError};

/// Length of the secret key in bytes (AES-256)
pub const SECRET_KEY_LEN: usize = 32;

/// Symmetric secret key - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    key: [u8; SECRET_KEY_LEN],
}

impl SecretKey {
    /// Create a new secret key from raw bytes
    pub fn new(key: [u8; SECRET_KEY_LEN]) -> Self {
        Self { key }
    }

    /// Parse a key from its hex form (64 hex characters)
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        let trimmed = hex_key.trim();
        if trimmed.is_empty() {
            return Err(VaultError::Configuration("secret key is empty".to_string()));
        }

        let mut bytes = hex::decode(trimmed)
            .map_err(|e| VaultError::Configuration(format!("secret key is not valid hex: {}", e)))?;

        let key = Self::from_slice(&bytes);
        bytes.zeroize();

        key.ok_or_else(|| {
            VaultError::Configuration(format!(
                "secret key must be {} bytes ({} hex characters)",
                SECRET_KEY_LEN,
                SECRET_KEY_LEN * 2
            ))
        })
    }

    /// Resolve an optional configured value, failing when it is absent
    pub fn from_configured(value: Option<&str>) -> Result<Self> {
        match value {
            Some(hex_key) => Self::from_hex(hex_key),
            None => Err(VaultError::Configuration("secret key not found".to_string())),
        }
    }

    /// Create from a slice (must be exactly 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != SECRET_KEY_LEN {
            return None;
        }
        let mut key = [0u8; SECRET_KEY_LEN];
        key.copy_from_slice(slice);
        Some(Self { key })
    }

    /// Get the key bytes (use carefully - avoid copying)
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
