//! Service configuration
//!
//! Built once at startup and handed by value to whatever needs it. The
//! secret key has no default: a service without one refuses to start.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::crypto::SecretKey;
use crate::error::Result;
use crate::store::{DocumentStore, JsonFileStore, MemoryStore};

/// Environment variable holding the hex-encoded secret key
pub const SECRET_KEY_ENV: &str = "SECRET_KEY";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Where documents are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Volatile, lost on exit
    Memory,
    /// JSON file in `dir`, or the platform data directory when `None`
    File { dir: Option<PathBuf> },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::File { dir: None }
    }
}

impl StorageConfig {
    /// Open the configured document store
    pub async fn open(&self) -> Result<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match self {
            StorageConfig::Memory => Arc::new(MemoryStore::new()),
            StorageConfig::File { dir: Some(dir) } => {
                Arc::new(JsonFileStore::open(dir.clone()).await?)
            }
            StorageConfig::File { dir: None } => Arc::new(JsonFileStore::open_default().await?),
        };

        info!("Using {}", store.backend_name());
        Ok(store)
    }
}

/// Service configuration
#[derive(Debug)]
pub struct Config {
    pub secret_key: SecretKey,
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
}

impl Config {
    /// Create a configuration with default host, port, and storage
    pub fn new(secret_key: SecretKey) -> Self {
        Self {
            secret_key,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            storage: StorageConfig::default(),
        }
    }

    /// Create a configuration from the raw configured secret key value
    pub fn from_secret_key_value(value: Option<&str>) -> Result<Self> {
        Ok(Self::new(SecretKey::from_configured(value)?))
    }

    /// Set the listen host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the listen port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the storage backend
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// Address to bind, e.g. `0.0.0.0:3000`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;
    use tempfile::TempDir;

    const HEX_KEY: &str = "8f3a2b1c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8";

    #[test]
    fn test_defaults() {
        let config = Config::from_secret_key_value(Some(HEX_KEY)).unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.storage, StorageConfig::File { dir: None });
    }

    #[test]
    fn test_missing_secret_key_is_fatal() {
        let result = Config::from_secret_key_value(None);
        assert!(matches!(result, Err(VaultError::Configuration(_))));

        let result = Config::from_secret_key_value(Some("not-a-key"));
        assert!(matches!(result, Err(VaultError::Configuration(_))));
    }

    #[test]
    fn test_builder() {
        let config = Config::from_secret_key_value(Some(HEX_KEY))
            .unwrap()
            .with_host("127.0.0.1")
            .with_port(8080)
            .with_storage(StorageConfig::Memory);

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.storage, StorageConfig::Memory);
    }

    #[test]
    fn test_debug_hides_key() {
        let config = Config::from_secret_key_value(Some(HEX_KEY)).unwrap();
        assert!(!format!("{:?}", config).contains("8f3a"));
    }

    #[tokio::test]
    async fn test_open_storage() {
        let memory = StorageConfig::Memory.open().await.unwrap();
        assert_eq!(memory.backend_name(), "In-Memory Store");

        let temp_dir = TempDir::new().unwrap();
        let file = StorageConfig::File {
            dir: Some(temp_dir.path().to_path_buf()),
        }
        .open()
        .await
        .unwrap();
        assert_eq!(file.backend_name(), "JSON File Store");
    }
}
