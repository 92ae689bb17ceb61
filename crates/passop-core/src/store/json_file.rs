//! JSON file document store
//!
//! Keeps every collection in memory and rewrites a single JSON file
//! after each mutation. Passwords inside documents are already
//! encrypted by the credential service; the file itself is plain JSON.

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, error};

use super::memory::Collections;
use super::traits::{DeleteResult, Document, DocumentStore, InsertOneResult};
use crate::error::{Result, VaultError};

const STORAGE_FILE_NAME: &str = "passop.json";
const STORAGE_FILE_VERSION: u32 = 1;

/// File format for persistent storage
#[derive(Debug, Serialize, Deserialize)]
struct StorageFile {
    version: u32,
    #[serde(flatten)]
    data: Collections,
}

/// File-backed document store
pub struct JsonFileStore {
    /// Directory for the storage file
    storage_dir: PathBuf,
    /// In-memory copy of the file contents
    cache: RwLock<Collections>,
}

impl JsonFileStore {
    /// Open (or create) the store in the default data directory
    pub async fn open_default() -> Result<Self> {
        Self::open(default_data_dir()?).await
    }

    /// Open (or create) the store in `storage_dir`, loading existing data
    pub async fn open(storage_dir: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&storage_dir).await?;

        let store = Self {
            storage_dir,
            cache: RwLock::new(Collections::default()),
        };
        store.load().await?;

        debug!("JSON file store initialized at: {:?}", store.storage_dir);
        Ok(store)
    }

    /// Get the path to the storage file
    pub fn storage_file_path(&self) -> PathBuf {
        self.storage_dir.join(STORAGE_FILE_NAME)
    }

    async fn load(&self) -> Result<()> {
        let path = self.storage_file_path();

        if !path.exists() {
            debug!("No existing storage file found");
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let file: StorageFile = serde_json::from_str(&contents)?;
        if file.version != STORAGE_FILE_VERSION {
            return Err(VaultError::Storage(format!(
                "unsupported storage file version {}",
                file.version
            )));
        }

        let mut cache = self.cache.write().await;
        *cache = file.data;

        debug!("Loaded {} documents from storage", cache.len());
        Ok(())
    }

    /// Write atomically using a temp file
    async fn persist(&self, collections: &Collections) -> Result<()> {
        let file = StorageFile {
            version: STORAGE_FILE_VERSION,
            data: collections.clone(),
        };

        let contents = serde_json::to_string_pretty(&file)?;
        let path = self.storage_file_path();
        let temp_path = path.with_extension("tmp");

        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| storage_error(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| storage_error(&path, e))?;

        debug!("Saved {} documents to storage", collections.len());
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOneResult> {
        let mut cache = self.cache.write().await;
        let inserted_id = cache.insert(collection, document);

        if let Err(e) = self.persist(&cache).await {
            cache.pop(collection);
            return Err(e);
        }

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>> {
        Ok(self.cache.read().await.all(collection))
    }

    async fn delete_one(&self, collection: &str, key: &str) -> Result<DeleteResult> {
        let mut cache = self.cache.write().await;

        let Some((position, removed)) = cache.remove(collection, key) else {
            return Ok(DeleteResult {
                acknowledged: true,
                deleted_count: 0,
            });
        };

        if let Err(e) = self.persist(&cache).await {
            cache.restore(collection, position, removed);
            return Err(e);
        }

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: 1,
        })
    }

    fn backend_name(&self) -> &'static str {
        "JSON File Store"
    }
}

/// Get the default data directory
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "passop", "passop")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| VaultError::Storage("Could not determine data directory".to_string()))
}

fn storage_error(path: &Path, e: std::io::Error) -> VaultError {
    error!("Failed to write {:?}: {}", path, e);
    VaultError::Storage(format!("write to {:?} failed: {}", path, e))
}
