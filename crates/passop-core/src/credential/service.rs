//! Credential service: create, list, and delete over a document store
//!
//! Editing is a client-side two-step protocol: delete the old record by
//! its identifier, then save the edited fields as a new record. There is
//! no in-place update.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::types::{
    text_field, ListedCredential, ListedPassword, NewCredential, NewGeneratedPassword,
    StoredCredential, StoredGeneratedPassword, StoredPassword,
};
use crate::crypto::CryptoCodec;
use crate::error::{Result, VaultError};
use crate::store::{
    DeleteResult, Document, DocumentStore, InsertOneResult, APP_ID_FIELD, STORAGE_ID_FIELD,
};
use serde_json::Value;

/// Collection holding site credentials
pub const CREDENTIALS_COLLECTION: &str = "passwords";

/// Collection holding the generated-password audit trail
pub const GENERATED_PASSWORDS_COLLECTION: &str = "generated_passwords";

/// Credential service
pub struct CredentialService {
    codec: Arc<CryptoCodec>,
    store: Arc<dyn DocumentStore>,
}

impl CredentialService {
    /// Create a new credential service
    pub fn new(codec: Arc<CryptoCodec>, store: Arc<dyn DocumentStore>) -> Self {
        Self { codec, store }
    }

    /// Name of the underlying store
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// List every credential with its password decrypted
    ///
    /// A record that cannot be decrypted carries a sentinel string in place
    /// of its password; it never aborts the listing.
    pub async fn list_credentials(&self) -> Result<Vec<ListedCredential>> {
        let documents = self.store.find_all(CREDENTIALS_COLLECTION).await?;
        debug!("Found {} credential documents", documents.len());

        let listed = documents
            .into_iter()
            .map(|document| self.open_document(document))
            .collect();

        Ok(listed)
    }

    /// Encrypt and persist a new credential
    pub async fn save_credential(&self, credential: NewCredential) -> Result<InsertOneResult> {
        let stored = StoredCredential {
            password: self.codec.encrypt(&credential.password)?,
            site: credential.site,
            username: credential.username,
            id: credential.id,
        };

        let result = self
            .store
            .insert_one(CREDENTIALS_COLLECTION, to_document(&stored)?)
            .await?;

        info!("Saved credential {} ({})", stored.id, result.inserted_id);
        Ok(result)
    }

    /// Delete a credential by storage identifier or application id
    pub async fn delete_credential(&self, id: &str) -> Result<DeleteResult> {
        let result = self.store.delete_one(CREDENTIALS_COLLECTION, id).await?;

        if result.deleted_count == 0 {
            debug!("No credential matched {}", id);
        } else {
            info!("Deleted credential {}", id);
        }
        Ok(result)
    }

    /// Encrypt and persist a generated password with no site association
    pub async fn save_generated_password(
        &self,
        generated: NewGeneratedPassword,
    ) -> Result<InsertOneResult> {
        let stored = StoredGeneratedPassword {
            password: self.codec.encrypt(&generated.password)?,
            id: generated.id,
            created_at: chrono::Utc::now(),
        };

        let result = self
            .store
            .insert_one(GENERATED_PASSWORDS_COLLECTION, to_document(&stored)?)
            .await?;

        info!("Saved generated password {} ({})", stored.id, result.inserted_id);
        Ok(result)
    }

    fn open_document(&self, document: Document) -> ListedCredential {
        let id = text_field(&document, APP_ID_FIELD);
        let password = document
            .get("password")
            .map(|value| self.open_password(&id, value))
            .unwrap_or_else(|| {
                warn!("Missing password fields in credential {}", id);
                ListedPassword::MissingFields
            });

        ListedCredential {
            storage_id: text_field(&document, STORAGE_ID_FIELD),
            site: text_field(&document, "site"),
            username: text_field(&document, "username"),
            password,
            id,
        }
    }

    fn open_password(&self, id: &str, value: &Value) -> ListedPassword {
        match StoredPassword::classify(value) {
            StoredPassword::Encrypted(payload) => match self.codec.decrypt_payload(&payload) {
                Ok(plaintext) => ListedPassword::Plaintext(plaintext),
                Err(e) => {
                    error!("Decryption failed for credential {}: {}", id, e);
                    ListedPassword::DecryptionFailed
                }
            },
            StoredPassword::Hashed => {
                warn!("Password for credential {} is a hashed string", id);
                ListedPassword::Hashed
            }
            StoredPassword::MissingFields => {
                warn!("Missing password fields in credential {}", id);
                ListedPassword::MissingFields
            }
        }
    }
}

fn to_document<T: serde::Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        _ => Err(VaultError::Storage("record did not serialize to an object".to_string())),
    }
}
