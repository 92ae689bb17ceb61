//! Credential type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crypto::EncryptedPayload;
use crate::store::Document;

/// Shown when the stored password is a bare string instead of a payload
pub const HASHED_SENTINEL: &str = "Decryption failed: password is hashed";

/// Shown when the stored payload lacks its iv or ciphertext
pub const MISSING_FIELDS_SENTINEL: &str = "Decryption failed: missing fields";

/// Shown when the payload is present but does not decrypt
pub const DECRYPTION_FAILED_SENTINEL: &str = "Decryption failed";

/// Plaintext credential submitted for saving
#[derive(Clone, Deserialize)]
pub struct NewCredential {
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub username: String,
    pub password: String,
    pub id: String,
}

impl std::fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCredential")
            .field("site", &self.site)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("id", &self.id)
            .finish()
    }
}

/// Plaintext generated password submitted for the audit trail
#[derive(Clone, Deserialize)]
pub struct NewGeneratedPassword {
    pub password: String,
    pub id: String,
}

impl std::fmt::Debug for NewGeneratedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewGeneratedPassword")
            .field("password", &"[REDACTED]")
            .field("id", &self.id)
            .finish()
    }
}

/// Credential document as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub site: String,
    pub username: String,
    pub password: EncryptedPayload,
    pub id: String,
}

/// Generated password document as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredGeneratedPassword {
    pub password: EncryptedPayload,
    pub id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Read a display field from a stored document without rejecting odd values
///
/// Missing or `null` becomes `""`; numbers and other non-strings keep
/// their JSON text.
pub(crate) fn text_field(document: &Document, field: &str) -> String {
    match document.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(value)) => value.clone(),
        Some(other) => other.to_string(),
    }
}

/// Shape of a stored password field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredPassword {
    /// Well-formed `{iv, ciphertext}` payload
    Encrypted(EncryptedPayload),
    /// Bare string left by an older hashing scheme
    Hashed,
    /// Object (or anything else) without a usable iv and ciphertext
    MissingFields,
}

impl StoredPassword {
    /// Classify a raw `password` value
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::Hashed,
            Value::Object(fields) => {
                let iv = fields.get("iv").and_then(Value::as_str).unwrap_or_default();
                let ciphertext = fields
                    .get("ciphertext")
                    .or_else(|| fields.get("encryptedData"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();

                if iv.is_empty() || ciphertext.is_empty() {
                    Self::MissingFields
                } else {
                    Self::Encrypted(EncryptedPayload {
                        iv: iv.to_string(),
                        ciphertext: ciphertext.to_string(),
                    })
                }
            }
            _ => Self::MissingFields,
        }
    }
}

/// Password as returned by a listing: plaintext, or why it is unreadable
#[derive(Clone, PartialEq, Eq)]
pub enum ListedPassword {
    Plaintext(String),
    Hashed,
    MissingFields,
    DecryptionFailed,
}

impl ListedPassword {
    /// The string placed in the `password` field of the response
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plaintext(value) => value,
            Self::Hashed => HASHED_SENTINEL,
            Self::MissingFields => MISSING_FIELDS_SENTINEL,
            Self::DecryptionFailed => DECRYPTION_FAILED_SENTINEL,
        }
    }
}

impl std::fmt::Debug for ListedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plaintext(_) => f.write_str("Plaintext([REDACTED])"),
            Self::Hashed => f.write_str("Hashed"),
            Self::MissingFields => f.write_str("MissingFields"),
            Self::DecryptionFailed => f.write_str("DecryptionFailed"),
        }
    }
}

impl Serialize for ListedPassword {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Credential returned by a listing
#[derive(Debug, Clone, Serialize)]
pub struct ListedCredential {
    #[serde(rename = "_id")]
    pub storage_id: String,
    pub site: String,
    pub username: String,
    pub password: ListedPassword,
    pub id: String,
}
