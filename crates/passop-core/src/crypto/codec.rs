//! AES-256-CBC encryption with HMAC-SHA256 authentication
//!
//! Stored payload: `{ "iv": iv_hex, "ciphertext": hex(ct || tag) }`
//! - IV: 16 bytes, fresh per call
//! - ct: AES-256-CBC with PKCS#7 padding
//! - tag: HMAC-SHA256 over `iv || ct` (32 bytes)
//!
//! Both subkeys are expanded from the single configured secret with
//! HKDF-SHA256, so losing the secret loses every record.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::{SecretKey, SECRET_KEY_LEN};
use crate::error::{Result, VaultError};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// AES block size, which is also the IV length for CBC
pub const IV_LEN: usize = 16;

/// HMAC-SHA256 output length
const TAG_LEN: usize = 32;

const ENCRYPTION_KEY_INFO: &[u8] = b"passop-aes-256-cbc";
const MAC_KEY_INFO: &[u8] = b"passop-hmac-sha256";

/// Encrypted password as persisted: both fields hex-encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// Initialization vector
    pub iv: String,
    /// Ciphertext with the authentication tag appended
    #[serde(alias = "encryptedData")]
    pub ciphertext: String,
}

/// Keyed codec for at-rest password encryption
pub struct CryptoCodec {
    encryption_key: SecretKey,
    mac_key: SecretKey,
}

impl CryptoCodec {
    /// Build a codec around the process secret key
    pub fn new(secret: SecretKey) -> Result<Self> {
        let hk = Hkdf::<Sha256>::new(None, secret.as_bytes());

        let mut encryption_key = [0u8; SECRET_KEY_LEN];
        hk.expand(ENCRYPTION_KEY_INFO, &mut encryption_key)
            .map_err(|e| VaultError::Configuration(format!("HKDF expand failed: {}", e)))?;

        let mut mac_key = [0u8; SECRET_KEY_LEN];
        hk.expand(MAC_KEY_INFO, &mut mac_key)
            .map_err(|e| VaultError::Configuration(format!("HKDF expand failed: {}", e)))?;

        Ok(Self {
            encryption_key: SecretKey::new(encryption_key),
            mac_key: SecretKey::new(mac_key),
        })
    }

    /// Encrypt a plaintext password under a fresh random IV
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedPayload> {
        let mut iv = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);

        let cipher = Aes256CbcEnc::new_from_slices(self.encryption_key.as_bytes(), &iv)
            .map_err(|e| VaultError::Encryption(e.to_string()))?;
        let mut sealed = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let tag = self.mac(&iv, &sealed)?.finalize().into_bytes();
        sealed.extend_from_slice(&tag);

        Ok(EncryptedPayload {
            iv: hex::encode(iv),
            ciphertext: hex::encode(sealed),
        })
    }

    /// Decrypt a hex ciphertext/IV pair back to the plaintext password
    pub fn decrypt(&self, ciphertext: &str, iv: &str) -> Result<String> {
        if ciphertext.is_empty() || iv.is_empty() {
            return Err(VaultError::InvalidInput(
                "ciphertext and iv are both required".to_string(),
            ));
        }

        let iv = hex::decode(iv)
            .map_err(|e| VaultError::Decryption(format!("Invalid IV hex: {}", e)))?;
        if iv.len() != IV_LEN {
            return Err(VaultError::Decryption(format!(
                "Invalid IV length: expected {}, got {}",
                IV_LEN,
                iv.len()
            )));
        }

        let sealed = hex::decode(ciphertext)
            .map_err(|e| VaultError::Decryption(format!("Invalid ciphertext hex: {}", e)))?;
        if sealed.len() < IV_LEN + TAG_LEN || (sealed.len() - TAG_LEN) % IV_LEN != 0 {
            return Err(VaultError::Decryption(format!(
                "Invalid ciphertext length: {}",
                sealed.len()
            )));
        }

        let (body, tag) = sealed.split_at(sealed.len() - TAG_LEN);
        self.mac(&iv, body)?
            .verify_slice(tag)
            .map_err(|_| VaultError::Decryption("authentication tag mismatch".to_string()))?;

        let cipher = Aes256CbcDec::new_from_slices(self.encryption_key.as_bytes(), &iv)
            .map_err(|e| VaultError::Decryption(e.to_string()))?;
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(body)
            .map_err(|_| VaultError::Decryption("invalid padding".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|e| VaultError::Decryption(format!("Invalid UTF-8: {}", e)))
    }

    /// Decrypt a persisted payload
    pub fn decrypt_payload(&self, payload: &EncryptedPayload) -> Result<String> {
        self.decrypt(&payload.ciphertext, &payload.iv)
    }

    fn mac(&self, iv: &[u8], body: &[u8]) -> Result<HmacSha256> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.mac_key.as_bytes())
            .map_err(|e| VaultError::Configuration(format!("invalid HMAC key: {}", e)))?;
        mac.update(iv);
        mac.update(body);
        Ok(mac)
    }
}

impl std::fmt::Debug for CryptoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoCodec")
            .field("cipher", &"AES-256-CBC + HMAC-SHA256")
            .finish_non_exhaustive()
    }
}
