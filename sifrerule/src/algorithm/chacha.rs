//! Randomized encryption with ChaCha20-Poly1305.
//!
//! A per-context data key is derived from the configured master key with
//! HKDF-SHA256, using the context string `database|schema|table|column` as
//! the `info` parameter. Each value gets a fresh random nonce, so equal
//! plaintexts produce different ciphertexts.
//!
//! Cipher layout: `[nonce:12][ciphertext+tag]`, base64 encoded.

use chacha20poly1305::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng, Payload},
    ChaCha20Poly1305, Nonce,
};
use hkdf::Hkdf;
use secrecy::{ExposeSecret, SecretVec};
use sha2::Sha256;
use std::collections::HashMap;

use super::{decode_cipher, encode_cipher, hex_key_prop, EncryptAlgorithm};
use crate::context::EncryptContext;
use crate::error::{Error, Result};
use crate::value::Value;

/// Master and data key size in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Nonce size for ChaCha20-Poly1305 (96 bits).
const NONCE_SIZE: usize = 12;

/// Randomized AEAD encryption for cipher columns.
pub struct ChaChaEncryptAlgorithm {
    master_key: SecretVec<u8>,
}

impl ChaChaEncryptAlgorithm {
    pub const TYPE: &'static str = "CHACHA20_POLY1305";

    /// Hex-encoded 32-byte master key.
    pub const KEY_PROP: &'static str = "master-key-value";

    /// Creates the algorithm with the provided master key.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKeyLength` if the key is not 32 bytes.
    pub fn new(master_key: SecretVec<u8>) -> Result<Self> {
        let actual = master_key.expose_secret().len();
        if actual != KEY_SIZE {
            return Err(Error::InvalidKeyLength { expected: KEY_SIZE, actual });
        }
        Ok(Self { master_key })
    }

    /// Creates the algorithm from its configuration properties.
    ///
    /// # Errors
    ///
    /// Returns an error if `master-key-value` is missing, not hex, or the wrong length.
    pub fn from_props(props: &HashMap<String, String>) -> Result<Self> {
        Self::new(hex_key_prop(props, Self::TYPE, Self::KEY_PROP)?)
    }

    /// Derives the data key for one context.
    fn derive_data_key(&self, context: &EncryptContext) -> Result<SecretVec<u8>> {
        let hkdf = Hkdf::<Sha256>::new(None, self.master_key.expose_secret());
        let info = context.to_string();

        let mut key = vec![0u8; KEY_SIZE];
        hkdf.expand(info.as_bytes(), &mut key)
            .map_err(|_| Error::Encryption("key derivation failed".to_string()))?;

        Ok(SecretVec::new(key))
    }
}

impl EncryptAlgorithm for ChaChaEncryptAlgorithm {
    fn algorithm_type(&self) -> &'static str {
        Self::TYPE
    }

    fn encrypt(&self, plain: &Value, context: &EncryptContext) -> Result<Value> {
        let key = self.derive_data_key(context)?;
        let cipher = ChaCha20Poly1305::new_from_slice(key.expose_secret())
            .map_err(|e| Error::Encryption(format!("Invalid data key: {e}")))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from(nonce_bytes);

        let plain = plain.to_plain_bytes();
        let aad = context.to_string();
        let sealed = cipher
            .encrypt(&nonce, Payload { msg: plain.as_ref(), aad: aad.as_bytes() })
            .map_err(|e| Error::Encryption(format!("ChaCha20-Poly1305 encryption failed: {e}")))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&sealed);
        Ok(encode_cipher(&out))
    }

    fn decrypt(&self, cipher_value: &Value, context: &EncryptContext) -> Result<Value> {
        let bytes = decode_cipher(cipher_value)?;
        if bytes.len() < NONCE_SIZE {
            return Err(Error::Decryption("cipher value shorter than nonce".to_string()));
        }
        let (nonce_bytes, sealed) = bytes.split_at(NONCE_SIZE);

        let key = self.derive_data_key(context).map_err(|e| Error::Decryption(e.to_string()))?;
        let cipher = ChaCha20Poly1305::new_from_slice(key.expose_secret())
            .map_err(|e| Error::Decryption(format!("Invalid data key: {e}")))?;

        let aad = context.to_string();
        let plain = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), Payload { msg: sealed, aad: aad.as_bytes() })
            .map_err(|_| Error::Decryption("authentication failed".to_string()))?;
        Ok(Value::from_plain_bytes(plain))
    }
}
