//! Keyed blind index for assisted-query columns.
//!
//! The index is computed as
//! `HMAC-SHA256(pepper, len(value) || value || context)[..size]`, with the
//! length as a big-endian `u64`.
//! It is deterministic and one-way: equality predicates can be rewritten to
//! compare indexes, but the value can't be recovered from it.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretVec};
use sha2::Sha256;
use std::collections::HashMap;

use super::{encode_cipher, hex_key_prop, EncryptAlgorithm};
use crate::context::EncryptContext;
use crate::error::{Error, Result};
use crate::value::Value;

type HmacSha256 = Hmac<Sha256>;

/// Default blind index output size (16 bytes).
pub const DEFAULT_INDEX_SIZE: usize = 16;

const MAX_INDEX_SIZE: usize = 32;

/// HMAC-SHA256 blind index.
pub struct HmacIndexAlgorithm {
    pepper: SecretVec<u8>,
    index_size: usize,
}

impl HmacIndexAlgorithm {
    pub const TYPE: &'static str = "HMAC_SHA256";

    /// Hex-encoded pepper.
    pub const PEPPER_PROP: &'static str = "pepper-value";

    /// Truncated output length in bytes, `1..=32`.
    pub const INDEX_SIZE_PROP: &'static str = "index-size";

    /// Creates the algorithm.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKeyLength` for an empty pepper and
    /// `Error::InvalidAlgorithmProperty` for an out-of-range index size.
    pub fn new(pepper: SecretVec<u8>, index_size: usize) -> Result<Self> {
        if pepper.expose_secret().is_empty() {
            return Err(Error::InvalidKeyLength { expected: 1, actual: 0 });
        }
        if !(1..=MAX_INDEX_SIZE).contains(&index_size) {
            return Err(Error::invalid_property(
                Self::TYPE,
                Self::INDEX_SIZE_PROP,
                format!("must be between 1 and {MAX_INDEX_SIZE}, got {index_size}"),
            ));
        }
        Ok(Self { pepper, index_size })
    }

    /// Creates the algorithm from its configuration properties.
    ///
    /// # Errors
    ///
    /// Returns an error if `pepper-value` is missing or not hex, or
    /// `index-size` is not a number in range.
    pub fn from_props(props: &HashMap<String, String>) -> Result<Self> {
        let pepper = hex_key_prop(props, Self::TYPE, Self::PEPPER_PROP)?;
        let index_size = match props.get(Self::INDEX_SIZE_PROP) {
            Some(raw) => raw.trim().parse().map_err(|e| {
                Error::invalid_property(Self::TYPE, Self::INDEX_SIZE_PROP, format!("{e}"))
            })?,
            None => DEFAULT_INDEX_SIZE,
        };
        Self::new(pepper, index_size)
    }
}

impl EncryptAlgorithm for HmacIndexAlgorithm {
    fn algorithm_type(&self) -> &'static str {
        Self::TYPE
    }

    fn encrypt(&self, plain: &Value, context: &EncryptContext) -> Result<Value> {
        let mut mac = HmacSha256::new_from_slice(self.pepper.expose_secret())
            .map_err(|e| Error::Encryption(format!("Invalid pepper: {e}")))?;

        let plain = plain.to_plain_bytes();
        mac.update(&(plain.len() as u64).to_be_bytes());
        mac.update(&plain);
        // Domain separation (database|schema|table|column)
        mac.update(context.to_string().as_bytes());

        let bytes = mac.finalize().into_bytes();
        Ok(encode_cipher(&bytes[..self.index_size]))
    }

    fn decrypt(&self, _cipher: &Value, _context: &EncryptContext) -> Result<Value> {
        Err(Error::UnsupportedOperation(format!("{} is a one-way algorithm", Self::TYPE)))
    }
}
