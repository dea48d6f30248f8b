//! Deterministic encryption using AES-SIV.
//!
//! AES-SIV (Synthetic IV) is a misuse-resistant authenticated encryption mode
//! that produces deterministic output for the same plaintext and context.
//! That makes it usable both for cipher columns that must support equality
//! predicates and for assisted-query columns.
//!
//! # Security Warning
//!
//! Deterministic encryption reveals equality patterns within one column.

use aes_siv::{
    aead::{Aead, KeyInit, Payload},
    Aes256SivAead,
};
use secrecy::{ExposeSecret, SecretVec};
use std::collections::HashMap;
use zeroize::Zeroizing;

use super::{decode_cipher, encode_cipher, hex_key_prop, EncryptAlgorithm};
use crate::{
    context::EncryptContext,
    error::{Error, Result},
    value::Value,
};

/// AES-256-SIV requires a 64-byte key (512 bits).
const KEY_SIZE: usize = 64;

/// Deterministic encryption using AES-256-SIV.
///
/// # Example
///
/// ```rust,ignore
/// use sifrerule::algorithm::{AesSivEncryptAlgorithm, EncryptAlgorithm};
/// use sifrerule::context::EncryptContext;
/// use secrecy::SecretVec;
///
/// let aes = AesSivEncryptAlgorithm::new(SecretVec::new(vec![0u8; 64]))?;
/// let ctx = EncryptContext::new("db", "public", "t_user", "email");
///
/// let c1 = aes.encrypt(&"alice@example.com".into(), &ctx)?;
/// let c2 = aes.encrypt(&"alice@example.com".into(), &ctx)?;
/// assert_eq!(c1, c2); // Deterministic!
/// ```
pub struct AesSivEncryptAlgorithm {
    key: SecretVec<u8>,
}

impl AesSivEncryptAlgorithm {
    pub const TYPE: &'static str = "AES_SIV";

    /// Hex-encoded 64-byte key.
    pub const KEY_PROP: &'static str = "aes-key-value";

    /// Creates the algorithm with the provided key.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKeyLength` if the key is not 64 bytes.
    pub fn new(key: SecretVec<u8>) -> Result<Self> {
        let actual = key.expose_secret().len();
        if actual != KEY_SIZE {
            return Err(Error::InvalidKeyLength { expected: KEY_SIZE, actual });
        }
        Ok(Self { key })
    }

    /// Creates the algorithm from its configuration properties.
    ///
    /// # Errors
    ///
    /// Returns an error if `aes-key-value` is missing, not hex, or the wrong length.
    pub fn from_props(props: &HashMap<String, String>) -> Result<Self> {
        Self::new(hex_key_prop(props, Self::TYPE, Self::KEY_PROP)?)
    }

    fn cipher(&self) -> Result<Aes256SivAead> {
        Aes256SivAead::new_from_slice(self.key.expose_secret())
            .map_err(|e| Error::Encryption(format!("Failed to create AES-SIV cipher: {e}")))
    }
}

impl EncryptAlgorithm for AesSivEncryptAlgorithm {
    fn algorithm_type(&self) -> &'static str {
        Self::TYPE
    }

    fn encrypt(&self, plain: &Value, context: &EncryptContext) -> Result<Value> {
        let cipher = self.cipher()?;
        let plain = plain.to_plain_bytes();

        // Context as AAD for domain separation
        let aad = Zeroizing::new(context.to_string().into_bytes());
        let payload = Payload { msg: plain.as_ref(), aad: aad.as_slice() };

        // AES-SIV is deterministic - uses empty nonce
        let bytes = cipher
            .encrypt(&Default::default(), payload)
            .map_err(|e| Error::Encryption(format!("AES-SIV encryption failed: {e}")))?;
        Ok(encode_cipher(&bytes))
    }

    fn decrypt(&self, cipher_value: &Value, context: &EncryptContext) -> Result<Value> {
        let cipher = self.cipher().map_err(|e| Error::Decryption(e.to_string()))?;
        let bytes = decode_cipher(cipher_value)?;

        let aad = Zeroizing::new(context.to_string().into_bytes());
        let payload = Payload { msg: &bytes, aad: aad.as_slice() };

        let plain = cipher
            .decrypt(&Default::default(), payload)
            .map_err(|e| Error::Decryption(format!("AES-SIV decryption failed: {e}")))?;
        Ok(Value::from_plain_bytes(plain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_algorithm() -> AesSivEncryptAlgorithm {
        AesSivEncryptAlgorithm::new(SecretVec::new(vec![0x42; KEY_SIZE])).unwrap()
    }

    fn ctx(column: &str) -> EncryptContext {
        EncryptContext::new("db", "public", "t_user", column)
    }

    #[test]
    fn test_deterministic_encryption() {
        let aes = create_test_algorithm();
        let plain = Value::from("alice@example.com");

        let c1 = aes.encrypt(&plain, &ctx("email")).unwrap();
        let c2 = aes.encrypt(&plain, &ctx("email")).unwrap();

        assert_eq!(c1, c2, "Encryption must be deterministic");
        assert_ne!(c1, plain);
    }

    #[test]
    fn test_decrypt() {
        let aes = create_test_algorithm();
        let cipher = aes.encrypt(&Value::from("alice@example.com"), &ctx("email")).unwrap();

        assert_eq!(aes.decrypt(&cipher, &ctx("email")).unwrap(), Value::from("alice@example.com"));
    }

    #[test]
    fn test_int_decrypts_to_decimal_text() {
        let aes = create_test_algorithm();
        let cipher = aes.encrypt(&Value::Int(123), &ctx("order_id")).unwrap();

        assert_eq!(aes.decrypt(&cipher, &ctx("order_id")).unwrap(), Value::from("123"));
    }

    #[test]
    fn test_different_contexts_different_ciphertexts() {
        let aes = create_test_algorithm();
        let plain = Value::from("alice@example.com");

        let c1 = aes.encrypt(&plain, &ctx("email")).unwrap();
        let c2 = aes.encrypt(&plain, &ctx("phone")).unwrap();

        assert_ne!(c1, c2, "Different contexts must produce different ciphertexts");
    }

    #[test]
    fn test_wrong_context_fails_authentication() {
        let aes = create_test_algorithm();
        let cipher = aes.encrypt(&Value::from("alice"), &ctx("email")).unwrap();

        assert!(matches!(aes.decrypt(&cipher, &ctx("phone")), Err(Error::Decryption(_))));
    }

    #[test]
    fn test_invalid_key_length() {
        let result = AesSivEncryptAlgorithm::new(SecretVec::new(vec![0x42; 32]));

        assert!(matches!(result, Err(Error::InvalidKeyLength { expected: 64, actual: 32 })));
    }

    #[test]
    fn test_from_props() {
        let props = HashMap::from([(
            AesSivEncryptAlgorithm::KEY_PROP.to_string(),
            "42".repeat(KEY_SIZE),
        )]);
        let aes = AesSivEncryptAlgorithm::from_props(&props).unwrap();
        let plain = Value::from("x");

        assert_eq!(
            aes.encrypt(&plain, &ctx("c")).unwrap(),
            create_test_algorithm().encrypt(&plain, &ctx("c")).unwrap()
        );
    }
}
