//! Encryptor capability and the built-in algorithm factory.
//!
//! The rule engine never performs cryptography itself: it resolves a named
//! [`EncryptAlgorithm`] and invokes it once per non-null value.

mod aes_siv;
mod chacha;
mod hmac_index;

pub use aes_siv::AesSivEncryptAlgorithm;
pub use chacha::ChaChaEncryptAlgorithm;
pub use hmac_index::HmacIndexAlgorithm;

use crate::config::AlgorithmConfiguration;
use crate::context::EncryptContext;
use crate::error::{Error, Result};
use crate::schema::SchemaMetaDataAware;
use crate::value::Value;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::SecretVec;
use std::collections::HashMap;
use std::sync::Arc;

/// A named, ready-to-use value transformation.
///
/// Implementations must be thread-safe (`Send + Sync`): a single instance
/// serves every connection and may be shared by several rule generations.
pub trait EncryptAlgorithm: Send + Sync {
    /// Returns the algorithm type this instance was built from.
    fn algorithm_type(&self) -> &'static str;

    /// Encrypts one non-null value.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encryption` if the underlying cipher fails.
    fn encrypt(&self, plain: &Value, context: &EncryptContext) -> Result<Value>;

    /// Decrypts one non-null value previously produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// Returns `Error::Decryption` if the value is malformed or fails
    /// authentication, `Error::UnsupportedOperation` for one-way algorithms.
    fn decrypt(&self, cipher: &Value, context: &EncryptContext) -> Result<Value>;

    /// Returns the schema-awareness capability, if this algorithm has one.
    fn as_schema_meta_data_aware(&self) -> Option<&dyn SchemaMetaDataAware> {
        None
    }
}

/// Builds algorithm instances from their configuration by type name.
pub struct AlgorithmFactory;

impl AlgorithmFactory {
    /// Creates a new algorithm instance.
    ///
    /// The type is matched case-insensitively against the built-in algorithms.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAlgorithmType` for an unsupported type, or the
    /// algorithm's own error if its properties are invalid.
    pub fn new_instance(config: &AlgorithmConfiguration) -> Result<Arc<dyn EncryptAlgorithm>> {
        let algorithm: Arc<dyn EncryptAlgorithm> =
            match config.algorithm_type.to_uppercase().as_str() {
                AesSivEncryptAlgorithm::TYPE => {
                    Arc::new(AesSivEncryptAlgorithm::from_props(&config.props)?)
                }
                ChaChaEncryptAlgorithm::TYPE => {
                    Arc::new(ChaChaEncryptAlgorithm::from_props(&config.props)?)
                }
                HmacIndexAlgorithm::TYPE => {
                    Arc::new(HmacIndexAlgorithm::from_props(&config.props)?)
                }
                _ => return Err(Error::UnknownAlgorithmType(config.algorithm_type.clone())),
            };
        Ok(algorithm)
    }

    /// Returns true if `algorithm_type` names a built-in algorithm.
    #[must_use]
    pub fn contains(algorithm_type: &str) -> bool {
        matches!(
            algorithm_type.to_uppercase().as_str(),
            AesSivEncryptAlgorithm::TYPE | ChaChaEncryptAlgorithm::TYPE | HmacIndexAlgorithm::TYPE
        )
    }
}

/// Reads a hex-encoded key property into secret storage.
fn hex_key_prop(
    props: &HashMap<String, String>,
    algorithm: &str,
    property: &str,
) -> Result<SecretVec<u8>> {
    let encoded = props
        .get(property)
        .ok_or_else(|| Error::invalid_property(algorithm, property, "missing"))?;
    let key = hex::decode(encoded.trim())
        .map_err(|e| Error::invalid_property(algorithm, property, format!("not hex: {e}")))?;
    Ok(SecretVec::new(key))
}

fn encode_cipher(bytes: &[u8]) -> Value {
    Value::Text(STANDARD.encode(bytes))
}

fn decode_cipher(cipher: &Value) -> Result<Vec<u8>> {
    let text = cipher
        .as_text()
        .ok_or_else(|| Error::Decryption("cipher value must be base64 text".to_string()))?;
    STANDARD.decode(text).map_err(|e| Error::Decryption(format!("invalid base64: {e}")))
}
