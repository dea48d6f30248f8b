//! Error types for `sifrerule` operations.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rule construction, lookup and value transformation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A column rule violates a construction-time invariant.
    ///
    /// Fatal to the reconfiguration attempt; the previously published rule
    /// generation stays active.
    #[error("invalid encrypt configuration for {table}.{column}: {reason}")]
    InvalidConfiguration {
        /// Logical table that owns the offending column
        table: String,
        /// Logical column that failed validation
        column: String,
        /// What was wrong with it
        reason: String,
    },

    /// No encryptor is resolvable for the column being transformed.
    #[error("can not find encryptor by {table}.{column}")]
    EncryptorNotFound {
        /// Logical table name as supplied by the caller
        table: String,
        /// Logical column name as supplied by the caller
        column: String,
    },

    /// No assisted-query encryptor is resolvable for the column being transformed.
    #[error("can not find assisted query encryptor by {table}.{column}")]
    AssistedQueryEncryptorNotFound {
        /// Logical table name as supplied by the caller
        table: String,
        /// Logical column name as supplied by the caller
        column: String,
    },

    /// The table or column is not configured for encryption.
    #[error("encrypt column not found: {table}.{column}")]
    ColumnNotFound {
        /// Logical table name as supplied by the caller
        table: String,
        /// Logical column name as supplied by the caller
        column: String,
    },

    /// Algorithm type has no registered implementation
    #[error("unknown encrypt algorithm type: {0}")]
    UnknownAlgorithmType(String),

    /// Algorithm property missing or malformed
    #[error("invalid property `{property}` for algorithm {algorithm}: {reason}")]
    InvalidAlgorithmProperty {
        /// Algorithm type being constructed
        algorithm: String,
        /// Property key
        property: String,
        /// What was wrong with it
        reason: String,
    },

    /// Key has the wrong length for the selected cipher
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required key length in bytes
        expected: usize,
        /// Supplied key length in bytes
        actual: usize,
    },

    /// Encryption operation failed
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption operation failed
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The algorithm does not support the requested operation
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Rule configuration could not be parsed
    #[error("configuration parse error: {0}")]
    ConfigParse(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_configuration(
        table: &str,
        column: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            table: table.to_string(),
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_property(
        algorithm: &str,
        property: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidAlgorithmProperty {
            algorithm: algorithm.to_string(),
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}
