//! Physical layout of one logical column.

use crate::config::EncryptColumnRuleConfiguration;

/// Immutable descriptor mapping a logical column to its cipher,
/// assisted-query and plain columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptColumn {
    logic_column: String,
    cipher_column: String,
    encryptor_name: String,
    assisted_query_column: Option<String>,
    assisted_query_encryptor_name: Option<String>,
    plain_column: Option<String>,
    query_with_cipher_column: Option<bool>,
}

/// Empty strings in optional configuration fields mean "not configured".
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl EncryptColumn {
    /// Builds the descriptor from an already-validated column rule.
    #[must_use]
    pub fn new(config: &EncryptColumnRuleConfiguration) -> Self {
        Self {
            logic_column: config.logic_column.clone(),
            cipher_column: config.cipher_column.clone(),
            encryptor_name: config.encryptor_name.clone(),
            assisted_query_column: non_empty(config.assisted_query_column.as_ref()),
            assisted_query_encryptor_name: non_empty(config.assisted_query_encryptor_name.as_ref()),
            plain_column: non_empty(config.plain_column.as_ref()),
            query_with_cipher_column: config.query_with_cipher_column,
        }
    }

    /// Returns the logical column name with its configured case.
    #[must_use]
    pub fn logic_column(&self) -> &str {
        &self.logic_column
    }

    #[must_use]
    pub fn cipher_column(&self) -> &str {
        &self.cipher_column
    }

    #[must_use]
    pub fn encryptor_name(&self) -> &str {
        &self.encryptor_name
    }

    #[must_use]
    pub fn assisted_query_column(&self) -> Option<&str> {
        self.assisted_query_column.as_deref()
    }

    #[must_use]
    pub fn assisted_query_encryptor_name(&self) -> Option<&str> {
        self.assisted_query_encryptor_name.as_deref()
    }

    #[must_use]
    pub fn plain_column(&self) -> Option<&str> {
        self.plain_column.as_deref()
    }

    /// Per-column query mode override, if configured.
    #[must_use]
    pub const fn query_with_cipher_column(&self) -> Option<bool> {
        self.query_with_cipher_column
    }
}
