//! Declarative rule configuration records.
//!
//! These are plain data: nothing here is validated. Validation happens once,
//! when an [`EncryptRule`](crate::rule::EncryptRule) is built from them.
//!
//! ```toml
//! query_with_cipher_column = true
//!
//! [encryptors.aes]
//! type = "AES_SIV"
//! props = { aes-key-value = "..." }
//!
//! [[tables]]
//! name = "t_order"
//!
//! [[tables.columns]]
//! logic_column = "order_id"
//! cipher_column = "order_id_cipher"
//! encryptor_name = "aes"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const fn default_query_with_cipher_column() -> bool {
    true
}

/// Type and properties of one named encryptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmConfiguration {
    #[serde(rename = "type")]
    pub algorithm_type: String,
    #[serde(default)]
    pub props: HashMap<String, String>,
}

impl AlgorithmConfiguration {
    #[must_use]
    pub fn new(algorithm_type: impl Into<String>) -> Self {
        Self { algorithm_type: algorithm_type.into(), props: HashMap::new() }
    }

    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

/// Physical layout of one logical column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptColumnRuleConfiguration {
    pub logic_column: String,
    #[serde(default)]
    pub cipher_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assisted_query_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_column: Option<String>,
    #[serde(default)]
    pub encryptor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assisted_query_encryptor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_with_cipher_column: Option<bool>,
}

impl EncryptColumnRuleConfiguration {
    /// Creates a column rule with the mandatory cipher side only.
    #[must_use]
    pub fn new(
        logic_column: impl Into<String>,
        cipher_column: impl Into<String>,
        encryptor_name: impl Into<String>,
    ) -> Self {
        Self {
            logic_column: logic_column.into(),
            cipher_column: cipher_column.into(),
            encryptor_name: encryptor_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_assisted_query(
        mut self,
        column: impl Into<String>,
        encryptor_name: impl Into<String>,
    ) -> Self {
        self.assisted_query_column = Some(column.into());
        self.assisted_query_encryptor_name = Some(encryptor_name.into());
        self
    }

    #[must_use]
    pub fn with_plain_column(mut self, column: impl Into<String>) -> Self {
        self.plain_column = Some(column.into());
        self
    }

    #[must_use]
    pub const fn with_query_with_cipher_column(mut self, enabled: bool) -> Self {
        self.query_with_cipher_column = Some(enabled);
        self
    }
}

/// Encrypted columns of one logical table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptTableRuleConfiguration {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<EncryptColumnRuleConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_with_cipher_column: Option<bool>,
}

impl EncryptTableRuleConfiguration {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = EncryptColumnRuleConfiguration>,
    ) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().collect(),
            query_with_cipher_column: None,
        }
    }
}

/// Complete rule configuration: tables, named encryptors and the rule-wide
/// query mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptRuleConfiguration {
    #[serde(default)]
    pub tables: Vec<EncryptTableRuleConfiguration>,
    #[serde(default)]
    pub encryptors: HashMap<String, AlgorithmConfiguration>,
    #[serde(default = "default_query_with_cipher_column")]
    pub query_with_cipher_column: bool,
}

impl Default for EncryptRuleConfiguration {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            encryptors: HashMap::new(),
            query_with_cipher_column: default_query_with_cipher_column(),
        }
    }
}

impl EncryptRuleConfiguration {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` if the document is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` if the document is malformed.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a configuration file; `.json` files are parsed as JSON,
    /// everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file can't be read, or
    /// `Error::ConfigParse` if it is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Serializes the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER_TOML: &str = r#"
query_with_cipher_column = false

[encryptors.aes]
type = "AES_SIV"
props = { aes-key-value = "00" }

[encryptors.md5]
type = "HMAC_SHA256"

[[tables]]
name = "t_order"

[[tables.columns]]
logic_column = "order_id"
cipher_column = "order_id_cipher"
encryptor_name = "aes"
assisted_query_column = "order_id_assisted"
assisted_query_encryptor_name = "md5"
query_with_cipher_column = true
"#;

    #[test]
    fn test_parse_toml() {
        let config = EncryptRuleConfiguration::from_toml_str(ORDER_TOML).unwrap();

        assert!(!config.query_with_cipher_column);
        assert_eq!(config.encryptors.len(), 2);
        assert_eq!(config.encryptors["aes"].algorithm_type, "AES_SIV");
        assert_eq!(config.encryptors["aes"].props["aes-key-value"], "00");
        assert!(config.encryptors["md5"].props.is_empty());

        let column = &config.tables[0].columns[0];
        assert_eq!(column.assisted_query_column.as_deref(), Some("order_id_assisted"));
        assert_eq!(column.plain_column, None);
        assert_eq!(column.query_with_cipher_column, Some(true));
    }

    #[test]
    fn test_query_with_cipher_column_defaults_to_true() {
        let config = EncryptRuleConfiguration::from_toml_str("").unwrap();

        assert!(config.query_with_cipher_column);
        assert!(config.tables.is_empty());
        assert!(config.encryptors.is_empty());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "encryptors": {"aes": {"type": "AES_SIV", "props": {"aes-key-value": "00"}}},
            "tables": [{"name": "t_user", "columns": [
                {"logic_column": "pwd", "cipher_column": "pwd_cipher", "encryptor_name": "aes", "plain_column": "pwd_plain"}
            ]}]
        }"#;
        let config = EncryptRuleConfiguration::from_json_str(json).unwrap();

        assert!(config.query_with_cipher_column);
        assert_eq!(config.tables[0].columns[0].plain_column.as_deref(), Some("pwd_plain"));
    }

    #[test]
    fn test_malformed_document() {
        let result = EncryptRuleConfiguration::from_toml_str("[[tables]\nname = 1");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EncryptRuleConfiguration::from_toml_str(ORDER_TOML).unwrap();
        let reparsed =
            EncryptRuleConfiguration::from_toml_str(&config.to_toml_string().unwrap()).unwrap();

        assert_eq!(config, reparsed);
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("rule.toml");
        std::fs::write(&toml_path, ORDER_TOML).unwrap();
        let json_path = dir.path().join("rule.JSON");
        std::fs::write(&json_path, r#"{"query_with_cipher_column": false}"#).unwrap();

        assert_eq!(EncryptRuleConfiguration::from_path(&toml_path).unwrap().tables.len(), 1);
        assert!(!EncryptRuleConfiguration::from_path(&json_path).unwrap().query_with_cipher_column);
        assert!(matches!(
            EncryptRuleConfiguration::from_path(dir.path().join("missing.toml")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_builders() {
        let column = EncryptColumnRuleConfiguration::new("pwd", "pwd_cipher", "aes")
            .with_assisted_query("pwd_assisted", "md5")
            .with_plain_column("pwd_plain")
            .with_query_with_cipher_column(false);

        assert_eq!(column.assisted_query_encryptor_name.as_deref(), Some("md5"));
        assert_eq!(column.plain_column.as_deref(), Some("pwd_plain"));
        assert_eq!(column.query_with_cipher_column, Some(false));
    }
}
