//! The encrypt rule: validated, immutable mapping from logical tables and
//! columns to their physical layout and encryptors.
//!
//! A rule is built once per configuration change and never mutated
//! afterwards (apart from pushing schema metadata into schema-aware
//! encryptors). Reconfiguration builds a brand-new rule and swaps it in;
//! see [`EncryptRuleContext`](crate::holder::EncryptRuleContext).

mod column;
mod table;

pub use column::EncryptColumn;
pub use table::EncryptTable;

use crate::algorithm::EncryptAlgorithm;
use crate::config::{EncryptColumnRuleConfiguration, EncryptRuleConfiguration};
use crate::context::EncryptContext;
use crate::error::{Error, Result};
use crate::registry::EncryptorRegistry;
use crate::schema::Schemas;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Identifier returned by [`EncryptRule::rule_type`].
pub const RULE_TYPE: &str = "EncryptRule";

/// Top-level encrypt rule.
///
/// All table and column name lookups are case-insensitive.
///
/// # Example
///
/// ```
/// use sifrerule::config::{
///     AlgorithmConfiguration, EncryptColumnRuleConfiguration, EncryptRuleConfiguration,
///     EncryptTableRuleConfiguration,
/// };
/// use sifrerule::rule::EncryptRule;
///
/// let mut config = EncryptRuleConfiguration::default();
/// config.encryptors.insert(
///     "aes".into(),
///     AlgorithmConfiguration::new("AES_SIV").with_prop("aes-key-value", "00".repeat(64)),
/// );
/// config.tables.push(EncryptTableRuleConfiguration::new(
///     "t_order",
///     [EncryptColumnRuleConfiguration::new("order_id", "order_id_cipher", "aes")],
/// ));
///
/// let rule = EncryptRule::new(&config).unwrap();
/// assert_eq!(rule.get_cipher_column("T_ORDER", "ORDER_ID").unwrap(), "order_id_cipher");
/// ```
#[derive(Debug, Clone)]
pub struct EncryptRule {
    registry: Arc<EncryptorRegistry>,
    tables: HashMap<String, EncryptTable>,
    query_with_cipher_column: bool,
}

impl EncryptRule {
    /// Validates the configuration and builds its encryptors through the
    /// algorithm factory.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if any column rule is
    /// inconsistent, or an algorithm error if an encryptor can't be built.
    /// Nothing is constructed on failure.
    pub fn new(config: &EncryptRuleConfiguration) -> Result<Self> {
        let declared = &config.encryptors;
        validate(config, declared.is_empty(), |name| declared.contains_key(name))?;
        let registry = EncryptorRegistry::from_configurations(&config.encryptors)?;
        Ok(Self::build(config, Arc::new(registry)))
    }

    /// Validates the configuration against already-built encryptors.
    ///
    /// `config.encryptors` is ignored; encryptor names resolve in `registry`.
    /// The registry is shared, not copied, so consecutive rule generations
    /// can reuse the same instances.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if any column rule is
    /// inconsistent with `registry`.
    pub fn with_registry(
        config: &EncryptRuleConfiguration,
        registry: Arc<EncryptorRegistry>,
    ) -> Result<Self> {
        validate(config, registry.is_empty(), |name| registry.contains(name))?;
        Ok(Self::build(config, registry))
    }

    fn build(config: &EncryptRuleConfiguration, registry: Arc<EncryptorRegistry>) -> Self {
        let mut tables = HashMap::with_capacity(config.tables.len());
        for each in &config.tables {
            if tables.insert(each.name.to_lowercase(), EncryptTable::new(each)).is_some() {
                warn!(table = %each.name, "duplicate encrypt table, later definition wins");
            }
        }
        debug!(
            tables = tables.len(),
            encryptors = registry.len(),
            query_with_cipher_column = config.query_with_cipher_column,
            "encrypt rule built"
        );
        Self { registry, tables, query_with_cipher_column: config.query_with_cipher_column }
    }

    /// Finds the encrypt table for a logical table.
    #[must_use]
    pub fn find_encrypt_table(&self, logic_table: &str) -> Option<&EncryptTable> {
        self.tables.get(&logic_table.to_lowercase())
    }

    /// Finds the encrypt column for a logical table and column.
    #[must_use]
    pub fn find_encrypt_column(
        &self,
        logic_table: &str,
        logic_column: &str,
    ) -> Option<&EncryptColumn> {
        self.find_encrypt_table(logic_table)?.find_encrypt_column(logic_column)
    }

    /// Resolves the encryptor of a column's cipher side.
    #[must_use]
    pub fn find_encryptor(
        &self,
        logic_table: &str,
        logic_column: &str,
    ) -> Option<&Arc<dyn EncryptAlgorithm>> {
        let name = self.find_encrypt_table(logic_table)?.find_encryptor_name(logic_column)?;
        self.registry.get(name)
    }

    /// Resolves the encryptor of a column's assisted-query side.
    #[must_use]
    pub fn find_assisted_query_encryptor(
        &self,
        logic_table: &str,
        logic_column: &str,
    ) -> Option<&Arc<dyn EncryptAlgorithm>> {
        let name = self
            .find_encrypt_table(logic_table)?
            .find_assisted_query_encryptor_name(logic_column)?;
        self.registry.get(name)
    }

    /// Encrypts a batch of values for a column's cipher side.
    ///
    /// The output has the same length and order as `original_values`; `None`
    /// (SQL `NULL`) passes through without invoking the encryptor.
    ///
    /// # Errors
    ///
    /// Returns `Error::EncryptorNotFound` if the column is not encrypted (the
    /// caller should have checked first), or the first encryptor failure.
    pub fn get_encrypt_values(
        &self,
        database_name: &str,
        schema_name: &str,
        logic_table: &str,
        logic_column: &str,
        original_values: &[Option<Value>],
    ) -> Result<Vec<Option<Value>>> {
        let encryptor = self.find_encryptor(logic_table, logic_column).ok_or_else(|| {
            Error::EncryptorNotFound {
                table: logic_table.to_string(),
                column: logic_column.to_string(),
            }
        })?;
        let context = encrypt_context(database_name, schema_name, logic_table, logic_column);
        transform_values(original_values, |v| encryptor.encrypt(v, &context))
    }

    /// Encrypts a batch of values for a column's assisted-query side.
    ///
    /// # Errors
    ///
    /// Returns `Error::AssistedQueryEncryptorNotFound` if the column has no
    /// assisted-query encryptor, or the first encryptor failure.
    pub fn get_encrypt_assisted_query_values(
        &self,
        database_name: &str,
        schema_name: &str,
        logic_table: &str,
        logic_column: &str,
        original_values: &[Option<Value>],
    ) -> Result<Vec<Option<Value>>> {
        let encryptor =
            self.find_assisted_query_encryptor(logic_table, logic_column).ok_or_else(|| {
                Error::AssistedQueryEncryptorNotFound {
                    table: logic_table.to_string(),
                    column: logic_column.to_string(),
                }
            })?;
        let context = encrypt_context(database_name, schema_name, logic_table, logic_column);
        transform_values(original_values, |v| encryptor.encrypt(v, &context))
    }

    /// Decrypts a batch of values read from a column's cipher side.
    ///
    /// # Errors
    ///
    /// Returns `Error::EncryptorNotFound` if the column is not encrypted, or
    /// the first decryption failure.
    pub fn get_decrypt_values(
        &self,
        database_name: &str,
        schema_name: &str,
        logic_table: &str,
        logic_column: &str,
        cipher_values: &[Option<Value>],
    ) -> Result<Vec<Option<Value>>> {
        let encryptor = self.find_encryptor(logic_table, logic_column).ok_or_else(|| {
            Error::EncryptorNotFound {
                table: logic_table.to_string(),
                column: logic_column.to_string(),
            }
        })?;
        let context = encrypt_context(database_name, schema_name, logic_table, logic_column);
        transform_values(cipher_values, |v| encryptor.decrypt(v, &context))
    }

    /// Returns the physical cipher column of an encrypted column.
    ///
    /// # Errors
    ///
    /// Returns `Error::ColumnNotFound` if the table or column is not configured.
    pub fn get_cipher_column(&self, logic_table: &str, logic_column: &str) -> Result<&str> {
        self.find_encrypt_column(logic_table, logic_column)
            .map(EncryptColumn::cipher_column)
            .ok_or_else(|| Error::ColumnNotFound {
                table: logic_table.to_string(),
                column: logic_column.to_string(),
            })
    }

    /// Logical to cipher column names of a table; empty if the table is unknown.
    #[must_use]
    pub fn get_logic_and_cipher_columns(&self, logic_table: &str) -> HashMap<String, String> {
        self.find_encrypt_table(logic_table)
            .map(EncryptTable::logic_and_cipher_columns)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn find_assisted_query_column(
        &self,
        logic_table: &str,
        logic_column: &str,
    ) -> Option<&str> {
        self.find_encrypt_table(logic_table)?.find_assisted_query_column(logic_column)
    }

    /// Assisted-query columns of a table; empty if the table is unknown.
    #[must_use]
    pub fn get_assisted_query_columns(&self, logic_table: &str) -> Vec<&str> {
        self.find_encrypt_table(logic_table)
            .map(EncryptTable::assisted_query_columns)
            .unwrap_or_default()
    }

    /// Finds the plain column of a logical column.
    ///
    /// The logical name is first resolved against the configured names
    /// ignoring case, so callers may pass any casing.
    #[must_use]
    pub fn find_plain_column(&self, logic_table: &str, logic_column: &str) -> Option<&str> {
        let origin = self.find_origin_column_name(logic_table, logic_column)?;
        self.find_encrypt_table(logic_table)?.find_plain_column(origin)
    }

    fn find_origin_column_name(&self, logic_table: &str, logic_column: &str) -> Option<&str> {
        let lower = logic_column.to_lowercase();
        self.find_encrypt_table(logic_table)?
            .columns()
            .map(EncryptColumn::logic_column)
            .find(|each| each.to_lowercase() == lower)
    }

    /// Whether queries on a column read the cipher column.
    ///
    /// Column override first, then table override, then the rule default.
    #[must_use]
    pub fn is_query_with_cipher_column(&self, logic_table: &str, logic_column: &str) -> bool {
        self.find_encrypt_table(logic_table)
            .and_then(|table| table.query_with_cipher_column(logic_column))
            .unwrap_or(self.query_with_cipher_column)
    }

    /// Rule-wide default query mode.
    #[must_use]
    pub const fn query_with_cipher_column(&self) -> bool {
        self.query_with_cipher_column
    }

    /// Lower-cased names of all configured logical tables.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    #[must_use]
    pub const fn rule_type(&self) -> &'static str {
        RULE_TYPE
    }

    /// Returns the shared encryptor registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<EncryptorRegistry> {
        &self.registry
    }

    /// Pushes schema metadata into every schema-aware encryptor.
    ///
    /// Encryptors may be shared with other rule generations; callers must
    /// serialize this with rule publication (see
    /// [`EncryptRuleContext`](crate::holder::EncryptRuleContext)).
    pub fn set_schema_meta_data(&self, database_name: &str, schemas: &Schemas) {
        self.registry.set_schema_meta_data(database_name, schemas);
    }
}

/// Context with table and column names in their lookup (lower-cased) form, so
/// the algorithm input does not depend on the caller's identifier case.
fn encrypt_context(
    database_name: &str,
    schema_name: &str,
    logic_table: &str,
    logic_column: &str,
) -> EncryptContext {
    EncryptContext::new(
        database_name,
        schema_name,
        logic_table.to_lowercase(),
        logic_column.to_lowercase(),
    )
}

fn transform_values<F>(values: &[Option<Value>], mut transform: F) -> Result<Vec<Option<Value>>>
where
    F: FnMut(&Value) -> Result<Value>,
{
    let mut result = Vec::with_capacity(values.len());
    for each in values {
        result.push(match each {
            Some(value) => Some(transform(value)?),
            None => None,
        });
    }
    Ok(result)
}

/// Construction-time gate. An empty rule (no tables, no encryptors) is valid.
fn validate<F>(config: &EncryptRuleConfiguration, no_encryptors: bool, contains: F) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    if config.tables.is_empty() && no_encryptors {
        return Ok(());
    }
    for table in &config.tables {
        for column in &table.columns {
            validate_cipher_column(&table.name, column, &contains)?;
            validate_assisted_query_column(&table.name, column, &contains)?;
        }
    }
    Ok(())
}

fn validate_cipher_column<F>(
    table: &str,
    column: &EncryptColumnRuleConfiguration,
    contains: &F,
) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    let invalid =
        |reason: String| Error::invalid_configuration(table, &column.logic_column, reason);
    if column.cipher_column.is_empty() {
        return Err(invalid("cipher column is required".to_string()));
    }
    if column.encryptor_name.is_empty() {
        return Err(invalid("encryptor name is required".to_string()));
    }
    if !contains(column.encryptor_name.as_str()) {
        return Err(invalid(format!("encryptor `{}` is not registered", column.encryptor_name)));
    }
    Ok(())
}

fn validate_assisted_query_column<F>(
    table: &str,
    column: &EncryptColumnRuleConfiguration,
    contains: &F,
) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    let invalid =
        |reason: String| Error::invalid_configuration(table, &column.logic_column, reason);
    let assisted_column = column.assisted_query_column.as_deref().filter(|c| !c.is_empty());
    let assisted_encryptor =
        column.assisted_query_encryptor_name.as_deref().filter(|e| !e.is_empty());
    match (assisted_column, assisted_encryptor) {
        (None, None) => Ok(()),
        (Some(_), None) => Err(invalid("assisted query encryptor name is required".to_string())),
        (None, Some(_)) => Err(invalid("assisted query column is required".to_string())),
        (Some(_), Some(name)) if !contains(name) => {
            Err(invalid(format!("assisted query encryptor `{name}` is not registered")))
        }
        (Some(_), Some(_)) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlgorithmConfiguration, EncryptTableRuleConfiguration};

    struct PrefixEncryptor(&'static str);

    impl EncryptAlgorithm for PrefixEncryptor {
        fn algorithm_type(&self) -> &'static str {
            "PREFIX"
        }

        fn encrypt(&self, plain: &Value, _context: &EncryptContext) -> Result<Value> {
            Ok(Value::Text(format!("{}{plain}", self.0)))
        }

        fn decrypt(&self, cipher: &Value, _context: &EncryptContext) -> Result<Value> {
            let text = cipher.as_text().unwrap_or_default();
            Ok(Value::Text(text.trim_start_matches(self.0).to_string()))
        }
    }

    fn registry() -> Arc<EncryptorRegistry> {
        Arc::new(
            EncryptorRegistry::new()
                .with_encryptor("aes", Arc::new(PrefixEncryptor("aes:")))
                .with_encryptor("md5", Arc::new(PrefixEncryptor("md5:"))),
        )
    }

    fn order_config() -> EncryptRuleConfiguration {
        EncryptRuleConfiguration {
            tables: vec![EncryptTableRuleConfiguration::new(
                "T_Order",
                [
                    EncryptColumnRuleConfiguration::new("Order_Id", "order_id_cipher", "aes")
                        .with_assisted_query("order_id_assisted", "md5")
                        .with_plain_column("order_id_plain"),
                    EncryptColumnRuleConfiguration::new("status", "status_cipher", "aes"),
                ],
            )],
            ..EncryptRuleConfiguration::default()
        }
    }

    fn order_rule() -> EncryptRule {
        EncryptRule::with_registry(&order_config(), registry()).unwrap()
    }

    #[test]
    fn test_empty_rule_is_valid() {
        let rule = EncryptRule::new(&EncryptRuleConfiguration::default()).unwrap();

        assert_eq!(rule.tables().count(), 0);
        assert!(rule.registry().is_empty());
        assert!(rule.find_encrypt_table("t_order").is_none());
    }

    #[test]
    fn test_empty_cipher_column_rejected() {
        let mut config = order_config();
        config.tables[0].columns[1].cipher_column = String::new();

        let err = EncryptRule::with_registry(&config, registry()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { ref column, .. } if column == "status"));
    }

    #[test]
    fn test_empty_encryptor_name_rejected() {
        let mut config = order_config();
        config.tables[0].columns[1].encryptor_name = String::new();

        assert!(matches!(
            EncryptRule::with_registry(&config, registry()),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_unregistered_encryptor_rejected() {
        let mut config = order_config();
        config.tables[0].columns[1].encryptor_name = "des".to_string();

        let err = EncryptRule::with_registry(&config, registry()).unwrap_err();
        assert!(err.to_string().contains("`des`"));
    }

    #[test]
    fn test_partial_assisted_query_rejected() {
        let mut config = order_config();
        config.tables[0].columns[0].assisted_query_encryptor_name = None;
        assert!(EncryptRule::with_registry(&config, registry()).is_err());

        let mut config = order_config();
        config.tables[0].columns[0].assisted_query_column = Some(String::new());
        assert!(EncryptRule::with_registry(&config, registry()).is_err());
    }

    #[test]
    fn test_unregistered_assisted_query_encryptor_rejected() {
        let mut config = order_config();
        config.tables[0].columns[0].assisted_query_encryptor_name = Some("sha1".to_string());

        assert!(matches!(
            EncryptRule::with_registry(&config, registry()),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_validation_checks_config_encryptors() {
        let mut config = order_config();
        config.encryptors.insert(
            "aes".to_string(),
            AlgorithmConfiguration::new("AES_SIV").with_prop("aes-key-value", "00".repeat(64)),
        );

        // md5 is referenced but not configured
        assert!(matches!(EncryptRule::new(&config), Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_tables_without_encryptors_rejected() {
        assert!(EncryptRule::new(&order_config()).is_err());
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let rule = order_rule();

        assert!(rule.find_encrypt_table("t_order").is_some());
        assert!(rule.find_encrypt_table("T_ORDER").is_some());
        assert_eq!(
            rule.find_encrypt_column("T_ORDER", "ORDER_ID").map(EncryptColumn::cipher_column),
            Some("order_id_cipher")
        );
        assert_eq!(rule.tables().collect::<Vec<_>>(), vec!["t_order"]);
    }

    #[test]
    fn test_find_encryptors() {
        let rule = order_rule();
        let ctx = EncryptContext::new("db", "sch", "t_order", "order_id");

        let aes = rule.find_encryptor("t_order", "order_id").unwrap();
        assert_eq!(aes.encrypt(&Value::Int(1), &ctx).unwrap(), Value::from("aes:1"));

        let md5 = rule.find_assisted_query_encryptor("t_order", "order_id").unwrap();
        assert_eq!(md5.encrypt(&Value::Int(1), &ctx).unwrap(), Value::from("md5:1"));

        assert!(rule.find_assisted_query_encryptor("t_order", "status").is_none());
        assert!(rule.find_encryptor("t_user", "order_id").is_none());
        assert!(rule.find_encryptor("t_order", "missing").is_none());
    }

    #[test]
    fn test_get_encrypt_values_preserves_nulls() {
        let rule = order_rule();
        let values = [Some(Value::Int(123)), None, Some(Value::Int(456))];

        let encrypted = rule.get_encrypt_values("db", "sch", "t_order", "order_id", &values).unwrap();

        assert_eq!(
            encrypted,
            vec![Some(Value::from("aes:123")), None, Some(Value::from("aes:456"))]
        );
    }

    #[test]
    fn test_get_encrypt_assisted_query_values() {
        let rule = order_rule();
        let values = [None, Some(Value::from("x"))];

        let encrypted = rule
            .get_encrypt_assisted_query_values("db", "sch", "T_ORDER", "order_id", &values)
            .unwrap();

        assert_eq!(encrypted, vec![None, Some(Value::from("md5:x"))]);
    }

    /// Echoes the context it was invoked with.
    struct ContextEncryptor;

    impl EncryptAlgorithm for ContextEncryptor {
        fn algorithm_type(&self) -> &'static str {
            "CONTEXT"
        }

        fn encrypt(&self, _plain: &Value, context: &EncryptContext) -> Result<Value> {
            Ok(Value::Text(context.to_string()))
        }

        fn decrypt(&self, _cipher: &Value, context: &EncryptContext) -> Result<Value> {
            Ok(Value::Text(context.to_string()))
        }
    }

    #[test]
    fn test_transform_context_uses_lookup_case() {
        let registry = Arc::new(
            EncryptorRegistry::new()
                .with_encryptor("aes", Arc::new(ContextEncryptor))
                .with_encryptor("md5", Arc::new(ContextEncryptor)),
        );
        let rule = EncryptRule::with_registry(&order_config(), registry).unwrap();
        let values = [Some(Value::Int(1))];
        let expected = vec![Some(Value::from("db|sch|t_order|order_id"))];

        for (table, column) in [("t_order", "order_id"), ("T_ORDER", "ORDER_ID"), ("T_Order", "Order_Id")] {
            assert_eq!(rule.get_encrypt_values("db", "sch", table, column, &values).unwrap(), expected);
            assert_eq!(
                rule.get_encrypt_assisted_query_values("db", "sch", table, column, &values).unwrap(),
                expected
            );
            assert_eq!(rule.get_decrypt_values("db", "sch", table, column, &values).unwrap(), expected);
        }
    }

    #[test]
    fn test_get_encrypt_values_unresolvable_fails_fast() {
        let rule = order_rule();
        let values = [Some(Value::Int(1))];

        assert!(matches!(
            rule.get_encrypt_values("db", "sch", "t_order", "missing", &values),
            Err(Error::EncryptorNotFound { .. })
        ));
        assert!(matches!(
            rule.get_encrypt_assisted_query_values("db", "sch", "t_order", "status", &values),
            Err(Error::AssistedQueryEncryptorNotFound { .. })
        ));
    }

    #[test]
    fn test_get_decrypt_values() {
        let rule = order_rule();
        let values = [Some(Value::from("aes:42")), None];

        let decrypted = rule.get_decrypt_values("db", "sch", "t_order", "order_id", &values).unwrap();

        assert_eq!(decrypted, vec![Some(Value::from("42")), None]);
    }

    #[test]
    fn test_get_cipher_column() {
        let rule = order_rule();

        assert_eq!(rule.get_cipher_column("t_order", "status").unwrap(), "status_cipher");
        assert!(matches!(
            rule.get_cipher_column("t_user", "status"),
            Err(Error::ColumnNotFound { .. })
        ));
        assert!(matches!(
            rule.get_cipher_column("t_order", "missing"),
            Err(Error::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_logic_and_cipher_columns() {
        let rule = order_rule();
        let columns = rule.get_logic_and_cipher_columns("t_order");

        assert_eq!(columns.len(), 2);
        assert_eq!(columns["Order_Id"], "order_id_cipher");
        assert!(rule.get_logic_and_cipher_columns("t_user").is_empty());
    }

    #[test]
    fn test_assisted_query_columns() {
        let rule = order_rule();

        assert_eq!(rule.find_assisted_query_column("t_order", "order_id"), Some("order_id_assisted"));
        assert_eq!(rule.find_assisted_query_column("t_order", "status"), None);
        assert_eq!(rule.get_assisted_query_columns("t_order"), vec!["order_id_assisted"]);
        assert!(rule.get_assisted_query_columns("t_user").is_empty());
    }

    #[test]
    fn test_find_plain_column() {
        let rule = order_rule();

        assert_eq!(rule.find_plain_column("t_order", "order_id"), Some("order_id_plain"));
        assert_eq!(rule.find_plain_column("t_order", "ORDER_ID"), Some("order_id_plain"));
        assert_eq!(rule.find_plain_column("t_order", "status"), None);
        assert_eq!(rule.find_plain_column("t_order", "missing"), None);
        assert_eq!(rule.find_plain_column("t_user", "order_id"), None);
    }

    #[test]
    fn test_query_with_cipher_column_override() {
        let mut config = order_config();
        config.query_with_cipher_column = false;
        config.tables[0].columns[0].query_with_cipher_column = Some(true);
        let rule = EncryptRule::with_registry(&config, registry()).unwrap();

        assert!(rule.is_query_with_cipher_column("t_order", "order_id"));
        assert!(!rule.is_query_with_cipher_column("t_order", "status"));
        assert!(!rule.is_query_with_cipher_column("t_user", "anything"));
        assert!(!rule.query_with_cipher_column());
    }

    #[test]
    fn test_rule_type() {
        assert_eq!(order_rule().rule_type(), "EncryptRule");
    }

    #[test]
    fn test_registry_shared_between_generations() {
        let shared = registry();
        let first = EncryptRule::with_registry(&order_config(), Arc::clone(&shared)).unwrap();
        let second = EncryptRule::with_registry(&order_config(), Arc::clone(&shared)).unwrap();

        assert!(Arc::ptr_eq(first.registry(), second.registry()));
        assert!(Arc::ptr_eq(
            first.find_encryptor("t_order", "order_id").unwrap(),
            second.find_encryptor("t_order", "order_id").unwrap()
        ));
    }
}
