//! Encrypted columns of one logical table.

use super::column::EncryptColumn;
use crate::config::EncryptTableRuleConfiguration;
use std::collections::HashMap;

/// Immutable mapping from logical column name (case-insensitive) to its
/// [`EncryptColumn`]. Column order follows the configuration.
#[derive(Debug, Clone)]
pub struct EncryptTable {
    name: String,
    columns: Vec<EncryptColumn>,
    index: HashMap<String, usize>,
    query_with_cipher_column: Option<bool>,
}

impl EncryptTable {
    /// Builds the table from an already-validated table rule.
    ///
    /// If two columns differ only by case, the later one wins.
    #[must_use]
    pub fn new(config: &EncryptTableRuleConfiguration) -> Self {
        let mut columns: Vec<EncryptColumn> = Vec::with_capacity(config.columns.len());
        let mut index = HashMap::with_capacity(config.columns.len());
        for each in &config.columns {
            let column = EncryptColumn::new(each);
            let key = each.logic_column.to_lowercase();
            match index.get(&key).copied() {
                Some(pos) => columns[pos] = column,
                None => {
                    index.insert(key, columns.len());
                    columns.push(column);
                }
            }
        }
        Self {
            name: config.name.clone(),
            columns,
            index,
            query_with_cipher_column: config.query_with_cipher_column,
        }
    }

    /// Returns the table name with its configured case.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn find_encrypt_column(&self, logic_column: &str) -> Option<&EncryptColumn> {
        self.index.get(&logic_column.to_lowercase()).map(|&pos| &self.columns[pos])
    }

    pub fn columns(&self) -> impl Iterator<Item = &EncryptColumn> {
        self.columns.iter()
    }

    #[must_use]
    pub fn find_encryptor_name(&self, logic_column: &str) -> Option<&str> {
        self.find_encrypt_column(logic_column).map(EncryptColumn::encryptor_name)
    }

    #[must_use]
    pub fn find_assisted_query_encryptor_name(&self, logic_column: &str) -> Option<&str> {
        self.find_encrypt_column(logic_column)
            .and_then(EncryptColumn::assisted_query_encryptor_name)
    }

    #[must_use]
    pub fn find_cipher_column(&self, logic_column: &str) -> Option<&str> {
        self.find_encrypt_column(logic_column).map(EncryptColumn::cipher_column)
    }

    /// Logical column names with their configured case.
    #[must_use]
    pub fn logic_columns(&self) -> Vec<&str> {
        self.columns.iter().map(EncryptColumn::logic_column).collect()
    }

    #[must_use]
    pub fn cipher_columns(&self) -> Vec<&str> {
        self.columns.iter().map(EncryptColumn::cipher_column).collect()
    }

    #[must_use]
    pub fn logic_and_cipher_columns(&self) -> HashMap<String, String> {
        self.columns
            .iter()
            .map(|c| (c.logic_column().to_string(), c.cipher_column().to_string()))
            .collect()
    }

    #[must_use]
    pub fn find_assisted_query_column(&self, logic_column: &str) -> Option<&str> {
        self.find_encrypt_column(logic_column).and_then(EncryptColumn::assisted_query_column)
    }

    #[must_use]
    pub fn assisted_query_columns(&self) -> Vec<&str> {
        self.columns.iter().filter_map(EncryptColumn::assisted_query_column).collect()
    }

    #[must_use]
    pub fn find_plain_column(&self, logic_column: &str) -> Option<&str> {
        self.find_encrypt_column(logic_column).and_then(EncryptColumn::plain_column)
    }

    #[must_use]
    pub fn plain_columns(&self) -> Vec<&str> {
        self.columns.iter().filter_map(EncryptColumn::plain_column).collect()
    }

    /// Returns true if `column` is one of this table's physical cipher columns.
    #[must_use]
    pub fn is_cipher_column(&self, column: &str) -> bool {
        let key = column.to_lowercase();
        self.columns.iter().any(|c| c.cipher_column().to_lowercase() == key)
    }

    /// Reverse lookup: the logical column stored in `cipher_column`.
    #[must_use]
    pub fn find_logic_column_by_cipher_column(&self, cipher_column: &str) -> Option<&str> {
        let key = cipher_column.to_lowercase();
        self.columns
            .iter()
            .find(|c| c.cipher_column().to_lowercase() == key)
            .map(EncryptColumn::logic_column)
    }

    /// Reverse lookup: the logical column projected into `assisted_query_column`.
    #[must_use]
    pub fn find_logic_column_by_assisted_query_column(
        &self,
        assisted_query_column: &str,
    ) -> Option<&str> {
        let key = assisted_query_column.to_lowercase();
        self.columns
            .iter()
            .find(|c| c.assisted_query_column().is_some_and(|a| a.to_lowercase() == key))
            .map(EncryptColumn::logic_column)
    }

    /// Query mode for a column: the column override, else the table override.
    /// `None` means the rule default applies.
    #[must_use]
    pub fn query_with_cipher_column(&self, logic_column: &str) -> Option<bool> {
        self.find_encrypt_column(logic_column)
            .and_then(EncryptColumn::query_with_cipher_column)
            .or(self.query_with_cipher_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncryptColumnRuleConfiguration;

    fn user_table() -> EncryptTable {
        EncryptTable::new(&EncryptTableRuleConfiguration::new(
            "t_user",
            [
                EncryptColumnRuleConfiguration::new("Pwd", "pwd_cipher", "aes")
                    .with_assisted_query("pwd_assisted", "md5")
                    .with_plain_column("pwd_plain"),
                EncryptColumnRuleConfiguration::new("credit_card", "card_cipher", "aes")
                    .with_query_with_cipher_column(false),
            ],
        ))
    }

    #[test]
    fn test_find_encrypt_column_ignores_case() {
        let table = user_table();

        assert_eq!(table.find_encrypt_column("PWD").map(EncryptColumn::cipher_column), Some("pwd_cipher"));
        assert_eq!(table.find_encrypt_column("pwd").map(EncryptColumn::cipher_column), Some("pwd_cipher"));
        assert!(table.find_encrypt_column("email").is_none());
    }

    #[test]
    fn test_encryptor_names() {
        let table = user_table();

        assert_eq!(table.find_encryptor_name("pwd"), Some("aes"));
        assert_eq!(table.find_assisted_query_encryptor_name("pwd"), Some("md5"));
        assert_eq!(table.find_assisted_query_encryptor_name("credit_card"), None);
        assert_eq!(table.find_encryptor_name("email"), None);
    }

    #[test]
    fn test_column_collections_keep_config_order() {
        let table = user_table();

        assert_eq!(table.logic_columns(), vec!["Pwd", "credit_card"]);
        assert_eq!(table.cipher_columns(), vec!["pwd_cipher", "card_cipher"]);
        assert_eq!(table.assisted_query_columns(), vec!["pwd_assisted"]);
        assert_eq!(table.plain_columns(), vec!["pwd_plain"]);
        assert_eq!(table.logic_and_cipher_columns()["Pwd"], "pwd_cipher");
    }

    #[test]
    fn test_reverse_lookups() {
        let table = user_table();

        assert!(table.is_cipher_column("PWD_CIPHER"));
        assert!(!table.is_cipher_column("pwd_plain"));
        assert_eq!(table.find_logic_column_by_cipher_column("card_cipher"), Some("credit_card"));
        assert_eq!(table.find_logic_column_by_assisted_query_column("pwd_assisted"), Some("Pwd"));
        assert_eq!(table.find_logic_column_by_assisted_query_column("card_cipher"), None);
    }

    #[test]
    fn test_logical_and_physical_names_fold_case_alike() {
        let table = EncryptTable::new(&EncryptTableRuleConfiguration::new(
            "t_kunde",
            [EncryptColumnRuleConfiguration::new("Straße", "Straße_cipher", "aes")
                .with_assisted_query("Ünvan_assisted", "md5")],
        ));

        assert!(table.find_encrypt_column("STRAßE").is_some());
        assert!(table.is_cipher_column("STRAßE_CIPHER"));
        assert_eq!(table.find_logic_column_by_cipher_column("straße_cipher"), Some("Straße"));
        assert_eq!(table.find_logic_column_by_assisted_query_column("ünvan_ASSISTED"), Some("Straße"));
    }

    #[test]
    fn test_query_with_cipher_column_precedence() {
        let mut config = EncryptTableRuleConfiguration::new(
            "t_user",
            [
                EncryptColumnRuleConfiguration::new("pwd", "pwd_cipher", "aes"),
                EncryptColumnRuleConfiguration::new("card", "card_cipher", "aes")
                    .with_query_with_cipher_column(true),
            ],
        );
        assert_eq!(EncryptTable::new(&config).query_with_cipher_column("pwd"), None);

        config.query_with_cipher_column = Some(false);
        let table = EncryptTable::new(&config);

        assert_eq!(table.query_with_cipher_column("pwd"), Some(false));
        assert_eq!(table.query_with_cipher_column("card"), Some(true));
    }

    #[test]
    fn test_duplicate_column_last_wins() {
        let table = EncryptTable::new(&EncryptTableRuleConfiguration::new(
            "t",
            [
                EncryptColumnRuleConfiguration::new("c", "c_cipher_1", "aes"),
                EncryptColumnRuleConfiguration::new("C", "c_cipher_2", "aes"),
            ],
        ));

        assert_eq!(table.logic_columns(), vec!["C"]);
        assert_eq!(table.find_cipher_column("c"), Some("c_cipher_2"));
    }
}
