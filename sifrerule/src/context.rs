//! Context passed to encryptor invocations.

use std::fmt;

/// Identifies where a value lives: database, schema, logical table and
/// logical column.
///
/// Algorithms use the context for domain separation (as associated data or
/// key-derivation input) and for key scoping, so the same plaintext written
/// to two different columns produces unrelated ciphertexts.
///
/// # Example
///
/// ```
/// use sifrerule::context::EncryptContext;
///
/// let ctx = EncryptContext::new("sharding_db", "public", "t_order", "order_id");
/// assert_eq!(ctx.to_string(), "sharding_db|public|t_order|order_id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncryptContext {
    database_name: String,
    schema_name: String,
    table_name: String,
    column_name: String,
}

impl EncryptContext {
    /// Creates a new encrypt context.
    ///
    /// # Arguments
    ///
    /// * `database_name` - Logical database the statement targets
    /// * `schema_name` - Schema within that database
    /// * `table_name` - Logical table name
    /// * `column_name` - Logical column name
    #[must_use]
    pub fn new(
        database_name: impl Into<String>,
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Self {
        Self {
            database_name: database_name.into(),
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
        }
    }

    /// Returns the database name.
    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Returns the schema name.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Returns the logical table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the logical column name.
    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }
}

impl fmt::Display for EncryptContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.database_name, self.schema_name, self.table_name, self.column_name
        )
    }
}
