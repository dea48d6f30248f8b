//! Database schema metadata pushed into schema-aware encryptors.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Schema snapshot keyed by schema name.
pub type Schemas = Arc<HashMap<String, SchemaMetaData>>;

/// Metadata of one column as reported by the storage node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetaData {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub primary_key: bool,
}

/// Metadata of one physical table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetaData {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnMetaData>,
}

impl TableMetaData {
    /// Finds a column by name, ignoring case.
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&ColumnMetaData> {
        let lower = name.to_lowercase();
        self.columns.iter().find(|c| c.name.to_lowercase() == lower)
    }
}

/// Metadata of one schema: its tables keyed by lower-cased name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetaData {
    #[serde(default, deserialize_with = "deserialize_tables")]
    tables: HashMap<String, TableMetaData>,
}

fn deserialize_tables<'de, D>(deserializer: D) -> Result<HashMap<String, TableMetaData>, D::Error>
where
    D: Deserializer<'de>,
{
    let tables = HashMap::<String, TableMetaData>::deserialize(deserializer)?;
    Ok(tables.into_iter().map(|(name, table)| (name.to_lowercase(), table)).collect())
}

impl SchemaMetaData {
    /// Builds a schema from its tables.
    #[must_use]
    pub fn new(tables: impl IntoIterator<Item = TableMetaData>) -> Self {
        Self { tables: tables.into_iter().map(|t| (t.name.to_lowercase(), t)).collect() }
    }

    /// Finds a table by name, ignoring case.
    #[must_use]
    pub fn find_table(&self, name: &str) -> Option<&TableMetaData> {
        self.tables.get(&name.to_lowercase())
    }

    /// Returns the number of tables in the schema.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the schema has no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Optional capability of encryptors that need a live view of schema metadata.
///
/// Encryptors are shared behind `Arc` across rule generations, so
/// implementations hold the pushed state behind interior mutability.
pub trait SchemaMetaDataAware: Send + Sync {
    /// Sets the database whose schemas are being pushed.
    fn set_database_name(&self, database_name: &str);

    /// Replaces the schema snapshot.
    fn set_schemas(&self, schemas: Schemas);
}
