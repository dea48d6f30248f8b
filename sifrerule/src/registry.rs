//! Named collection of ready-to-use encryptor instances.

use crate::algorithm::{AlgorithmFactory, EncryptAlgorithm};
use crate::config::AlgorithmConfiguration;
use crate::error::Result;
use crate::schema::Schemas;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Encryptors by name.
///
/// Built once per configuration and shared behind `Arc` by every rule
/// generation that references it. Entries themselves are `Arc`s, so a new
/// registry may reuse instances from a previous one.
#[derive(Default, Clone)]
pub struct EncryptorRegistry {
    encryptors: HashMap<String, Arc<dyn EncryptAlgorithm>>,
}

impl EncryptorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every configured encryptor through the [`AlgorithmFactory`].
    ///
    /// # Errors
    ///
    /// Returns the first algorithm construction error; no registry is produced.
    pub fn from_configurations(configs: &HashMap<String, AlgorithmConfiguration>) -> Result<Self> {
        let mut encryptors = HashMap::with_capacity(configs.len());
        for (name, config) in configs {
            encryptors.insert(name.clone(), AlgorithmFactory::new_instance(config)?);
        }
        Ok(Self { encryptors })
    }

    /// Adds an encryptor, returning the registry for chaining.
    #[must_use]
    pub fn with_encryptor(
        mut self,
        name: impl Into<String>,
        encryptor: Arc<dyn EncryptAlgorithm>,
    ) -> Self {
        self.insert(name, encryptor);
        self
    }

    /// Adds or replaces an encryptor.
    pub fn insert(&mut self, name: impl Into<String>, encryptor: Arc<dyn EncryptAlgorithm>) {
        self.encryptors.insert(name.into(), encryptor);
    }

    /// Returns the encryptor registered under `name`. Names are case-sensitive.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn EncryptAlgorithm>> {
        self.encryptors.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.encryptors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.encryptors.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.encryptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.encryptors.is_empty()
    }

    /// Pushes the database name and schema snapshot into every encryptor that
    /// is schema-aware. Others are skipped.
    pub fn set_schema_meta_data(&self, database_name: &str, schemas: &Schemas) {
        for (name, encryptor) in &self.encryptors {
            if let Some(aware) = encryptor.as_schema_meta_data_aware() {
                trace!(encryptor = %name, database = database_name, "pushing schema metadata");
                aware.set_database_name(database_name);
                aware.set_schemas(Arc::clone(schemas));
            }
        }
    }
}

impl fmt::Debug for EncryptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> =
            self.encryptors.iter().map(|(n, e)| (n.as_str(), e.algorithm_type())).collect();
        entries.sort_unstable();
        f.debug_map().entries(entries).finish()
    }
}
