//! Publication of rule generations.
//!
//! Readers take an `Arc` snapshot of the current rule and keep using it for
//! as long as they like; reconfiguration builds a complete new rule first
//! and then swaps the pointer, so no reader ever observes a partial rule.

use crate::config::EncryptRuleConfiguration;
use crate::error::Result;
use crate::rule::EncryptRule;
use crate::schema::Schemas;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

struct Generation {
    rule: Arc<EncryptRule>,
    number: u64,
    schema: Option<(String, Schemas)>,
}

/// Owns the currently published [`EncryptRule`].
pub struct EncryptRuleContext {
    current: RwLock<Generation>,
}

impl EncryptRuleContext {
    /// Publishes `rule` as generation 1.
    #[must_use]
    pub fn new(rule: EncryptRule) -> Self {
        Self { current: RwLock::new(Generation { rule: Arc::new(rule), number: 1, schema: None }) }
    }

    /// Builds the first generation from a configuration.
    ///
    /// # Errors
    ///
    /// Returns the rule construction error.
    pub fn from_configuration(config: &EncryptRuleConfiguration) -> Result<Self> {
        Ok(Self::new(EncryptRule::new(config)?))
    }

    /// Returns a snapshot of the current rule.
    #[must_use]
    pub fn current(&self) -> Arc<EncryptRule> {
        Arc::clone(&self.current.read().rule)
    }

    /// Returns the current generation number, starting at 1.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.current.read().number
    }

    /// Builds a new rule from `config` and publishes it.
    ///
    /// # Errors
    ///
    /// Returns the construction error; the current generation stays active.
    pub fn reconfigure(&self, config: &EncryptRuleConfiguration) -> Result<u64> {
        match EncryptRule::new(config) {
            Ok(rule) => Ok(self.publish(rule)),
            Err(e) => {
                warn!(
                    error = %e,
                    generation = self.generation(),
                    "encrypt rule rejected, keeping current generation"
                );
                Err(e)
            }
        }
    }

    /// Publishes an already-built rule and returns its generation number.
    ///
    /// The most recent schema snapshot, if any, is pushed into the new
    /// rule's encryptors before readers can see it.
    pub fn publish(&self, rule: EncryptRule) -> u64 {
        let mut current = self.current.write();
        if let Some((database_name, schemas)) = &current.schema {
            rule.set_schema_meta_data(database_name, schemas);
        }
        current.rule = Arc::new(rule);
        current.number += 1;
        info!(
            generation = current.number,
            tables = current.rule.tables().count(),
            "encrypt rule published"
        );
        current.number
    }

    /// Pushes schema metadata into the current rule's encryptors and keeps it
    /// for future generations. Serialized with [`publish`](Self::publish).
    pub fn set_schema_meta_data(&self, database_name: &str, schemas: Schemas) {
        let mut current = self.current.write();
        current.rule.set_schema_meta_data(database_name, &schemas);
        current.schema = Some((database_name.to_string(), schemas));
    }
}
