//! # `sifrerule`
//!
//! Column-level encryption rule engine for SQL proxies.
//!
//! A logical column is stored as up to three physical columns:
//!
//! - a **cipher column**, always written, holding the encrypted value
//! - an optional **assisted-query column**, holding a deterministic
//!   projection usable for equality predicates
//! - an optional **plain column**, a cleartext dual-write used during migration
//!
//! The [`EncryptRule`](rule::EncryptRule) validates a declarative
//! configuration once, resolves which encryptor applies to which physical
//! representation, and transforms batches of values null-safely and in order.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sifrerule::prelude::*;
//!
//! let config = EncryptRuleConfiguration::from_path("encrypt-rule.toml")?;
//! let rule = EncryptRule::new(&config)?;
//!
//! let values = [Some(Value::Int(123)), None, Some(Value::Int(456))];
//! let cipher = rule.get_encrypt_values("sharding_db", "public", "t_order", "order_id", &values)?;
//! let column = rule.get_cipher_column("t_order", "order_id")?;
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithm;
pub mod config;
pub mod context;
pub mod error;
pub mod holder;
pub mod registry;
pub mod rule;
pub mod schema;
pub mod value;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::algorithm::{AlgorithmFactory, EncryptAlgorithm};
    pub use crate::config::{
        AlgorithmConfiguration, EncryptColumnRuleConfiguration, EncryptRuleConfiguration,
        EncryptTableRuleConfiguration,
    };
    pub use crate::context::EncryptContext;
    pub use crate::error::{Error, Result};
    pub use crate::holder::EncryptRuleContext;
    pub use crate::registry::EncryptorRegistry;
    pub use crate::rule::{EncryptColumn, EncryptRule, EncryptTable};
    pub use crate::schema::{SchemaMetaData, SchemaMetaDataAware, Schemas};
    pub use crate::value::Value;
}
