//! `sifrerule` CLI tool for validating encrypt rules and transforming values.

#![warn(clippy::pedantic, clippy::nursery)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sifrerule::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Literal used on the command line for SQL `NULL`.
const NULL_LITERAL: &str = "NULL";

#[derive(Parser)]
#[command(name = "sifrerule")]
#[command(about = "Column encryption rule CLI", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a rule configuration and print its column mappings
    Validate {
        /// Rule configuration file (.toml or .json)
        config: PathBuf,
    },
    /// Encrypt values for a logical column
    Encrypt {
        #[command(flatten)]
        target: Target,
        /// Use the assisted-query encryptor instead of the cipher encryptor
        #[arg(long)]
        assisted: bool,
    },
    /// Decrypt cipher column values for a logical column
    Decrypt {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(Args)]
struct Target {
    /// Rule configuration file (.toml or .json)
    config: PathBuf,
    /// Logical table name
    #[arg(long)]
    table: String,
    /// Logical column name
    #[arg(long)]
    column: String,
    /// Database name passed to the encryptor context
    #[arg(long, default_value = "sharding_db")]
    database: String,
    /// Schema name passed to the encryptor context
    #[arg(long, default_value = "public")]
    schema: String,
    /// Values to transform; `NULL` passes through
    values: Vec<String>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_rule(path: &Path) -> Result<EncryptRule> {
    let config = EncryptRuleConfiguration::from_path(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let rule = EncryptRule::new(&config).context("invalid encrypt rule")?;
    debug!(path = %path.display(), "encrypt rule loaded");
    Ok(rule)
}

fn parse_value(raw: &str) -> Option<Value> {
    if raw.eq_ignore_ascii_case(NULL_LITERAL) {
        return None;
    }
    Some(raw.parse::<i64>().map_or_else(|_| Value::from(raw), Value::Int))
}

fn print_values(values: &[Option<Value>]) {
    for each in values {
        match each {
            Some(value) => println!("{value}"),
            None => println!("{NULL_LITERAL}"),
        }
    }
}

fn validate(path: &Path) -> Result<()> {
    let rule = load_rule(path)?;
    let mut tables: Vec<_> = rule.tables().collect();
    tables.sort_unstable();

    println!("Encrypt rule is valid ({} tables)", tables.len());
    for name in tables {
        let Some(table) = rule.find_encrypt_table(name) else { continue };
        println!("{}", table.name());
        for column in table.columns() {
            println!(
                "  {} -> cipher={} encryptor={} assisted={} plain={} query_with_cipher={}",
                column.logic_column(),
                column.cipher_column(),
                column.encryptor_name(),
                column.assisted_query_column().unwrap_or("-"),
                column.plain_column().unwrap_or("-"),
                rule.is_query_with_cipher_column(name, column.logic_column()),
            );
        }
    }
    Ok(())
}

fn transform(target: &Target, mode: Mode) -> Result<()> {
    let rule = load_rule(&target.config)?;
    let values: Vec<Option<Value>> = target.values.iter().map(|v| parse_value(v)).collect();
    let (database, schema) = (target.database.as_str(), target.schema.as_str());
    let (table, column) = (target.table.as_str(), target.column.as_str());
    let result = match mode {
        Mode::Encrypt => rule.get_encrypt_values(database, schema, table, column, &values),
        Mode::AssistedQuery => {
            rule.get_encrypt_assisted_query_values(database, schema, table, column, &values)
        }
        Mode::Decrypt => rule.get_decrypt_values(database, schema, table, column, &values),
    }?;
    print_values(&result);
    Ok(())
}

#[derive(Clone, Copy)]
enum Mode {
    Encrypt,
    AssistedQuery,
    Decrypt,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Encrypt { target, assisted } => {
            transform(&target, if assisted { Mode::AssistedQuery } else { Mode::Encrypt })
        }
        Commands::Decrypt { target } => transform(&target, Mode::Decrypt),
    }
}
