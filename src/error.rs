//! Error types for the hangar data engines
//!
//! Import failures are reported through [`crate::migration::MigrationResult`],
//! which carries the `Display` text of an [`ImportError`]. The remaining types
//! are returned directly by the registry, the table store and the config loader.

use thiserror::Error;

/// Reasons an import payload can be rejected by the migration engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    /// The payload does not have the basic export shape
    #[error("Invalid import data: {0}")]
    Structural(String),

    /// The payload was written by a newer schema than this build understands
    #[error(
        "Import data version {import} is newer than the current application version {current}. Please update the application before importing this file."
    )]
    FutureVersion { import: String, current: String },

    /// A registered migration failed while transforming the snapshot
    #[error("Migration from {from} to {to} failed: {message}")]
    MigrationStep {
        from: String,
        to: String,
        message: String,
    },

    /// The registered chain stops before reaching the current version
    #[error(
        "No migration path from version {import} to {current} (chain stops at {reached})"
    )]
    IncompletePath {
        import: String,
        current: String,
        reached: String,
    },
}

/// Errors raised while building a migration registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Invalid migration version: {0}")]
    InvalidVersion(String),

    #[error("More than one migration is registered from version {0}")]
    DuplicateFromVersion(String),

    #[error("Migration {from} -> {to} does not move the schema forward")]
    NotForward { from: String, to: String },
}

/// Errors raised by the in-memory table store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Record '{id}' not found in table '{table}'")]
    NotFound { table: String, id: String },

    #[error("Record '{id}' already exists in table '{table}'")]
    DuplicateId { table: String, id: String },

    #[error("Records must be JSON objects, got {0}")]
    NotAnObject(String),
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
