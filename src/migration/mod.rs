//! Migration module for export data schema versions
//!
//! This module moves import payloads between versions of the export format.
//! Each version step is a separate [`Migration`] so that an old export is
//! upgraded one step at a time until it reaches the current version.
//!
//! ## Migration Strategy
//!
//! When a new format version is introduced:
//! 1. Add a transform function (e.g., `migrate_v1_2_to_v1_3`) in `builtin`
//! 2. Register it in `builtin_migrations` and bump `CURRENT_SCHEMA_VERSION`
//! 3. Add tests for the new migration path
//!
//! Only one migration may start at any given version; the registry refuses
//! to build otherwise.

mod builtin;
mod migrate;
mod registry;

// Re-export public types and functions
pub use builtin::{
    CURRENT_SCHEMA_VERSION, builtin_migrations, default_migrator, migrate_v1_0_to_v1_1,
    migrate_v1_1_to_v1_2,
};
pub use migrate::{MigrationResult, Migrator};
pub use registry::{Migration, MigrationRegistry, TransformFn};
