//! Export snapshot model
//!
//! This module contains the versioned export container and its helpers:
//! - `version`: dotted-numeric schema version comparison
//! - `export`: the snapshot itself, structural validation and normalization

mod export;
mod version;

// Re-export all public types
pub use export::{ExportSnapshot, TableName, normalize_data, validate_structure};
pub use version::{SchemaVersion, compare_versions};
