//! The application's registered migration chain
//!
//! ## Versions
//!
//! - **1.0**: Original export format, records are not tied to an aircraft
//! - **1.1**: Every record carries an `aircraft_id` (`null` for fleet-wide records)
//! - **1.2**: `equipment` table added

use super::migrate::Migrator;
use super::registry::{Migration, MigrationRegistry};
use crate::error::RegistryError;
use crate::snapshot::{ExportSnapshot, TableName};
use serde_json::Value;

/// Schema version written by this build
pub const CURRENT_SCHEMA_VERSION: &str = "1.2";

/// All migrations shipped with the application, oldest first
pub fn builtin_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            "1.0",
            "1.1",
            "Add aircraft_id to all records",
            migrate_v1_0_to_v1_1,
        ),
        Migration::new("1.1", "1.2", "Add equipment table", migrate_v1_1_to_v1_2),
    ]
}

/// Build the migrator used by the server
pub fn default_migrator() -> Result<Migrator, RegistryError> {
    let registry = MigrationRegistry::new(builtin_migrations())?;
    let current = CURRENT_SCHEMA_VERSION
        .parse()
        .map_err(RegistryError::InvalidVersion)?;
    Ok(Migrator::new(registry, current))
}

/// Default `aircraft_id` to `null` on every record that lacks one
pub fn migrate_v1_0_to_v1_1(mut snapshot: ExportSnapshot) -> anyhow::Result<ExportSnapshot> {
    for name in TableName::ALL {
        for record in snapshot.table_mut(name).iter_mut() {
            if let Value::Object(fields) = record {
                fields
                    .entry("aircraft_id".to_string())
                    .or_insert(Value::Null);
            }
        }
    }
    snapshot.version = "1.1".to_string();
    Ok(snapshot)
}

/// Make sure the `equipment` table exists
pub fn migrate_v1_1_to_v1_2(mut snapshot: ExportSnapshot) -> anyhow::Result<ExportSnapshot> {
    snapshot.table_mut(TableName::equipment);
    snapshot.version = "1.2".to_string();
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_registry_is_valid() {
        let migrator = default_migrator().unwrap();
        assert_eq!(migrator.current_version().as_str(), CURRENT_SCHEMA_VERSION);
        assert_eq!(migrator.registry().migrations().len(), 2);
    }

    #[test]
    fn test_v1_0_to_v1_1_keeps_existing_aircraft_id() {
        let raw = json!({
            "version": "1.0",
            "tables": {
                "notifications": [{ "id": "n1" }, { "id": "n2", "aircraft_id": "ac-7" }],
                "directives": [42]
            }
        });
        let snapshot = ExportSnapshot::from_value(&raw).unwrap();
        let migrated = migrate_v1_0_to_v1_1(snapshot).unwrap();

        assert_eq!(migrated.version, "1.1");
        let notifications = migrated.table(TableName::notifications);
        assert_eq!(notifications[0]["aircraft_id"], Value::Null);
        assert_eq!(notifications[1]["aircraft_id"], json!("ac-7"));
        // non-object records pass through
        assert_eq!(migrated.table(TableName::directives), &[json!(42)]);
    }

    #[test]
    fn test_v1_1_to_v1_2_keeps_existing_equipment() {
        let raw = json!({
            "version": "1.1",
            "tables": { "equipment": [{ "id": "gps" }] }
        });
        let snapshot = ExportSnapshot::from_value(&raw).unwrap();
        let migrated = migrate_v1_1_to_v1_2(snapshot).unwrap();
        assert_eq!(migrated.version, "1.2");
        assert_eq!(migrated.table(TableName::equipment).len(), 1);
    }
}
