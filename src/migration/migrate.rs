//! Migration executor
//!
//! Moves an import payload forward to the application's schema version by
//! applying the registered chain in order.

use super::registry::MigrationRegistry;
use crate::error::ImportError;
use crate::snapshot::{ExportSnapshot, SchemaVersion, compare_versions, normalize_data};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Outcome of an import migration
///
/// `migrations_applied` lists completed steps even when `success` is false,
/// so partial progress can be shown to the user. On failure `data` is `None`;
/// a partially migrated snapshot is never handed out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExportSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub migrations_applied: Vec<String>,
}

impl MigrationResult {
    fn succeeded(data: ExportSnapshot, migrations_applied: Vec<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            migrations_applied,
        }
    }

    fn failed(error: &ImportError, migrations_applied: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            migrations_applied,
        }
    }
}

/// Applies a [`MigrationRegistry`] to bring snapshots up to `current_version`
#[derive(Debug)]
pub struct Migrator {
    registry: MigrationRegistry,
    current_version: SchemaVersion,
}

impl Migrator {
    pub fn new(registry: MigrationRegistry, current_version: SchemaVersion) -> Self {
        Self {
            registry,
            current_version,
        }
    }

    pub fn current_version(&self) -> &SchemaVersion {
        &self.current_version
    }

    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    /// Validate, normalize and migrate a raw import payload
    ///
    /// Never panics or returns early with an error; every failure is folded
    /// into the returned [`MigrationResult`]. The raw payload is not modified.
    pub fn migrate_to_current_version(&self, raw: &Value) -> MigrationResult {
        let mut applied = Vec::new();
        match self.run(raw, &mut applied) {
            Ok(snapshot) => MigrationResult::succeeded(snapshot, applied),
            Err(e) => {
                tracing::warn!(error = %e, steps = applied.len(), "import rejected");
                MigrationResult::failed(&e, applied)
            }
        }
    }

    fn run(&self, raw: &Value, applied: &mut Vec<String>) -> Result<ExportSnapshot, ImportError> {
        let snapshot = ExportSnapshot::from_value(raw)?;
        let import_version = snapshot.version.clone();
        let current = self.current_version.as_str();

        match compare_versions(&import_version, current) {
            Ordering::Greater => {
                return Err(ImportError::FutureVersion {
                    import: import_version,
                    current: current.to_string(),
                });
            }
            Ordering::Equal => {
                tracing::debug!(version = %import_version, "import already at current version");
                return Ok(normalize_data(&snapshot));
            }
            Ordering::Less => {}
        }

        let path = self.registry.find_migration_path(&import_version, current);
        if path.is_empty() {
            // Exports older than the first registered migration are accepted as-is
            tracing::warn!(
                version = %import_version,
                current = %current,
                "no migration path registered; importing without migrations"
            );
            applied.push(format!(
                "Legacy import from version {}: no migrations needed",
                import_version
            ));
            return Ok(normalize_data(&snapshot));
        }

        let mut data = normalize_data(&snapshot);
        for migration in path {
            tracing::info!(
                from = %migration.from_version,
                to = %migration.to_version,
                "applying migration"
            );
            let step_error = |message: String| ImportError::MigrationStep {
                from: migration.from_version.clone(),
                to: migration.to_version.clone(),
                message,
            };

            data = migration
                .apply(data)
                .map_err(|e| step_error(format!("{:#}", e)))?;

            if compare_versions(&data.version, &migration.to_version) != Ordering::Equal {
                return Err(step_error(format!(
                    "transform left version at {} instead of {}",
                    data.version, migration.to_version
                )));
            }
            applied.push(migration.label());
        }

        if compare_versions(&data.version, current) == Ordering::Less {
            return Err(ImportError::IncompletePath {
                import: import_version,
                current: current.to_string(),
                reached: data.version,
            });
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::Migration;
    use serde_json::json;

    fn stamp(version: &'static str) -> impl Fn(ExportSnapshot) -> anyhow::Result<ExportSnapshot> {
        move |mut s| {
            s.version = version.to_string();
            Ok(s)
        }
    }

    fn migrator(migrations: Vec<Migration>, current: &str) -> Migrator {
        Migrator::new(
            MigrationRegistry::new(migrations).unwrap(),
            current.parse().unwrap(),
        )
    }

    #[test]
    fn test_structural_error_runs_nothing() {
        let m = migrator(vec![Migration::new("1.0", "1.1", "x", stamp("1.1"))], "1.1");
        let result = m.migrate_to_current_version(&json!({ "version": "1.0" }));
        assert!(!result.success);
        assert!(result.data.is_none());
        assert!(result.migrations_applied.is_empty());
        assert!(result.error.unwrap().contains("tables"));
    }

    #[test]
    fn test_failing_step_reports_partial_progress() {
        let m = migrator(
            vec![
                Migration::new("1.0", "1.1", "ok", stamp("1.1")),
                Migration::new("1.1", "1.2", "boom", |_| anyhow::bail!("disk on fire")),
            ],
            "1.2",
        );
        let raw = json!({ "version": "1.0", "tables": {} });
        let result = m.migrate_to_current_version(&raw);

        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.migrations_applied, vec!["1.0 -> 1.1: ok".to_string()]);
        let error = result.error.unwrap();
        assert!(error.contains("1.1"));
        assert!(error.contains("1.2"));
        assert!(error.contains("disk on fire"));
        // caller's payload is untouched
        assert_eq!(raw, json!({ "version": "1.0", "tables": {} }));
    }

    #[test]
    fn test_transform_must_stamp_version() {
        let m = migrator(vec![Migration::new("1.0", "1.1", "lazy", Ok)], "1.1");
        let result = m.migrate_to_current_version(&json!({ "version": "1.0", "tables": {} }));
        assert!(!result.success);
        assert!(result.error.unwrap().contains("instead of 1.1"));
    }

    #[test]
    fn test_incomplete_chain_is_rejected() {
        let m = migrator(vec![Migration::new("1.0", "1.1", "x", stamp("1.1"))], "1.3");
        let result = m.migrate_to_current_version(&json!({ "version": "1.0", "tables": {} }));
        assert!(!result.success);
        assert_eq!(result.migrations_applied.len(), 1);
        assert!(result.error.unwrap().contains("chain stops at 1.1"));
    }

    #[test]
    fn test_current_version_is_numeric_match() {
        let m = migrator(vec![], "1.2");
        let result = m.migrate_to_current_version(&json!({ "version": "1.2.0", "tables": {} }));
        assert!(result.success);
        assert!(result.migrations_applied.is_empty());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let m = migrator(vec![], "1.2");
        let result = m.migrate_to_current_version(&json!({ "version": "2.0", "tables": {} }));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["migrationsApplied"], json!([]));
        assert!(value.get("data").is_none());
    }
}
