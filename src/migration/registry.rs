//! Migration definitions and the single-parent migration chain

use crate::error::RegistryError;
use crate::snapshot::{ExportSnapshot, SchemaVersion, compare_versions};
use std::cmp::Ordering;
use std::fmt;

/// Transform applied by a migration step
///
/// Takes ownership of the accumulated snapshot and returns the next one. The
/// returned snapshot must carry the migration's `to_version`.
pub type TransformFn =
    Box<dyn Fn(ExportSnapshot) -> anyhow::Result<ExportSnapshot> + Send + Sync>;

/// A single forward step between two schema versions
pub struct Migration {
    pub from_version: String,
    pub to_version: String,
    pub description: String,
    transform: TransformFn,
}

impl Migration {
    pub fn new<F>(from_version: &str, to_version: &str, description: &str, transform: F) -> Self
    where
        F: Fn(ExportSnapshot) -> anyhow::Result<ExportSnapshot> + Send + Sync + 'static,
    {
        Self {
            from_version: from_version.to_string(),
            to_version: to_version.to_string(),
            description: description.to_string(),
            transform: Box::new(transform),
        }
    }

    /// Run the transform on a snapshot
    pub fn apply(&self, snapshot: ExportSnapshot) -> anyhow::Result<ExportSnapshot> {
        (self.transform)(snapshot)
    }

    /// Human-readable label used in import reports
    pub fn label(&self) -> String {
        format!(
            "{} -> {}: {}",
            self.from_version, self.to_version, self.description
        )
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("from_version", &self.from_version)
            .field("to_version", &self.to_version)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Immutable, ordered set of migrations
///
/// At most one migration may start from a given version, so every version has
/// a single successor and path finding is a simple walk.
#[derive(Debug, Default)]
pub struct MigrationRegistry {
    migrations: Vec<Migration>,
}

impl MigrationRegistry {
    /// Build a registry, rejecting malformed or ambiguous chains
    ///
    /// # Errors
    /// * `InvalidVersion` if a version is not dotted-numeric
    /// * `NotForward` if a migration does not move to a strictly newer version
    /// * `DuplicateFromVersion` if two migrations share a `from_version`
    pub fn new(migrations: Vec<Migration>) -> Result<Self, RegistryError> {
        let mut seen: Vec<SchemaVersion> = Vec::with_capacity(migrations.len());

        for migration in &migrations {
            let from: SchemaVersion = migration
                .from_version
                .parse()
                .map_err(RegistryError::InvalidVersion)?;
            let to: SchemaVersion = migration
                .to_version
                .parse()
                .map_err(RegistryError::InvalidVersion)?;

            if to <= from {
                return Err(RegistryError::NotForward {
                    from: migration.from_version.clone(),
                    to: migration.to_version.clone(),
                });
            }
            if seen.contains(&from) {
                return Err(RegistryError::DuplicateFromVersion(
                    migration.from_version.clone(),
                ));
            }
            seen.push(from);
        }

        Ok(Self { migrations })
    }

    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    /// Find the migration starting at `version`
    pub fn find_from(&self, version: &str) -> Option<&Migration> {
        self.migrations
            .iter()
            .find(|m| compare_versions(&m.from_version, version) == Ordering::Equal)
    }

    /// Collect the chain of migrations leading from `from` towards `to`
    ///
    /// Walks successor links until `to` is reached or no successor exists. An
    /// empty result means either `from` is already at or past `to`, or no
    /// migration starts at `from`; callers tell these apart by comparing the
    /// versions. A non-empty result whose last `to_version` is still below
    /// `to` means a link is missing from the chain.
    pub fn find_migration_path(&self, from: &str, to: &str) -> Vec<&Migration> {
        let mut path = Vec::new();
        let mut current = from.to_string();

        // Every step moves strictly forward, so the chain can't be longer than the registry
        while compare_versions(&current, to) == Ordering::Less && path.len() < self.migrations.len()
        {
            match self.find_from(&current) {
                Some(migration) => {
                    current = migration.to_version.clone();
                    path.push(migration);
                }
                None => break,
            }
        }

        path
    }
}
