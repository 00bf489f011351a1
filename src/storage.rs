use crate::git_ops::GitOps;
use crate::migration::Migrator;
use crate::store::HangarData;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON file persistence for [`HangarData`]
///
/// The file uses the export format, so a data file written by an older build
/// is migrated forward on load exactly like an import.
pub struct Storage {
    file_path: PathBuf,
    git_ops: Option<GitOps>,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>, sync_git: bool) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let git_ops = sync_git.then(|| GitOps::new(&file_path));
        Self { file_path, git_ops }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the data file, pulling first when git sync is enabled
    ///
    /// A missing or empty file yields an empty store.
    pub fn load(&self, migrator: &Migrator) -> Result<HangarData> {
        if let Some(git) = &self.git_ops
            && let Err(e) = git.pull()
        {
            tracing::warn!(error = %e, "git pull failed; using local data file");
        }

        if !self.file_path.exists() {
            tracing::info!(path = %self.file_path.display(), "data file not found; starting empty");
            return Ok(HangarData::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        if content.trim().is_empty() {
            return Ok(HangarData::new());
        }

        let raw: Value = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", self.file_path.display()))?;
        let result = migrator.migrate_to_current_version(&raw);
        let Some(mut snapshot) = result.data else {
            return Err(anyhow::anyhow!(
                "Failed to load {}: {}",
                self.file_path.display(),
                result.error.unwrap_or_else(|| "unknown error".to_string())
            ));
        };
        for step in &result.migrations_applied {
            tracing::info!(step = %step, "migrated data file on load");
        }

        snapshot.version = migrator.current_version().to_string();
        Ok(HangarData::from_snapshot(snapshot))
    }

    pub fn save(&self, data: &HangarData) -> Result<()> {
        self.save_with_message(data, "Update hangar data")
    }

    /// Write the data file and commit it when git sync is enabled
    ///
    /// Commit failures are logged; the file on disk is already up to date.
    pub fn save_with_message(&self, data: &HangarData, message: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(data.snapshot())?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        tracing::debug!(path = %self.file_path.display(), "saved data file");

        if let Some(git) = &self.git_ops
            && let Err(e) = git.commit(&self.file_path, message)
        {
            tracing::warn!(error = %e, "git commit failed");
        }
        Ok(())
    }

    /// Push pending commits when git sync is enabled
    pub fn shutdown(&self) -> Result<()> {
        match &self.git_ops {
            Some(git) => git.push(),
            None => Ok(()),
        }
    }
}
