//! Import and export handlers for the hangar MCP server

use crate::HangarServerHandler;
use crate::formatting;
use crate::store::HangarData;
use chrono::Utc;
use mcp_attr::{Result as McpResult, bail_public};
use serde_json::Value;

impl HangarServerHandler {
    /// Migrates an export document to the current version and replaces all data with it.
    pub async fn handle_import_data(&self, payload: String) -> McpResult<String> {
        let raw: Value = match serde_json::from_str(&payload) {
            Ok(v) => v,
            Err(e) => bail_public!(_, "Import failed: payload is not valid JSON ({})", e),
        };

        let result = self.migrator.migrate_to_current_version(&raw);
        if !result.success {
            bail_public!(_, "{}", formatting::format_import_failure(&result));
        }
        let Some(mut snapshot) = result.data.clone() else {
            bail_public!(_, "Import failed: migration produced no data");
        };

        let import_version = raw
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        snapshot.version = self.migrator.current_version().to_string();
        let record_count = snapshot.record_count();

        let mut data = self.data.lock().unwrap();
        *data = HangarData::from_snapshot(snapshot);
        drop(data);

        tracing::info!(
            from = %import_version,
            records = record_count,
            steps = result.migrations_applied.len(),
            "imported data"
        );

        if let Err(e) =
            self.save_data_with_message(&format!("Import data from version {}", import_version))
        {
            bail_public!(_, "Failed to save: {}", e);
        }

        Ok(formatting::format_import_success(&result, record_count))
    }

    /// Serializes all data as a current-version export document.
    pub async fn handle_export_data(&self) -> McpResult<String> {
        let data = self.data.lock().unwrap();
        let exported = data.export(Utc::now());
        drop(data);

        match serde_json::to_string_pretty(&exported) {
            Ok(json) => Ok(json),
            Err(e) => bail_public!(_, "Failed to serialize export: {}", e),
        }
    }
}
