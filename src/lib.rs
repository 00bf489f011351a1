//! Hangar MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for aircraft
//! maintenance notifications. It keeps a versioned data set of aircraft,
//! notifications and counter readings, migrates imported exports forward to
//! the current schema, and projects recurring notifications onto dates and
//! counter checkpoints with an alert status.
//!
//! # Architecture
//!
//! - **MCP Layer**: `HangarServerHandler` - Handles MCP protocol communication
//! - **Migration Layer**: `snapshot` and `migration` modules - Export format,
//!   version comparison and the registry of schema migrations
//! - **Schedule Layer**: `schedule` module - Recurrence projection and alert status
//! - **Persistence Layer**: `store` and `storage` modules - In-memory tables,
//!   JSON file storage with optional Git sync
//!
//! # Example
//!
//! ```no_run
//! use hangar_mcp::{HangarConfig, HangarServerHandler};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = HangarServerHandler::new("hangar.json", HangarConfig::default())?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod formatting;
pub mod git_ops;
mod handlers;
pub mod migration;
pub mod schedule;
pub mod snapshot;
pub mod storage;
pub mod store;
mod validation;

use anyhow::Result;
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::sync::Mutex;

// Re-export commonly used types
pub use config::HangarConfig;
pub use git_ops::GitOps;
pub use error::{ConfigError, ImportError, RegistryError, StoreError};
pub use migration::{CURRENT_SCHEMA_VERSION, MigrationResult, Migrator, default_migrator};
pub use schedule::{AlertStatus, CounterType, Notification, Recurrence};
pub use snapshot::{ExportSnapshot, SchemaVersion, TableName, compare_versions};
pub use storage::Storage;
pub use store::{HangarData, TableStore};

/// MCP Server handler for aircraft maintenance notifications
///
/// All changes are persisted to a JSON file and optionally synchronized
/// with Git.
pub struct HangarServerHandler {
    pub(crate) data: Mutex<HangarData>,
    pub(crate) storage: Storage,
    pub(crate) migrator: Migrator,
    pub(crate) config: HangarConfig,
}

impl HangarServerHandler {
    /// Create a new server handler
    ///
    /// The data file is migrated to the current schema version on load.
    ///
    /// # Example
    /// ```no_run
    /// # use hangar_mcp::{HangarConfig, HangarServerHandler};
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = HangarServerHandler::new("hangar.json", HangarConfig::default())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(storage_path: &str, config: HangarConfig) -> Result<Self> {
        let migrator = default_migrator()?;
        let storage = Storage::new(storage_path, config.sync_git);
        let data = Mutex::new(storage.load(&migrator)?);
        tracing::info!(
            path = storage_path,
            version = migrator.current_version().as_str(),
            "hangar data loaded"
        );
        Ok(Self {
            data,
            storage,
            migrator,
            config,
        })
    }

    /// Save data with a custom commit message
    pub(crate) fn save_data_with_message(&self, message: &str) -> Result<()> {
        let data = self.data.lock().unwrap();
        self.storage.save_with_message(&data, message)?;
        Ok(())
    }
}

impl Drop for HangarServerHandler {
    fn drop(&mut self) {
        // Push to git on shutdown if sync is enabled
        if let Err(e) = self.storage.shutdown() {
            tracing::warn!(error = %e, "shutdown git sync failed");
        }
    }
}

/// Aircraft maintenance notification server.
///
/// Notifications are either date-based (anchored on an initial date and repeated
/// Weekly, Bi-Monthly (every two weeks), Monthly, Quarterly, Semi-Annual or Yearly)
/// or counter-based (due when an aircraft counter such as hobbs or tach reaches a
/// target, then every counter_interval hours).
///
/// Alert status:
/// - **due**: the due date or counter target has been reached
/// - **alert**: within alert_days days or alert_hours hours of coming due
/// - **normal**: anything further away
///
/// Data can be moved between installations with export_data / import_data. Imports
/// from older schema versions are migrated forward automatically.
#[mcp_server]
impl McpServer for HangarServerHandler {
    /// **Import**: Replace all hangar data with an exported JSON document.
    /// Older schema versions are migrated to the current version first; exports from a newer version are rejected.
    #[tool]
    async fn import_data(
        &self,
        /// JSON export document (object with "version" and "tables")
        payload: String,
    ) -> McpResult<String> {
        self.handle_import_data(payload).await
    }

    /// **Export**: Return all hangar data as a JSON document stamped with the current schema version.
    #[tool]
    async fn export_data(&self) -> McpResult<String> {
        self.handle_export_data().await
    }

    /// **Add notification**: Create a recurring maintenance or compliance reminder.
    /// Date basis needs initial_date; Counter basis needs counter_type and initial_counter_value.
    #[tool]
    async fn add_notification(
        &self,
        /// ID: any unique string (optional, generated when omitted)
        id: Option<String>,
        /// Description: what has to be done
        description: String,
        /// Basis: Date or Counter
        basis: String,
        /// Initial due date: YYYY-MM-DD (Date basis)
        initial_date: Option<String>,
        /// Recurrence: None/Weekly/Bi-Monthly/Monthly/Quarterly/Semi-Annual/Yearly (Date basis)
        recurrence: Option<String>,
        /// Counter: hobbs/tach/airframe_total_time/engine_total_time/prop_total_time (Counter basis)
        counter_type: Option<String>,
        /// Counter value at which the notification first comes due (Counter basis)
        initial_counter_value: Option<f64>,
        /// Hours between repeated checkpoints (Counter basis, optional)
        counter_interval: Option<f64>,
        /// Days before the due date to raise an alert (default 7)
        alert_days: Option<i64>,
        /// Hours before the counter target to raise an alert (default 10)
        alert_hours: Option<f64>,
        /// Aircraft the notification belongs to (omit for fleet-wide)
        aircraft_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_notification(
            id,
            description,
            basis,
            initial_date,
            recurrence,
            counter_type,
            initial_counter_value,
            counter_interval,
            alert_days,
            alert_hours,
            aircraft_id,
        )
        .await
    }

    /// **Complete**: Mark a notification as done. Completed notifications are removed.
    #[tool]
    async fn complete_notification(
        &self,
        /// Notification ID
        id: String,
    ) -> McpResult<String> {
        self.handle_complete_notification(id).await
    }

    /// **Counters**: Record current counter readings for an aircraft. Only the values given are changed.
    #[tool]
    async fn update_counters(
        &self,
        /// Aircraft ID
        aircraft_id: String,
        /// Hobbs hours
        hobbs: Option<f64>,
        /// Tach hours
        tach: Option<f64>,
        /// Airframe total time
        airframe_total_time: Option<f64>,
        /// Engine total time
        engine_total_time: Option<f64>,
        /// Propeller total time
        prop_total_time: Option<f64>,
    ) -> McpResult<String> {
        self.handle_update_counters(
            aircraft_id,
            [
                (CounterType::hobbs, hobbs),
                (CounterType::tach, tach),
                (CounterType::airframe_total_time, airframe_total_time),
                (CounterType::engine_total_time, engine_total_time),
                (CounterType::prop_total_time, prop_total_time),
            ],
        )
        .await
    }

    /// **Calendar**: List date-based notifications occurring on a given day.
    #[tool]
    async fn calendar(
        &self,
        /// Day to check: YYYY-MM-DD
        date: String,
        /// Only notifications of this aircraft plus fleet-wide ones (optional)
        aircraft_id: Option<String>,
        /// Evaluate alert status as of this date, YYYY-MM-DD (default today)
        as_of: Option<String>,
    ) -> McpResult<String> {
        self.handle_calendar(date, aircraft_id, as_of).await
    }

    /// **Alerts**: List notifications that are due or within their alert window, most urgent first.
    /// Fleet-wide counter notifications are measured against the given aircraft's counters; without aircraft_id they have no reading and show as normal.
    #[tool]
    async fn alerts(
        &self,
        /// Only notifications of this aircraft plus fleet-wide ones (optional)
        aircraft_id: Option<String>,
        /// Evaluate as of this date, YYYY-MM-DD (default today)
        as_of: Option<String>,
        /// Also list notifications with normal status (default false)
        include_normal: Option<bool>,
    ) -> McpResult<String> {
        self.handle_alerts(aircraft_id, as_of, include_normal).await
    }

    /// **Checkpoints**: Show upcoming counter checkpoints of a counter-based notification.
    #[tool]
    async fn counter_checkpoints(
        &self,
        /// Notification ID
        id: String,
        /// Number of checkpoints to list (default 5)
        count: Option<u32>,
    ) -> McpResult<String> {
        self.handle_counter_checkpoints(id, count).await
    }
}
