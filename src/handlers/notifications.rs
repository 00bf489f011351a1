//! Notification handlers for the hangar MCP server

use crate::HangarServerHandler;
use crate::schedule::{Basis, Notification, Recurrence};
use crate::snapshot::TableName;
use crate::store::{TableStore, record_id};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use serde_json::Value;

impl HangarServerHandler {
    /// Validates and stores a new notification.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_add_notification(
        &self,
        id: Option<String>,
        description: String,
        basis: String,
        initial_date: Option<String>,
        recurrence: Option<String>,
        counter_type: Option<String>,
        initial_counter_value: Option<f64>,
        counter_interval: Option<f64>,
        alert_days: Option<i64>,
        alert_hours: Option<f64>,
        aircraft_id: Option<String>,
    ) -> McpResult<String> {
        if description.trim().is_empty() {
            bail_public!(_, "Description must not be empty");
        }
        let basis = validation::parse_basis(&basis)?;
        let initial_date = validation::parse_optional_date(initial_date.as_deref())?;
        let recurrence = validation::parse_recurrence(recurrence.as_deref())?;
        let counter_type = match counter_type.as_deref() {
            Some(c) if !c.trim().is_empty() => Some(validation::parse_counter_type(c)?),
            _ => None,
        };
        validation::check_non_negative("initial_counter_value", initial_counter_value)?;
        validation::check_non_negative("counter_interval", counter_interval)?;
        validation::check_non_negative("alert_hours", alert_hours)?;
        validation::check_alert_days(alert_days)?;

        match basis {
            Basis::Date => {
                if initial_date.is_none() {
                    bail_public!(
                        _,
                        "Date-based notifications require initial_date (YYYY-MM-DD)"
                    );
                }
            }
            Basis::Counter => {
                if counter_type.is_none() || initial_counter_value.is_none() {
                    bail_public!(
                        _,
                        "Counter-based notifications require counter_type and initial_counter_value"
                    );
                }
            }
        }

        let notification = Notification {
            id: id.map(|i| i.trim().to_string()).unwrap_or_default(),
            description: description.trim().to_string(),
            basis,
            initial_date,
            recurrence: if basis == Basis::Date {
                recurrence
            } else {
                Recurrence::None
            },
            counter_type,
            initial_counter_value,
            counter_interval,
            alert_days,
            alert_hours,
            is_completed: false,
            aircraft_id: aircraft_id.filter(|a| !a.trim().is_empty()),
        };

        let mut record = match serde_json::to_value(&notification) {
            Ok(v) => v,
            Err(e) => bail_public!(_, "Failed to encode notification: {}", e),
        };
        if notification.id.is_empty()
            && let Value::Object(fields) = &mut record
        {
            fields.remove("id");
        }

        let mut data = self.data.lock().unwrap();
        let stored = match data.insert(TableName::notifications, record) {
            Ok(stored) => stored,
            Err(e) => {
                drop(data);
                bail_public!(_, "{}", e);
            }
        };
        drop(data);

        let new_id = record_id(&stored).unwrap_or_default();
        if let Err(e) = self.save_data_with_message(&format!("Add notification {}", new_id)) {
            bail_public!(_, "Failed to save: {}", e);
        }

        Ok(format!(
            "Notification created with ID: {} (basis: {:?})",
            new_id, basis
        ))
    }

    /// Completing a notification removes it.
    pub async fn handle_complete_notification(&self, id: String) -> McpResult<String> {
        let id = id.trim().to_string();
        let mut data = self.data.lock().unwrap();

        let stored_id = data
            .query(TableName::notifications, &[])
            .into_iter()
            .find(|row| record_id(row).as_deref() == Some(id.as_str()))
            .and_then(|row| row.get("id").cloned());
        let Some(stored_id) = stored_id else {
            drop(data);
            bail_public!(_, "Notification '{}' not found", id);
        };

        data.delete(TableName::notifications, &[("id", stored_id)]);
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Complete notification {}", id)) {
            bail_public!(_, "Failed to save: {}", e);
        }

        Ok(format!("Notification {} completed and removed", id))
    }
}
