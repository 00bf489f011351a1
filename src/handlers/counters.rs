//! Counter handlers for the hangar MCP server

use crate::HangarServerHandler;
use crate::formatting;
use crate::schedule::{
    AlertStatus, CounterType, CurrentState, classify_checkpoint, classify_with,
    counter_checkpoints, local_date_today,
};
use crate::snapshot::TableName;
use crate::store::TableStore;
use crate::validation;
use chrono::{SecondsFormat, Utc};
use mcp_attr::{Result as McpResult, bail_public};
use serde_json::{Map, Value, json};

const DEFAULT_CHECKPOINT_COUNT: u32 = 5;

impl HangarServerHandler {
    /// Records a new counter reading for an aircraft and appends it to the counter history.
    pub async fn handle_update_counters(
        &self,
        aircraft_id: String,
        readings: [(CounterType, Option<f64>); 5],
    ) -> McpResult<String> {
        let aircraft_id = aircraft_id.trim().to_string();
        if aircraft_id.is_empty() {
            bail_public!(_, "aircraft_id must not be empty");
        }

        let mut patch = Vec::new();
        for (counter, value) in readings {
            validation::check_non_negative(counter.as_str(), value)?;
            if let Some(v) = value {
                patch.push((counter, v));
            }
        }
        if patch.is_empty() {
            bail_public!(_, "Provide at least one counter value to update");
        }

        let mut data = self.data.lock().unwrap();
        if let Err(e) = data.record_counters(&aircraft_id, &patch) {
            drop(data);
            bail_public!(_, "{}", e);
        }

        let mut history: Map<String, Value> = patch
            .iter()
            .map(|(counter, v)| (counter.as_str().to_string(), json!(v)))
            .collect();
        history.insert("aircraft_id".to_string(), json!(aircraft_id));
        history.insert(
            "recorded_at".to_string(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        if let Err(e) = data.insert(TableName::aircraft_counter_history, Value::Object(history)) {
            drop(data);
            bail_public!(_, "{}", e);
        }

        let state = CurrentState::new(local_date_today(), data.counters_for(&aircraft_id));
        let thresholds = self.config.thresholds();
        let attention = data
            .notifications()
            .iter()
            .filter(|n| n.is_counter_based() && !n.is_completed)
            .filter(|n| n.applies_to(Some(aircraft_id.as_str())))
            .filter(|n| classify_with(n, &state, &thresholds) != AlertStatus::Normal)
            .count();
        drop(data);

        if let Err(e) =
            self.save_data_with_message(&format!("Update counters for {}", aircraft_id))
        {
            bail_public!(_, "Failed to save: {}", e);
        }

        Ok(format!(
            "Counters updated for {}. {} counter notification(s) need attention",
            aircraft_id, attention
        ))
    }

    /// Lists upcoming counter checkpoints of a counter-based notification with their status.
    pub async fn handle_counter_checkpoints(
        &self,
        id: String,
        count: Option<u32>,
    ) -> McpResult<String> {
        let data = self.data.lock().unwrap();
        let Some(notification) = data.find_notification(id.trim()) else {
            drop(data);
            bail_public!(_, "Notification '{}' not found", id);
        };
        if !notification.is_counter_based() {
            drop(data);
            bail_public!(
                _,
                "Notification '{}' is date-based, not counter-based",
                id
            );
        }
        let counters = notification
            .aircraft_id
            .as_deref()
            .and_then(|aircraft| data.counters_for(aircraft));
        drop(data);

        let count = count.unwrap_or(DEFAULT_CHECKPOINT_COUNT).max(1);
        let thresholds = self.config.thresholds();
        let checkpoints: Vec<(f64, AlertStatus)> = counter_checkpoints(&notification, count)
            .into_iter()
            .map(|target| {
                let status =
                    classify_checkpoint(&notification, target, counters.as_ref(), &thresholds);
                (target, status)
            })
            .collect();

        let current = counters
            .as_ref()
            .zip(notification.counter_type)
            .and_then(|(c, counter)| c.value(counter));
        Ok(formatting::format_checkpoints(
            &notification,
            &checkpoints,
            current,
        ))
    }
}
