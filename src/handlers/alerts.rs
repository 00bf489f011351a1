//! Alerts handler for the hangar MCP server

use crate::HangarServerHandler;
use crate::formatting::{self, AlertRow, DueDetail};
use crate::schedule::{
    AlertStatus, Basis, CurrentState, Notification, classify_with, days_remaining,
    local_date_today,
};
use crate::validation;
use mcp_attr::Result as McpResult;

impl HangarServerHandler {
    /// Classifies every open notification and lists the ones needing attention, most urgent first.
    pub async fn handle_alerts(
        &self,
        aircraft_id: Option<String>,
        as_of: Option<String>,
        include_normal: Option<bool>,
    ) -> McpResult<String> {
        let today =
            validation::parse_optional_date(as_of.as_deref())?.unwrap_or_else(local_date_today);
        let aircraft_id = aircraft_id.filter(|a| !a.trim().is_empty());
        let include_normal = include_normal.unwrap_or(false);
        let thresholds = self.config.thresholds();

        let data = self.data.lock().unwrap();
        let notifications = data.notifications();
        let evaluated: Vec<(usize, CurrentState)> = notifications
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_completed)
            .filter(|(_, n)| n.applies_to(aircraft_id.as_deref()))
            .map(|(i, n)| {
                // Fleet-wide counter notifications have no reading outside an aircraft view
                let counters = n
                    .aircraft_id
                    .as_deref()
                    .or(aircraft_id.as_deref())
                    .and_then(|aircraft| data.counters_for(aircraft));
                (i, CurrentState::new(today, counters))
            })
            .collect();
        drop(data);

        let mut rows: Vec<AlertRow<'_>> = evaluated
            .iter()
            .map(|(i, state)| {
                let n = &notifications[*i];
                AlertRow {
                    notification: n,
                    status: classify_with(n, state, &thresholds),
                    due: due_detail(n, state),
                }
            })
            .filter(|row| include_normal || row.status != AlertStatus::Normal)
            .collect();
        rows.sort_by(|a, b| {
            formatting::severity(a.status)
                .cmp(&formatting::severity(b.status))
                .then_with(|| a.notification.id.cmp(&b.notification.id))
        });

        Ok(formatting::format_alert_rows(&rows))
    }
}

fn due_detail(notification: &Notification, state: &CurrentState) -> DueDetail {
    match notification.basis {
        Basis::Date => match notification.initial_date {
            Some(due) => DueDetail::Date {
                due,
                days_remaining: days_remaining(due, state.today),
            },
            None => DueDetail::Unscheduled,
        },
        Basis::Counter => match (notification.counter_type, notification.initial_counter_value) {
            (Some(counter), Some(target)) => DueDetail::Counter {
                counter,
                target,
                current: state.counters.as_ref().and_then(|c| c.value(counter)),
            },
            _ => DueDetail::Unscheduled,
        },
    }
}
