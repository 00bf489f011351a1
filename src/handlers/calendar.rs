//! Calendar handler for the hangar MCP server

use crate::HangarServerHandler;
use crate::formatting::{self, AlertRow, DueDetail};
use crate::schedule::{
    classify_occurrence_date, days_remaining, local_date_today, occurs_on_date,
};
use crate::validation;
use mcp_attr::Result as McpResult;

impl HangarServerHandler {
    /// Lists date-based notifications that fall on a given day, each classified against `as_of`.
    pub async fn handle_calendar(
        &self,
        date: String,
        aircraft_id: Option<String>,
        as_of: Option<String>,
    ) -> McpResult<String> {
        let date = validation::parse_date(&date)?;
        let today =
            validation::parse_optional_date(as_of.as_deref())?.unwrap_or_else(local_date_today);
        let aircraft_id = aircraft_id.filter(|a| !a.trim().is_empty());

        let data = self.data.lock().unwrap();
        let notifications = data.notifications();
        drop(data);

        let lookahead = self.config.occurrence_lookahead;
        let thresholds = self.config.thresholds();
        let mut rows: Vec<AlertRow<'_>> = notifications
            .iter()
            .filter(|n| !n.is_completed)
            .filter(|n| n.applies_to(aircraft_id.as_deref()))
            .filter(|n| occurs_on_date(n, date, lookahead))
            .map(|n| AlertRow {
                notification: n,
                status: classify_occurrence_date(n, date, today, &thresholds),
                due: DueDetail::Date {
                    due: date,
                    days_remaining: days_remaining(date, today),
                },
            })
            .collect();
        rows.sort_by(|a, b| a.notification.id.cmp(&b.notification.id));

        Ok(formatting::format_calendar(date, &rows))
    }
}
