//! Formatting helper functions for MCP tool output
//!
//! Tool results are plain text meant to be shown to the user as-is.

use crate::migration::MigrationResult;
use crate::schedule::{AlertStatus, CounterType, Notification};
use chrono::NaiveDate;

/// How a notification's outstanding occurrence is measured
#[derive(Debug, Clone, PartialEq)]
pub enum DueDetail {
    Date {
        due: NaiveDate,
        days_remaining: i64,
    },
    Counter {
        counter: CounterType,
        target: f64,
        current: Option<f64>,
    },
    Unscheduled,
}

/// One line of the alerts or calendar listing
#[derive(Debug, Clone)]
pub struct AlertRow<'a> {
    pub notification: &'a Notification,
    pub status: AlertStatus,
    pub due: DueDetail,
}

/// Sort key putting the most urgent rows first
pub fn severity(status: AlertStatus) -> u8 {
    match status {
        AlertStatus::Due => 0,
        AlertStatus::Alert => 1,
        AlertStatus::Normal => 2,
    }
}

pub fn format_import_success(result: &MigrationResult, record_count: usize) -> String {
    let mut output = format!("Import successful: {} record(s) loaded", record_count);
    if result.migrations_applied.is_empty() {
        output.push_str("\nNo migrations needed");
    } else {
        output.push_str(&format!(
            "\nMigrations applied ({}):",
            result.migrations_applied.len()
        ));
        for step in &result.migrations_applied {
            output.push_str(&format!("\n- {}", step));
        }
    }
    output
}

pub fn format_import_failure(result: &MigrationResult) -> String {
    let mut output = format!(
        "Import failed: {}",
        result.error.as_deref().unwrap_or("unknown error")
    );
    if !result.migrations_applied.is_empty() {
        output.push_str("\nCompleted before failure (discarded):");
        for step in &result.migrations_applied {
            output.push_str(&format!("\n- {}", step));
        }
    }
    output
}

fn format_due(due: &DueDetail) -> String {
    match due {
        DueDetail::Date {
            due,
            days_remaining,
        } => {
            let when = match *days_remaining {
                0 => "today".to_string(),
                d if d < 0 => format!("overdue by {} day(s)", -d),
                d => format!("in {} day(s)", d),
            };
            format!("Due: {} ({})", due, when)
        }
        DueDetail::Counter {
            counter,
            target,
            current: Some(current),
        } => format!(
            "Due at: {} {:.1} (current {:.1}, {:.1} remaining)",
            counter,
            target,
            current,
            target - current
        ),
        DueDetail::Counter {
            counter,
            target,
            current: None,
        } => format!("Due at: {} {:.1} (no counter reading)", counter, target),
        DueDetail::Unscheduled => "Due: not scheduled".to_string(),
    }
}

fn push_row(output: &mut String, row: &AlertRow<'_>) {
    let n = row.notification;
    output.push_str(&format!(
        "- [{}] {} (status: {}, basis: {:?})\n",
        n.id, n.description, row.status, n.basis
    ));
    output.push_str(&format!("  {}\n", format_due(&row.due)));
    if n.is_date_based() {
        output.push_str(&format!("  Recurrence: {}\n", n.recurrence));
    }
    if let Some(ref aircraft) = n.aircraft_id {
        output.push_str(&format!("  Aircraft: {}\n", aircraft));
    }
}

pub fn format_alert_rows(rows: &[AlertRow<'_>]) -> String {
    if rows.is_empty() {
        return "No notifications need attention".to_string();
    }
    let mut output = format!("Found {} notification(s):\n\n", rows.len());
    for row in rows {
        push_row(&mut output, row);
    }
    output
}

pub fn format_calendar(date: NaiveDate, rows: &[AlertRow<'_>]) -> String {
    if rows.is_empty() {
        return format!("No notifications on {}", date);
    }
    let mut output = format!("{} notification(s) on {}:\n\n", rows.len(), date);
    for row in rows {
        push_row(&mut output, row);
    }
    output
}

pub fn format_checkpoints(
    notification: &Notification,
    checkpoints: &[(f64, AlertStatus)],
    current: Option<f64>,
) -> String {
    let counter = notification
        .counter_type
        .map(|c| c.to_string())
        .unwrap_or_else(|| "counter".to_string());
    let mut output = format!(
        "Checkpoints for [{}] {} ({}):\n",
        notification.id, notification.description, counter
    );
    match current {
        Some(value) => output.push_str(&format!("Current reading: {:.1}\n\n", value)),
        None => output.push_str("Current reading: none\n\n"),
    }
    for (index, (target, status)) in checkpoints.iter().enumerate() {
        output.push_str(&format!("{}. {:.1} ({})\n", index + 1, target, status));
    }
    output
}
