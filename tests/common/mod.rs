//! Common test utilities for integration tests

#![allow(dead_code)]

use hangar_mcp::{HangarConfig, HangarServerHandler};
use serde_json::{Value, json};
use tempfile::NamedTempFile;

/// Create a test handler with temporary storage
pub fn get_test_handler() -> (HangarServerHandler, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let handler =
        HangarServerHandler::new(temp_file.path().to_str().unwrap(), HangarConfig::default())
            .unwrap();
    (handler, temp_file)
}

/// Extract the notification ID from an add_notification response
/// Response format: "Notification created with ID: <id> (basis: Date)"
pub fn extract_id_from_response(response: &str) -> String {
    if let Some(start) = response.find("ID: ") {
        let id_part = &response[start + 4..];
        if let Some(end) = id_part.find(" (") {
            return id_part[..end].trim().to_string();
        }
    }
    response
        .split_whitespace()
        .last()
        .unwrap_or("")
        .trim_end_matches(')')
        .to_string()
}

/// A version 1.0 export: no equipment table, records without aircraft_id
pub fn v1_0_export() -> Value {
    json!({
        "version": "1.0",
        "exportDate": "2023-06-01T08:00:00.000Z",
        "tables": {
            "notifications": [
                {
                    "id": 1,
                    "description": "Annual inspection",
                    "notification_basis": "Date",
                    "initial_date": "2024-03-15",
                    "recurrence": "Yearly",
                    "alert_days": 30
                },
                {
                    "id": 2,
                    "description": "Oil change",
                    "notification_basis": "Counter",
                    "counter_type": "tach",
                    "initial_counter_value": 150.0,
                    "counter_interval": 50.0
                }
            ],
            "aircraft_counters": [
                { "id": 1, "hobbs_hours": 1200.5, "tach_hours": 145.0 }
            ],
            "maintenance_logs": [],
            "directives": null
        }
    })
}

/// Parse the JSON returned by export_data
pub fn parse_export(json_text: &str) -> Value {
    serde_json::from_str(json_text).unwrap()
}
