//! Export snapshot container, structural validation and normalization

use crate::error::ImportError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::version::SchemaVersion;

/// The fixed set of tables carried by an export
///
/// Uses snake_case naming to match the JSON table keys.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableName {
    aircraft_counters,
    aircraft_counter_history,
    subscriptions,
    notifications,
    maintenance_logs,
    directives,
    aircraft_directive_status,
    directive_history,
    maintenance_directive_compliance,
    equipment,
}

impl TableName {
    /// Every enumerated table, in export order
    pub const ALL: [TableName; 10] = [
        TableName::aircraft_counters,
        TableName::aircraft_counter_history,
        TableName::subscriptions,
        TableName::notifications,
        TableName::maintenance_logs,
        TableName::directives,
        TableName::aircraft_directive_status,
        TableName::directive_history,
        TableName::maintenance_directive_compliance,
        TableName::equipment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::aircraft_counters => "aircraft_counters",
            TableName::aircraft_counter_history => "aircraft_counter_history",
            TableName::subscriptions => "subscriptions",
            TableName::notifications => "notifications",
            TableName::maintenance_logs => "maintenance_logs",
            TableName::directives => "directives",
            TableName::aircraft_directive_status => "aircraft_directive_status",
            TableName::directive_history => "directive_history",
            TableName::maintenance_directive_compliance => "maintenance_directive_compliance",
            TableName::equipment => "equipment",
        }
    }
}

impl FromStr for TableName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableName::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| {
                let names: Vec<&str> = TableName::ALL.iter().map(|t| t.as_str()).collect();
                format!(
                    "Invalid table '{}'. Valid tables are: {}",
                    s,
                    names.join(", ")
                )
            })
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A versioned bag of named record arrays
///
/// Records are opaque JSON values. Table keys outside [`TableName::ALL`] and
/// top-level keys other than `version`, `exportDate` and `tables` are carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
    #[serde(default)]
    pub tables: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExportSnapshot {
    /// Create an empty, normalized snapshot at `version`
    pub fn empty(version: &str) -> Self {
        let snapshot = Self {
            version: version.to_string(),
            export_date: None,
            tables: Map::new(),
            extra: Map::new(),
        };
        normalize_data(&snapshot)
    }

    /// Validate a raw JSON payload and lift it into a snapshot
    ///
    /// The raw value is not consumed, so the caller keeps the original for
    /// inspection after a failed import.
    pub fn from_value(raw: &Value) -> Result<Self, ImportError> {
        validate_structure(raw)?;

        // validate_structure guarantees the object shape below
        let mut object = raw.as_object().cloned().unwrap_or_default();
        let version = match object.remove("version") {
            Some(Value::String(v)) => v,
            _ => String::new(),
        };
        let export_date = match object.remove("exportDate") {
            Some(Value::String(d)) => Some(d),
            _ => None,
        };
        let tables = match object.remove("tables") {
            Some(Value::Object(t)) => t,
            _ => Map::new(),
        };

        Ok(Self {
            version,
            export_date,
            tables,
            extra: object,
        })
    }

    /// Records of an enumerated table, or an empty slice if it is absent
    pub fn table(&self, name: TableName) -> &[Value] {
        match self.tables.get(name.as_str()) {
            Some(Value::Array(records)) => records,
            _ => &[],
        }
    }

    /// Mutable records of an enumerated table, creating the array if needed
    pub fn table_mut(&mut self, name: TableName) -> &mut Vec<Value> {
        let entry = self
            .tables
            .entry(name.as_str().to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        match entry {
            Value::Array(records) => records,
            _ => unreachable!("table entry was just replaced with an array"),
        }
    }

    /// Total record count across the enumerated tables
    pub fn record_count(&self) -> usize {
        TableName::ALL.iter().map(|t| self.table(*t).len()).sum()
    }
}

/// Check the basic export shape of a raw payload
///
/// Requires an object with a non-empty dotted-numeric `version` and a
/// `tables` object. Every enumerated table that is present must be an array
/// (`null` is treated as absent). Unknown table keys are ignored.
pub fn validate_structure(raw: &Value) -> Result<(), ImportError> {
    let object = raw
        .as_object()
        .ok_or_else(|| ImportError::Structural("import data must be a JSON object".to_string()))?;

    let version = match object.get("version") {
        Some(Value::String(v)) if !v.trim().is_empty() => v,
        _ => {
            return Err(ImportError::Structural(
                "missing or invalid 'version' field".to_string(),
            ));
        }
    };
    version
        .parse::<SchemaVersion>()
        .map_err(ImportError::Structural)?;

    let tables = match object.get("tables") {
        Some(Value::Object(t)) => t,
        _ => {
            return Err(ImportError::Structural(
                "missing or invalid 'tables' field".to_string(),
            ));
        }
    };

    for name in TableName::ALL {
        match tables.get(name.as_str()) {
            None | Some(Value::Null) | Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(ImportError::Structural(format!(
                    "table '{}' must be an array",
                    name
                )));
            }
        }
    }

    Ok(())
}

/// Fill every missing enumerated table with an empty array
///
/// Present arrays and unknown keys are left as they are. Idempotent.
pub fn normalize_data(snapshot: &ExportSnapshot) -> ExportSnapshot {
    let mut normalized = snapshot.clone();
    for name in TableName::ALL {
        let entry = normalized.tables.get(name.as_str());
        if matches!(entry, None | Some(Value::Null)) {
            normalized
                .tables
                .insert(name.as_str().to_string(), Value::Array(Vec::new()));
        }
    }
    normalized
}
