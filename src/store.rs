//! In-memory table store backing the server
//!
//! `HangarData` keeps every table as an array of JSON records inside a
//! normalized [`ExportSnapshot`], so import and export are a swap of the
//! whole snapshot and record-level access goes through [`TableStore`].

use crate::error::StoreError;
use crate::migration::CURRENT_SCHEMA_VERSION;
use crate::snapshot::{ExportSnapshot, TableName, normalize_data};
use crate::schedule::{CounterSnapshot, CounterType, Notification};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

/// Generic record access by table and filter
///
/// Filters are `(field, value)` pairs; a record matches when every field is
/// present and equal to the given JSON value.
pub trait TableStore {
    fn query(&self, table: TableName, filters: &[(&str, Value)]) -> Vec<Value>;
    fn insert(&mut self, table: TableName, record: Value) -> Result<Value, StoreError>;
    fn update(&mut self, table: TableName, id: &str, patch: Value) -> Result<(), StoreError>;
    fn delete(&mut self, table: TableName, filters: &[(&str, Value)]) -> usize;
}

/// Record id as a string; integer ids are rendered in decimal
pub fn record_id(record: &Value) -> Option<String> {
    record.get("id").and_then(id_text)
}

fn id_text(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_aircraft_row(row: &Value, aircraft_id: &str) -> bool {
    row.get("aircraft_id").and_then(id_text).as_deref() == Some(aircraft_id)
}

fn matches_filters(record: &Value, filters: &[(&str, Value)]) -> bool {
    filters
        .iter()
        .all(|(field, expected)| record.get(*field) == Some(expected))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HangarData {
    snapshot: ExportSnapshot,
}

impl Default for HangarData {
    fn default() -> Self {
        Self {
            snapshot: ExportSnapshot::empty(CURRENT_SCHEMA_VERSION),
        }
    }
}

impl HangarData {
    /// Create an empty store at the current schema version
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already migrated snapshot
    pub fn from_snapshot(snapshot: ExportSnapshot) -> Self {
        Self {
            snapshot: normalize_data(&snapshot),
        }
    }

    pub fn snapshot(&self) -> &ExportSnapshot {
        &self.snapshot
    }

    pub fn version(&self) -> &str {
        &self.snapshot.version
    }

    /// Build the export document, stamped with the current schema version
    pub fn export(&self, now: DateTime<Utc>) -> ExportSnapshot {
        let mut exported = self.snapshot.clone();
        exported.version = CURRENT_SCHEMA_VERSION.to_string();
        exported.export_date = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        exported
    }

    /// All notification rows that decode cleanly
    pub fn notifications(&self) -> Vec<Notification> {
        self.snapshot
            .table(TableName::notifications)
            .iter()
            .filter_map(|row| match serde_json::from_value::<Notification>(row.clone()) {
                Ok(n) => Some(n),
                Err(e) => {
                    tracing::warn!(id = ?record_id(row), error = %e, "skipping unreadable notification");
                    None
                }
            })
            .collect()
    }

    pub fn find_notification(&self, id: &str) -> Option<Notification> {
        self.notifications().into_iter().find(|n| n.id == id)
    }

    /// Latest counter reading for an aircraft
    pub fn counters_for(&self, aircraft_id: &str) -> Option<CounterSnapshot> {
        self.snapshot
            .table(TableName::aircraft_counters)
            .iter()
            .rev()
            .find(|row| is_aircraft_row(row, aircraft_id))
            .map(CounterSnapshot::from_row)
    }

    /// Write counter readings onto the aircraft's latest counter row
    ///
    /// The row is matched by position, so rows imported without an id are
    /// updated in place. Alias columns (`hobbs_hours`, `tach_hours`) are
    /// renamed to their canonical names. A new row is inserted when the
    /// aircraft has none.
    pub fn record_counters(
        &mut self,
        aircraft_id: &str,
        readings: &[(CounterType, f64)],
    ) -> Result<(), StoreError> {
        let rows = self.snapshot.table_mut(TableName::aircraft_counters);
        if let Some(Value::Object(fields)) = rows
            .iter_mut()
            .rev()
            .find(|row| is_aircraft_row(row, aircraft_id))
        {
            for counter in CounterType::ALL {
                for alias in counter.aliases() {
                    if let Some(value) = fields.remove(*alias) {
                        let canonical = counter.as_str().to_string();
                        if fields.get(&canonical).is_none_or(Value::is_null) {
                            fields.insert(canonical, value);
                        }
                    }
                }
            }
            for (counter, value) in readings {
                fields.insert(counter.as_str().to_string(), json!(value));
            }
            return Ok(());
        }

        let mut row = Map::new();
        row.insert("aircraft_id".to_string(), json!(aircraft_id));
        for (counter, value) in readings {
            row.insert(counter.as_str().to_string(), json!(value));
        }
        self.insert(TableName::aircraft_counters, Value::Object(row))
            .map(|_| ())
    }

    fn next_id(&self, table: TableName) -> String {
        let records = self.snapshot.table(table);
        let mut n = records.len() + 1;
        loop {
            let candidate = format!("{}-{}", table, n);
            if !records
                .iter()
                .any(|r| record_id(r).as_deref() == Some(candidate.as_str()))
            {
                return candidate;
            }
            n += 1;
        }
    }
}

impl TableStore for HangarData {
    fn query(&self, table: TableName, filters: &[(&str, Value)]) -> Vec<Value> {
        self.snapshot
            .table(table)
            .iter()
            .filter(|r| matches_filters(r, filters))
            .cloned()
            .collect()
    }

    fn insert(&mut self, table: TableName, record: Value) -> Result<Value, StoreError> {
        let mut fields = match record {
            Value::Object(fields) => fields,
            other => return Err(StoreError::NotAnObject(other.to_string())),
        };

        let id = match fields.get("id").and_then(id_text) {
            Some(id) => id,
            None => {
                let id = self.next_id(table);
                fields.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };

        let records = self.snapshot.table_mut(table);
        if records.iter().any(|r| record_id(r).as_deref() == Some(id.as_str())) {
            return Err(StoreError::DuplicateId {
                table: table.to_string(),
                id,
            });
        }

        let stored = Value::Object(fields);
        records.push(stored.clone());
        Ok(stored)
    }

    fn update(&mut self, table: TableName, id: &str, patch: Value) -> Result<(), StoreError> {
        let patch = match patch {
            Value::Object(patch) => patch,
            other => return Err(StoreError::NotAnObject(other.to_string())),
        };

        let records = self.snapshot.table_mut(table);
        let record = records
            .iter_mut()
            .find(|r| record_id(r).as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;

        if let Value::Object(fields) = record {
            merge(fields, patch);
        }
        Ok(())
    }

    fn delete(&mut self, table: TableName, filters: &[(&str, Value)]) -> usize {
        let records = self.snapshot.table_mut(table);
        let before = records.len();
        records.retain(|r| !matches_filters(r, filters));
        before - records.len()
    }
}

fn merge(fields: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        fields.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_new_store_is_normalized() {
        let data = HangarData::new();
        assert_eq!(data.version(), CURRENT_SCHEMA_VERSION);
        for name in TableName::ALL {
            assert!(data.snapshot().tables[name.as_str()].is_array());
        }
    }

    #[test]
    fn test_insert_assigns_id() {
        let mut data = HangarData::new();
        let stored = data
            .insert(TableName::equipment, json!({ "name": "GPS" }))
            .unwrap();
        assert_eq!(stored["id"], json!("equipment-1"));

        let second = data
            .insert(TableName::equipment, json!({ "name": "Radio" }))
            .unwrap();
        assert_eq!(second["id"], json!("equipment-2"));
    }

    #[test]
    fn test_insert_skips_taken_generated_id() {
        let mut data = HangarData::new();
        data.insert(TableName::equipment, json!({ "id": "equipment-2" }))
            .unwrap();
        let stored = data.insert(TableName::equipment, json!({})).unwrap();
        assert_eq!(stored["id"], json!("equipment-3"));
    }

    #[test]
    fn test_insert_rejects_duplicate_and_non_object() {
        let mut data = HangarData::new();
        data.insert(TableName::directives, json!({ "id": 7 })).unwrap();
        let err = data
            .insert(TableName::directives, json!({ "id": "7" }))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { .. }));

        let err = data.insert(TableName::directives, json!([1])).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject(_)));
    }

    #[test]
    fn test_query_update_delete() {
        let mut data = HangarData::new();
        data.insert(TableName::subscriptions, json!({ "id": "s1", "aircraft_id": "a" }))
            .unwrap();
        data.insert(TableName::subscriptions, json!({ "id": "s2", "aircraft_id": "b" }))
            .unwrap();

        let rows = data.query(TableName::subscriptions, &[("aircraft_id", json!("a"))]);
        assert_eq!(rows.len(), 1);
        assert_eq!(data.query(TableName::subscriptions, &[]).len(), 2);

        data.update(TableName::subscriptions, "s2", json!({ "cost": 99 }))
            .unwrap();
        let rows = data.query(TableName::subscriptions, &[("cost", json!(99))]);
        assert_eq!(rows[0]["aircraft_id"], json!("b"));

        let err = data
            .update(TableName::subscriptions, "nope", json!({}))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let removed = data.delete(TableName::subscriptions, &[("id", json!("s1"))]);
        assert_eq!(removed, 1);
        assert_eq!(data.query(TableName::subscriptions, &[]).len(), 1);
    }

    #[test]
    fn test_notifications_skip_bad_rows() {
        let mut data = HangarData::new();
        data.insert(
            TableName::notifications,
            json!({ "id": "n1", "initial_date": "2024-01-01", "recurrence": "Weekly" }),
        )
        .unwrap();
        data.insert(
            TableName::notifications,
            json!({ "id": "n2", "initial_date": "not a date" }),
        )
        .unwrap();

        let notifications = data.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].id, "n1");
        assert!(data.find_notification("n2").is_none());
    }

    #[test]
    fn test_counters_for_aircraft() {
        let mut data = HangarData::new();
        data.insert(
            TableName::aircraft_counters,
            json!({ "aircraft_id": "a", "tach": 100.0 }),
        )
        .unwrap();
        data.insert(
            TableName::aircraft_counters,
            json!({ "aircraft_id": "b", "tach": 200.0 }),
        )
        .unwrap();

        assert_eq!(data.counters_for("a").unwrap().tach, Some(100.0));
        assert_eq!(data.counters_for("b").unwrap().tach, Some(200.0));
        assert!(data.counters_for("c").is_none());
    }

    #[test]
    fn test_record_counters_updates_id_less_row_in_place() {
        let mut snapshot = ExportSnapshot::empty(CURRENT_SCHEMA_VERSION);
        snapshot.table_mut(TableName::aircraft_counters).push(json!({
            "aircraft_id": "N1",
            "hobbs_hours": 100.0,
            "tach_hours": 148.0,
            "engine_total_time": 900.0
        }));
        let mut data = HangarData::from_snapshot(snapshot);

        data.record_counters("N1", &[(CounterType::tach, 151.0)]).unwrap();

        let rows = data.query(TableName::aircraft_counters, &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            json!({
                "aircraft_id": "N1",
                "hobbs": 100.0,
                "tach": 151.0,
                "engine_total_time": 900.0
            })
        );
        let counters = data.counters_for("N1").unwrap();
        assert_eq!(counters.hobbs, Some(100.0));
        assert_eq!(counters.tach, Some(151.0));
        assert_eq!(counters.engine_total_time, Some(900.0));
    }

    #[test]
    fn test_record_counters_inserts_first_row() {
        let mut data = HangarData::new();
        data.record_counters("N2", &[(CounterType::hobbs, 12.5)]).unwrap();

        let rows = data.query(TableName::aircraft_counters, &[("aircraft_id", json!("N2"))]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!("aircraft_counters-1"));
        assert_eq!(data.counters_for("N2").unwrap().hobbs, Some(12.5));
    }

    #[test]
    fn test_export_stamps_version_and_date() {
        let data = HangarData::from_snapshot(ExportSnapshot::empty("1.0"));
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let exported = data.export(now);
        assert_eq!(exported.version, CURRENT_SCHEMA_VERSION);
        assert_eq!(exported.export_date.as_deref(), Some("2024-05-01T12:00:00.000Z"));
    }
}
