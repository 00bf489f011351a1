use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whether a notification is measured in calendar time or equipment usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Basis {
    #[default]
    Date,
    Counter,
}

impl FromStr for Basis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Date" | "date" => Ok(Basis::Date),
            "Counter" | "counter" => Ok(Basis::Counter),
            _ => Err(format!(
                "Invalid basis '{}'. Valid options are: Date, Counter",
                s
            )),
        }
    }
}

/// Recurrence rule for date-based notifications
///
/// Serialized with the labels used in the exported data (`"Bi-Monthly"`,
/// `"Semi-Annual"`). Unrecognized labels and `null` read as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recurrence {
    #[default]
    None,
    Weekly,
    /// Every two weeks
    BiMonthly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Yearly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "None",
            Recurrence::Weekly => "Weekly",
            Recurrence::BiMonthly => "Bi-Monthly",
            Recurrence::Monthly => "Monthly",
            Recurrence::Quarterly => "Quarterly",
            Recurrence::SemiAnnual => "Semi-Annual",
            Recurrence::Yearly => "Yearly",
        }
    }

    /// Lenient parse used for stored data
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Recurrence::None)
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(Recurrence::None),
            "Weekly" => Ok(Recurrence::Weekly),
            "Bi-Monthly" => Ok(Recurrence::BiMonthly),
            "Monthly" => Ok(Recurrence::Monthly),
            "Quarterly" => Ok(Recurrence::Quarterly),
            "Semi-Annual" => Ok(Recurrence::SemiAnnual),
            "Yearly" => Ok(Recurrence::Yearly),
            _ => Err(format!(
                "Invalid recurrence '{}'. Valid options are: None, Weekly, Bi-Monthly, Monthly, Quarterly, Semi-Annual, Yearly",
                s
            )),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Recurrence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Recurrence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .map(|l| Recurrence::from_label(&l))
            .unwrap_or_default())
    }
}

/// The usage counters tracked per aircraft
///
/// Uses snake_case naming to match the stored column names.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterType {
    hobbs,
    tach,
    airframe_total_time,
    engine_total_time,
    prop_total_time,
}

impl CounterType {
    pub const ALL: [CounterType; 5] = [
        CounterType::hobbs,
        CounterType::tach,
        CounterType::airframe_total_time,
        CounterType::engine_total_time,
        CounterType::prop_total_time,
    ];

    /// Column name in the `aircraft_counters` table
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterType::hobbs => "hobbs",
            CounterType::tach => "tach",
            CounterType::airframe_total_time => "airframe_total_time",
            CounterType::engine_total_time => "engine_total_time",
            CounterType::prop_total_time => "prop_total_time",
        }
    }

    /// Older column names still found in exported rows
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CounterType::hobbs => &["hobbs_hours"],
            CounterType::tach => &["tach_hours"],
            _ => &[],
        }
    }
}

impl fmt::Display for CounterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CounterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hobbs" => Ok(CounterType::hobbs),
            "tach" => Ok(CounterType::tach),
            "airframe_total_time" => Ok(CounterType::airframe_total_time),
            "engine_total_time" => Ok(CounterType::engine_total_time),
            "prop_total_time" => Ok(CounterType::prop_total_time),
            _ => Err(format!(
                "Invalid counter type '{}'. Valid options are: hobbs, tach, airframe_total_time, engine_total_time, prop_total_time",
                s
            )),
        }
    }
}

/// Current counter readings of one aircraft
///
/// A counter is `None` when the row has no usable value for it; the other
/// counters of the same row are still read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CounterSnapshot {
    pub hobbs: Option<f64>,
    pub tach: Option<f64>,
    pub airframe_total_time: Option<f64>,
    pub engine_total_time: Option<f64>,
    pub prop_total_time: Option<f64>,
}

impl CounterSnapshot {
    /// Read an `aircraft_counters` row
    ///
    /// The canonical column wins over its alias when both are present.
    /// `null` and missing columns read as `None`; non-numeric values are
    /// logged and read as `None`.
    pub fn from_row(row: &serde_json::Value) -> Self {
        let mut snapshot = Self::default();
        for counter in CounterType::ALL {
            let column = std::iter::once(counter.as_str())
                .chain(counter.aliases().iter().copied())
                .find_map(|key| row.get(key).filter(|v| !v.is_null()).map(|v| (key, v)));
            let value = match column {
                None => None,
                Some((key, v)) => match v.as_f64() {
                    Some(number) => Some(number),
                    None => {
                        tracing::warn!(column = key, value = %v, "ignoring non-numeric counter value");
                        None
                    }
                },
            };
            snapshot.set(counter, value);
        }
        snapshot
    }

    pub fn value(&self, counter: CounterType) -> Option<f64> {
        match counter {
            CounterType::hobbs => self.hobbs,
            CounterType::tach => self.tach,
            CounterType::airframe_total_time => self.airframe_total_time,
            CounterType::engine_total_time => self.engine_total_time,
            CounterType::prop_total_time => self.prop_total_time,
        }
    }

    pub fn set(&mut self, counter: CounterType, value: Option<f64>) {
        let slot = match counter {
            CounterType::hobbs => &mut self.hobbs,
            CounterType::tach => &mut self.tach,
            CounterType::airframe_total_time => &mut self.airframe_total_time,
            CounterType::engine_total_time => &mut self.engine_total_time,
            CounterType::prop_total_time => &mut self.prop_total_time,
        };
        *slot = value;
    }
}

/// A recurring compliance or maintenance reminder
///
/// Date-based notifications are anchored on `initial_date` and repeat per
/// `recurrence`. Counter-based notifications come due when `counter_type`
/// reaches `initial_counter_value`, then every `counter_interval` hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "notification_basis")]
    pub basis: Basis,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub initial_date: Option<NaiveDate>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub counter_type: Option<CounterType>,
    #[serde(default)]
    pub initial_counter_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_interval: Option<f64>,
    #[serde(default)]
    pub alert_days: Option<i64>,
    #[serde(default)]
    pub alert_hours: Option<f64>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub aircraft_id: Option<String>,
}

impl Notification {
    /// Create a date-based notification
    pub fn on_date(id: &str, description: &str, initial_date: NaiveDate, recurrence: Recurrence) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            basis: Basis::Date,
            initial_date: Some(initial_date),
            recurrence,
            counter_type: None,
            initial_counter_value: None,
            counter_interval: None,
            alert_days: None,
            alert_hours: None,
            is_completed: false,
            aircraft_id: None,
        }
    }

    /// Create a counter-based notification
    pub fn on_counter(id: &str, description: &str, counter_type: CounterType, due_at: f64) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            basis: Basis::Counter,
            initial_date: None,
            recurrence: Recurrence::None,
            counter_type: Some(counter_type),
            initial_counter_value: Some(due_at),
            counter_interval: None,
            alert_days: None,
            alert_hours: None,
            is_completed: false,
            aircraft_id: None,
        }
    }

    pub fn is_date_based(&self) -> bool {
        self.basis == Basis::Date
    }

    pub fn is_counter_based(&self) -> bool {
        self.basis == Basis::Counter
    }

    /// Whether this notification concerns `aircraft_id`
    ///
    /// Fleet-wide notifications (no aircraft) apply to every aircraft, and
    /// every notification applies when no aircraft is given.
    pub fn applies_to(&self, aircraft_id: Option<&str>) -> bool {
        match (aircraft_id, self.aircraft_id.as_deref()) {
            (Some(wanted), Some(assigned)) => wanted == assigned,
            _ => true,
        }
    }
}

// Stored ids may be integers or UUID strings
fn id_from_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(value).ok_or_else(|| serde::de::Error::custom("id must be a string or number"))
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(id_from_value(value))
}

/// Accepts `YYYY-MM-DD` or a timestamp starting with one
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    match text {
        None => Ok(None),
        Some(t) if t.trim().is_empty() => Ok(None),
        Some(t) => {
            let date_part = t.get(..10).unwrap_or(&t);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid date '{}'", t)))
        }
    }
}
