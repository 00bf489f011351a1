//! Alert status classification
//!
//! Status is derived from current state on every call and never stored.

use super::notification::{Basis, CounterSnapshot, CounterType, Notification, local_date_today};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Default warning window for date-based notifications, in days
pub const DEFAULT_ALERT_DAYS: i64 = 7;
/// Default warning window for counter-based notifications, in hours
pub const DEFAULT_ALERT_HOURS: f64 = 10.0;

/// Urgency of a single occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertStatus {
    Normal,
    Alert,
    Due,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertStatus::Normal => "normal",
            AlertStatus::Alert => "alert",
            AlertStatus::Due => "due",
        };
        f.write_str(label)
    }
}

/// Fallback warning windows for notifications that don't set their own
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    pub alert_days: i64,
    pub alert_hours: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            alert_days: DEFAULT_ALERT_DAYS,
            alert_hours: DEFAULT_ALERT_HOURS,
        }
    }
}

/// What classification is measured against
///
/// `counters` is `None` when no reading exists for the aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentState {
    pub today: NaiveDate,
    pub counters: Option<CounterSnapshot>,
}

impl CurrentState {
    pub fn new(today: NaiveDate, counters: Option<CounterSnapshot>) -> Self {
        Self { today, counters }
    }

    /// State as of the local calendar day
    pub fn now(counters: Option<CounterSnapshot>) -> Self {
        Self::new(local_date_today(), counters)
    }
}

/// Whole days from `today` until `due`; negative when overdue
///
/// Both sides are calendar dates, so there is no partial-day drift.
pub fn days_remaining(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Classify a date occurrence
pub fn classify_due_date(due: NaiveDate, today: NaiveDate, alert_days: i64) -> AlertStatus {
    let remaining = days_remaining(due, today);
    if remaining <= 0 {
        AlertStatus::Due
    } else if remaining <= alert_days {
        AlertStatus::Alert
    } else {
        AlertStatus::Normal
    }
}

/// Classify a counter checkpoint
///
/// Without a reading for `counter` there is nothing to compare against, so
/// the result is always `Normal`.
pub fn classify_counter_target(
    target: f64,
    counter: CounterType,
    counters: Option<&CounterSnapshot>,
    alert_hours: f64,
) -> AlertStatus {
    let Some(current) = counters.and_then(|c| c.value(counter)) else {
        return AlertStatus::Normal;
    };
    let remaining = target - current;
    if remaining <= 0.0 {
        AlertStatus::Due
    } else if remaining <= alert_hours {
        AlertStatus::Alert
    } else {
        AlertStatus::Normal
    }
}

/// Classify a notification's outstanding occurrence with default thresholds
pub fn classify(notification: &Notification, state: &CurrentState) -> AlertStatus {
    classify_with(notification, state, &AlertThresholds::default())
}

/// Classify a notification's outstanding occurrence
///
/// The outstanding occurrence is the anchor: `initial_date` for date-based
/// notifications, `initial_counter_value` for counter-based ones. A
/// notification missing the fields its basis needs classifies as `Normal`.
pub fn classify_with(
    notification: &Notification,
    state: &CurrentState,
    thresholds: &AlertThresholds,
) -> AlertStatus {
    match notification.basis {
        Basis::Date => match notification.initial_date {
            Some(due) => classify_occurrence_date(notification, due, state.today, thresholds),
            None => AlertStatus::Normal,
        },
        Basis::Counter => match notification.initial_counter_value {
            Some(target) => {
                classify_checkpoint(notification, target, state.counters.as_ref(), thresholds)
            }
            None => AlertStatus::Normal,
        },
    }
}

/// Classify one projected date of a notification
pub fn classify_occurrence_date(
    notification: &Notification,
    occurrence: NaiveDate,
    today: NaiveDate,
    thresholds: &AlertThresholds,
) -> AlertStatus {
    let alert_days = notification.alert_days.unwrap_or(thresholds.alert_days);
    classify_due_date(occurrence, today, alert_days)
}

/// Classify one counter checkpoint of a notification
pub fn classify_checkpoint(
    notification: &Notification,
    target: f64,
    counters: Option<&CounterSnapshot>,
    thresholds: &AlertThresholds,
) -> AlertStatus {
    let Some(counter) = notification.counter_type else {
        return AlertStatus::Normal;
    };
    let alert_hours = notification.alert_hours.unwrap_or(thresholds.alert_hours);
    classify_counter_target(target, counter, counters, alert_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Recurrence;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_remaining_crosses_month() {
        assert_eq!(days_remaining(date(2024, 3, 1), date(2024, 2, 28)), 2);
        assert_eq!(days_remaining(date(2024, 2, 28), date(2024, 3, 1)), -2);
    }

    #[test]
    fn test_custom_alert_days_on_notification() {
        let mut n = Notification::on_date("n", "Insurance", date(2024, 2, 1), Recurrence::Yearly);
        let state = CurrentState::new(date(2024, 1, 11), None);
        assert_eq!(classify(&n, &state), AlertStatus::Normal);

        n.alert_days = Some(30);
        assert_eq!(classify(&n, &state), AlertStatus::Alert);
    }

    #[test]
    fn test_thresholds_override_defaults() {
        let n = Notification::on_date("n", "Insurance", date(2024, 2, 1), Recurrence::None);
        let state = CurrentState::new(date(2024, 1, 11), None);
        let wide = AlertThresholds {
            alert_days: 30,
            alert_hours: DEFAULT_ALERT_HOURS,
        };
        assert_eq!(classify_with(&n, &state, &wide), AlertStatus::Alert);
    }

    #[test]
    fn test_counter_without_type_is_normal() {
        let mut n = Notification::on_counter("c", "Oil", CounterType::tach, 100.0);
        n.counter_type = None;
        let state = CurrentState::new(date(2024, 1, 1), Some(CounterSnapshot::default()));
        assert_eq!(classify(&n, &state), AlertStatus::Normal);
    }

    #[test]
    fn test_counter_reading_missing_for_one_type() {
        let n = Notification::on_counter("c", "Prop overhaul", CounterType::prop_total_time, 100.0);
        let counters = CounterSnapshot {
            tach: Some(500.0),
            ..CounterSnapshot::default()
        };
        let state = CurrentState::new(date(2024, 1, 1), Some(counters));
        assert_eq!(classify(&n, &state), AlertStatus::Normal);
    }

    #[test]
    fn test_date_notification_without_anchor_is_normal() {
        let mut n = Notification::on_date("n", "x", date(2024, 1, 1), Recurrence::None);
        n.initial_date = None;
        let state = CurrentState::new(date(2024, 1, 1), None);
        assert_eq!(classify(&n, &state), AlertStatus::Normal);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AlertStatus::Due.to_string(), "due");
        assert_eq!(AlertStatus::Alert.to_string(), "alert");
        assert_eq!(AlertStatus::Normal.to_string(), "normal");
    }
}
