//! Notification scheduling
//!
//! This module projects recurring notifications forward and classifies how
//! urgent each occurrence is:
//! - `notification`: notification, recurrence and counter models
//! - `recurrence`: occurrence dates and counter checkpoints
//! - `alert`: Normal / Alert / Due classification against current state

mod alert;
mod notification;
mod recurrence;

// Re-export all public types
pub use alert::{
    AlertStatus, AlertThresholds, CurrentState, DEFAULT_ALERT_DAYS, DEFAULT_ALERT_HOURS,
    classify, classify_checkpoint, classify_counter_target, classify_due_date,
    classify_occurrence_date, classify_with, days_remaining,
};
pub use notification::{
    Basis, CounterSnapshot, CounterType, Notification, Recurrence, local_date_today,
};
pub use recurrence::{
    DEFAULT_OCCURRENCE_LOOKAHEAD, counter_checkpoint, counter_checkpoints, next_occurrence,
    occurrence_dates, occurs_on_date,
};
