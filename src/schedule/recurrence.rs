//! Occurrence projection for recurring notifications
//!
//! Occurrence `k` is always computed from the anchor (`anchor + k * step`),
//! never by stepping from the previous occurrence. Month steps clamp to the
//! last day of the target month, so a Jan 31 monthly anchor yields Feb 29
//! (or 28) and then Mar 31.

use super::notification::{Notification, Recurrence};
use chrono::{Duration, Months, NaiveDate};

/// How many future occurrences `occurs_on_date` inspects by default
///
/// A date further out than this many occurrences past the anchor is reported
/// as not occurring, even if the rule would eventually land on it.
pub const DEFAULT_OCCURRENCE_LOOKAHEAD: u32 = 10;

enum Step {
    Weeks(i64),
    Months(u32),
    Never,
}

fn step_of(recurrence: Recurrence) -> Step {
    match recurrence {
        Recurrence::Weekly => Step::Weeks(1),
        Recurrence::BiMonthly => Step::Weeks(2),
        Recurrence::Monthly => Step::Months(1),
        Recurrence::Quarterly => Step::Months(3),
        Recurrence::SemiAnnual => Step::Months(6),
        Recurrence::Yearly => Step::Months(12),
        Recurrence::None => Step::Never,
    }
}

/// Project occurrence `index` of a rule anchored at `initial_date`
///
/// Index 0 is the anchor itself. `Recurrence::None` always returns the
/// anchor. Returns `None` only when the result falls outside chrono's
/// representable range.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use hangar_mcp::schedule::{Recurrence, next_occurrence};
///
/// let anchor = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// assert_eq!(
///     next_occurrence(anchor, Recurrence::Monthly, 1),
///     NaiveDate::from_ymd_opt(2024, 2, 29)
/// );
/// ```
pub fn next_occurrence(
    initial_date: NaiveDate,
    recurrence: Recurrence,
    occurrence_index: u32,
) -> Option<NaiveDate> {
    match step_of(recurrence) {
        Step::Weeks(weeks) => {
            let days = weeks.checked_mul(7)?.checked_mul(i64::from(occurrence_index))?;
            initial_date.checked_add_signed(Duration::try_days(days)?)
        }
        Step::Months(months) => {
            let total = months.checked_mul(occurrence_index)?;
            initial_date.checked_add_months(Months::new(total))
        }
        Step::Never => Some(initial_date),
    }
}

/// Check whether a date-based notification falls on `target`
///
/// Looks at the anchor and then at most `lookahead` further occurrences,
/// stopping early once an occurrence passes `target`. Counter-based
/// notifications and notifications without an anchor never match.
pub fn occurs_on_date(notification: &Notification, target: NaiveDate, lookahead: u32) -> bool {
    if !notification.is_date_based() {
        return false;
    }
    let Some(anchor) = notification.initial_date else {
        return false;
    };
    if anchor == target {
        return true;
    }

    for index in 1..=lookahead {
        match next_occurrence(anchor, notification.recurrence, index) {
            Some(date) if date == target => return true,
            Some(date) if date > target => return false,
            Some(_) => {}
            None => return false,
        }
    }

    false
}

/// Occurrence dates within the lookahead window, anchor first
///
/// Non-recurring notifications yield only the anchor.
pub fn occurrence_dates(notification: &Notification, lookahead: u32) -> Vec<NaiveDate> {
    let Some(anchor) = notification.initial_date else {
        return Vec::new();
    };
    if notification.recurrence == Recurrence::None {
        return vec![anchor];
    }
    (0..=lookahead)
        .map_while(|index| next_occurrence(anchor, notification.recurrence, index))
        .collect()
}

/// Counter value at which checkpoint `index` comes due
///
/// Checkpoint 0 is `initial_counter_value`. Later checkpoints exist only when
/// the notification has a positive `counter_interval`.
pub fn counter_checkpoint(notification: &Notification, index: u32) -> Option<f64> {
    let start = notification.initial_counter_value?;
    if index == 0 {
        return Some(start);
    }
    match notification.counter_interval {
        Some(interval) if interval > 0.0 => Some(start + interval * f64::from(index)),
        _ => None,
    }
}

/// The first `count` checkpoints of a counter-based notification
pub fn counter_checkpoints(notification: &Notification, count: u32) -> Vec<f64> {
    (0..count)
        .map_while(|index| counter_checkpoint(notification, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::CounterType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_steps() {
        let anchor = date(2024, 1, 1);
        assert_eq!(next_occurrence(anchor, Recurrence::Weekly, 0), Some(anchor));
        assert_eq!(next_occurrence(anchor, Recurrence::Weekly, 1), Some(date(2024, 1, 8)));
        assert_eq!(next_occurrence(anchor, Recurrence::Weekly, 3), Some(date(2024, 1, 22)));
    }

    #[test]
    fn test_bi_monthly_is_two_weeks() {
        let anchor = date(2024, 1, 1);
        assert_eq!(next_occurrence(anchor, Recurrence::BiMonthly, 1), Some(date(2024, 1, 15)));
        assert_eq!(next_occurrence(anchor, Recurrence::BiMonthly, 2), Some(date(2024, 1, 29)));
    }

    #[test]
    fn test_month_based_steps() {
        let anchor = date(2024, 3, 15);
        assert_eq!(next_occurrence(anchor, Recurrence::Monthly, 2), Some(date(2024, 5, 15)));
        assert_eq!(next_occurrence(anchor, Recurrence::Quarterly, 1), Some(date(2024, 6, 15)));
        assert_eq!(next_occurrence(anchor, Recurrence::SemiAnnual, 1), Some(date(2024, 9, 15)));
        assert_eq!(next_occurrence(anchor, Recurrence::Yearly, 2), Some(date(2026, 3, 15)));
    }

    #[test]
    fn test_month_end_clamps_without_drift() {
        let anchor = date(2024, 1, 31);
        assert_eq!(next_occurrence(anchor, Recurrence::Monthly, 1), Some(date(2024, 2, 29)));
        assert_eq!(next_occurrence(anchor, Recurrence::Monthly, 2), Some(date(2024, 3, 31)));
        assert_eq!(next_occurrence(anchor, Recurrence::Monthly, 3), Some(date(2024, 4, 30)));
        assert_eq!(next_occurrence(date(2024, 2, 29), Recurrence::Yearly, 1), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_none_ignores_index() {
        let anchor = date(2024, 6, 1);
        assert_eq!(next_occurrence(anchor, Recurrence::None, 5), Some(anchor));
    }

    #[test]
    fn test_non_recurring_only_matches_anchor() {
        let n = Notification::on_date("n", "Annual", date(2024, 6, 1), Recurrence::None);
        assert!(occurs_on_date(&n, date(2024, 6, 1), DEFAULT_OCCURRENCE_LOOKAHEAD));
        assert!(!occurs_on_date(&n, date(2024, 6, 8), DEFAULT_OCCURRENCE_LOOKAHEAD));
        assert_eq!(occurrence_dates(&n, DEFAULT_OCCURRENCE_LOOKAHEAD), vec![date(2024, 6, 1)]);
    }

    #[test]
    fn test_target_before_anchor_never_matches() {
        let n = Notification::on_date("n", "Weekly", date(2024, 6, 1), Recurrence::Weekly);
        assert!(!occurs_on_date(&n, date(2024, 5, 25), DEFAULT_OCCURRENCE_LOOKAHEAD));
    }

    #[test]
    fn test_counter_notification_never_on_calendar() {
        let n = Notification::on_counter("c", "Prop overhaul", CounterType::prop_total_time, 2000.0);
        assert!(!occurs_on_date(&n, date(2024, 1, 1), DEFAULT_OCCURRENCE_LOOKAHEAD));
    }

    #[test]
    fn test_occurrence_dates_window() {
        let n = Notification::on_date("n", "Weekly", date(2024, 1, 1), Recurrence::Weekly);
        let dates = occurrence_dates(&n, 3);
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15), date(2024, 1, 22)]
        );
    }

    #[test]
    fn test_counter_checkpoints() {
        let mut n = Notification::on_counter("c", "Oil", CounterType::tach, 100.0);
        assert_eq!(counter_checkpoints(&n, 3), vec![100.0]);

        n.counter_interval = Some(50.0);
        assert_eq!(counter_checkpoints(&n, 3), vec![100.0, 150.0, 200.0]);

        n.counter_interval = Some(0.0);
        assert_eq!(counter_checkpoint(&n, 1), None);
    }
}
