//! Validation helper functions for MCP tool parameters
//!
//! Each helper turns a raw tool argument into a typed value, or an
//! `INVALID_PARAMS` error that names the accepted values.

use crate::schedule::{Basis, CounterType, Recurrence};
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;

fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Parse a date parameter in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        invalid_params(format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
            date_str
        ))
    })
}

/// Parse an optional date parameter; empty strings count as absent
pub fn parse_optional_date(date_str: Option<&str>) -> McpResult<Option<NaiveDate>> {
    match date_str {
        Some(s) if !s.trim().is_empty() => parse_date(s).map(Some),
        _ => Ok(None),
    }
}

pub fn parse_basis(basis_str: &str) -> McpResult<Basis> {
    basis_str.trim().parse().map_err(invalid_params)
}

/// Parse a recurrence label; absent means no recurrence
pub fn parse_recurrence(recurrence_str: Option<&str>) -> McpResult<Recurrence> {
    match recurrence_str {
        Some(s) if !s.trim().is_empty() => s.trim().parse().map_err(invalid_params),
        _ => Ok(Recurrence::None),
    }
}

pub fn parse_counter_type(counter_str: &str) -> McpResult<CounterType> {
    counter_str.trim().parse().map_err(invalid_params)
}

/// Reject negative or non-finite numbers
pub fn check_non_negative(field: &str, value: Option<f64>) -> McpResult<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(invalid_params(format!(
            "Invalid {} '{}'. Must be a non-negative number",
            field, v
        ))),
        _ => Ok(()),
    }
}

/// Reject a negative alert window in days
pub fn check_alert_days(value: Option<i64>) -> McpResult<()> {
    match value {
        Some(days) if days < 0 => Err(invalid_params(format!(
            "Invalid alert_days '{}'. Must not be negative",
            days
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("02/01/2024").is_err());
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some("")).unwrap(), None);
        assert!(parse_optional_date(Some("2024-01-01")).unwrap().is_some());
    }

    #[test]
    fn test_parse_recurrence() {
        assert_eq!(parse_recurrence(None).unwrap(), Recurrence::None);
        assert_eq!(
            parse_recurrence(Some("Semi-Annual")).unwrap(),
            Recurrence::SemiAnnual
        );
        assert!(parse_recurrence(Some("Hourly")).is_err());
    }

    #[test]
    fn test_parse_basis_and_counter() {
        assert_eq!(parse_basis("Counter").unwrap(), Basis::Counter);
        assert!(parse_basis("Mileage").is_err());
        assert_eq!(parse_counter_type("hobbs").unwrap(), CounterType::hobbs);
        assert!(parse_counter_type("odometer").is_err());
    }

    #[test]
    fn test_check_non_negative() {
        assert!(check_non_negative("alert_hours", None).is_ok());
        assert!(check_non_negative("alert_hours", Some(0.0)).is_ok());
        assert!(check_non_negative("alert_hours", Some(-1.0)).is_err());
        assert!(check_non_negative("alert_hours", Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_check_alert_days() {
        assert!(check_alert_days(None).is_ok());
        assert!(check_alert_days(Some(0)).is_ok());
        let err = check_alert_days(Some(-3)).unwrap_err();
        assert!(err.to_string().contains("alert_days"));
    }
}
