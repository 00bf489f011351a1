//! Dotted-numeric schema versions
//!
//! Versions look like `"1.2"` or `"1.2.3"`. Components compare numerically and
//! a missing trailing component counts as `0`, so `"1.2"` and `"1.2.0"` are equal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Compare two dotted version strings component by component
///
/// A component that does not parse as a non-negative integer is unordered
/// against anything and is skipped. Callers that need a strict total order
/// should validate with [`SchemaVersion::from_str`] first.
///
/// # Examples
/// ```
/// use hangar_mcp::snapshot::compare_versions;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
/// assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<Option<u64>> = a.split('.').map(parse_component).collect();
    let right: Vec<Option<u64>> = b.split('.').map(parse_component).collect();
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(Some(0));
        let r = right.get(i).copied().unwrap_or(Some(0));
        if let (Some(l), Some(r)) = (l, r) {
            match l.cmp(&r) {
                Ordering::Equal => {}
                other => return other,
            }
        }
    }

    Ordering::Equal
}

fn parse_component(component: &str) -> Option<u64> {
    let trimmed = component.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// A validated schema version
///
/// Equality and ordering are numeric, so `"1.2" == "1.2.0"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion(String);

impl SchemaVersion {
    /// The version text as written
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("version must be a non-empty string".to_string());
        }
        if s.split('.').any(|c| parse_component(c).is_none()) {
            return Err(format!(
                "version '{}' must be dot-separated non-negative integers (e.g. '1.2')",
                s
            ));
        }
        Ok(SchemaVersion(s.trim().to_string()))
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaVersion> for String {
    fn from(value: SchemaVersion) -> Self {
        value.0
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq for SchemaVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SchemaVersion {}

impl PartialOrd for SchemaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchemaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(&self.0, &other.0)
    }
}
