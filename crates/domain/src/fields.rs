//! Raw record access
//!
//! Records arrive from the store as `field name -> JSON value` maps. Cells may
//! hold strings, numbers or nulls; spreadsheet exports also write `"None"` or
//! an empty string for absent values.

use crate::error::{Result, ValidationError};
use crate::types::TokenSet;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

/// Untyped record as delivered by the record store
pub type RawRecord = BTreeMap<String, Value>;

const ABSENT_MARKERS: [&str; 4] = ["none", "null", "nan", "n/a"];

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if text.is_empty() || ABSENT_MARKERS.contains(&text.to_ascii_lowercase().as_str()) {
        None
    } else {
        Some(text)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|item| scalar_text(item).is_some()),
        other => scalar_text(other).is_some(),
    }
}

/// Returns the first of `names` holding a present value, with the name used.
/// Blanks and absent markers fall through to the next alias, as in [`text`].
fn lookup<'a>(record: &'a RawRecord, names: &[&'a str]) -> Option<(&'a str, &'a Value)> {
    names.iter().find_map(|name| {
        record
            .get(*name)
            .filter(|v| is_present(v))
            .map(|v| (*name, v))
    })
}

/// Optional text field; the first alias holding a non-empty value wins.
pub fn text(record: &RawRecord, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| record.get(*name).and_then(scalar_text))
}

/// Required text field, reported under the first alias when missing.
pub fn required_text(record: &RawRecord, names: &[&str]) -> Result<String> {
    text(record, names).ok_or_else(|| ValidationError::missing(names[0]))
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    // Accept a full timestamp by keeping its date prefix.
    let candidate = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d").map_err(|_| {
        ValidationError::new(field, format!("expected YYYY-MM-DD date, got '{}'", raw))
    })
}

pub fn optional_date(record: &RawRecord, names: &[&str]) -> Result<Option<NaiveDate>> {
    for name in names {
        if let Some(raw) = record.get(*name).and_then(scalar_text) {
            return parse_date(name, &raw).map(Some);
        }
    }
    Ok(None)
}

pub fn required_date(record: &RawRecord, names: &[&str]) -> Result<NaiveDate> {
    optional_date(record, names)?.ok_or_else(|| ValidationError::missing(names[0]))
}

/// Optional numeric field. Numbers and numeric strings are both accepted.
pub fn optional_number(record: &RawRecord, names: &[&str]) -> Result<Option<f64>> {
    let Some((name, value)) = lookup(record, names) else {
        return Ok(None);
    };

    if let Some(n) = value.as_f64() {
        return Ok(Some(n));
    }

    match scalar_text(value) {
        None => Ok(None),
        Some(raw) => raw
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ValidationError::new(name, format!("expected a number, got '{}'", raw))),
    }
}

/// Comma-delimited string or JSON array of strings, normalised into a set.
pub fn tokens(record: &RawRecord, names: &[&str]) -> TokenSet {
    match lookup(record, names) {
        Some((_, Value::Array(items))) => items.iter().filter_map(scalar_text).collect(),
        Some((_, value)) => scalar_text(value)
            .map(|raw| TokenSet::parse(&raw))
            .unwrap_or_default(),
        None => TokenSet::default(),
    }
}

/// Collapses case, spaces, underscores and hyphens so that `"On Leave"`,
/// `"on_leave"` and `"OnLeave"` compare equal.
pub fn vocabulary_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Builds a raw row in the store format; the inverse of the readers above.
#[derive(Debug, Default)]
pub struct RowBuilder(RawRecord);

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.0.insert(name.to_string(), Value::String(value.into()));
        self
    }

    /// Absent values are written as JSON null
    pub fn optional_text(mut self, name: &str, value: Option<&str>) -> Self {
        let value = value.map_or(Value::Null, |v| Value::String(v.to_string()));
        self.0.insert(name.to_string(), value);
        self
    }

    pub fn date(self, name: &str, value: NaiveDate) -> Self {
        self.text(name, value.format("%Y-%m-%d").to_string())
    }

    pub fn optional_date(self, name: &str, value: Option<NaiveDate>) -> Self {
        let formatted = value.map(|d| d.format("%Y-%m-%d").to_string());
        self.optional_text(name, formatted.as_deref())
    }

    pub fn number(mut self, name: &str, value: impl Into<serde_json::Number>) -> Self {
        self.0.insert(name.to_string(), Value::Number(value.into()));
        self
    }

    /// Comma-delimited, the way spreadsheets hold token lists
    pub fn tokens(self, name: &str, value: &TokenSet) -> Self {
        self.text(name, value.to_string())
    }

    pub fn finish(self) -> RawRecord {
        self.0
    }
}
