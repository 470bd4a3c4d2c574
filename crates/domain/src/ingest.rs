//! Batch ingest with partial results
//!
//! A malformed row never aborts a batch. It is excluded, logged and returned
//! in the rejection list so the caller can surface it.

use crate::error::ValidationError;
use crate::fields::RawRecord;
use crate::records::{Drone, FromRecord, Mission, Pilot};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A raw row excluded from a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Record kind (`pilot`, `drone`, `mission`)
    pub kind: String,
    /// Zero-based position in the input batch
    pub row: usize,
    /// Record id, when one could be read
    pub record_id: Option<String>,
    /// What was wrong with the row
    pub error: ValidationError,
}

/// Parsed records plus the rows that were excluded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingest<T> {
    pub records: Vec<T>,
    pub rejected: Vec<Rejection>,
}

impl<T> Ingest<T> {
    /// Check if every row was accepted
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Parse a batch of rows. Duplicate ids keep the first occurrence.
pub fn ingest<T: FromRecord>(rows: &[RawRecord]) -> Ingest<T> {
    let mut records: Vec<T> = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for (row, raw) in rows.iter().enumerate() {
        let outcome = T::from_record(raw).and_then(|record| {
            if seen.insert(record.record_id().to_string()) {
                Ok(record)
            } else {
                Err(ValidationError::new(
                    "id",
                    format!("duplicate id '{}'", record.record_id()),
                ))
            }
        });

        match outcome {
            Ok(record) => records.push(record),
            Err(error) => {
                let record_id = T::raw_id(raw);
                warn!(
                    kind = T::KIND,
                    row,
                    record_id = record_id.as_deref().unwrap_or("?"),
                    field = %error.field,
                    reason = %error.reason,
                    "rejected record"
                );
                rejected.push(Rejection {
                    kind: T::KIND.to_string(),
                    row,
                    record_id,
                    error,
                });
            }
        }
    }

    debug!(
        kind = T::KIND,
        accepted = records.len(),
        rejected = rejected.len(),
        "ingest finished"
    );

    Ingest { records, rejected }
}

pub fn ingest_pilots(rows: &[RawRecord]) -> Ingest<Pilot> {
    ingest(rows)
}

pub fn ingest_drones(rows: &[RawRecord]) -> Ingest<Drone> {
    ingest(rows)
}

pub fn ingest_missions(rows: &[RawRecord]) -> Ingest<Mission> {
    ingest(rows)
}
