//! Running tallies and error entries for a single CSV import.

use std::fmt;

use serde::{Serialize, Serializer};

use super::row::{RawRow, RowRejection, RowValidation};
use crate::car::CreateCar;

/// Row marker used for failures raised by the record store rather than by
/// row validation.
pub const DATABASE_INSERT_MARKER: &str = "Database Insert";

/// Number of error entries echoed back in the HTTP response. The full list
/// only lives in the persisted log.
pub const MAX_RESPONSE_ERRORS: usize = 10;

/// Identifies where an error entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMarker {
    /// A validation failure on the given 1-based data row.
    Row(u64),
    /// An insertion failure reported by the record store.
    DatabaseInsert,
}

impl fmt::Display for RowMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowMarker::Row(n) => write!(f, "{n}"),
            RowMarker::DatabaseInsert => f.write_str(DATABASE_INSERT_MARKER),
        }
    }
}

impl Serialize for RowMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowMarker::Row(n) => serializer.serialize_u64(*n),
            RowMarker::DatabaseInsert => serializer.serialize_str(DATABASE_INSERT_MARKER),
        }
    }
}

/// The data attached to an error entry: raw cells for validation failures,
/// the normalized record for store failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorData {
    Raw(RawRow),
    Record(CreateCar),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportErrorEntry {
    pub row_number: RowMarker,
    pub data: ErrorData,
    pub errors: Vec<String>,
}

/// Aggregate counts reported to the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_rows: u64,
    pub valid_rows: u64,
    pub invalid_rows: u64,
    pub inserted_rows: u64,
}

/// Accumulated outcome of one import.
///
/// Counters only move through the methods below, which keep
/// `valid + invalid == total` and `inserted <= valid` at every step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportResult {
    summary: ImportSummary,
    errors: Vec<ImportErrorEntry>,
}

impl ImportResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one validated row into the tallies.
    ///
    /// Returns the record when the row is valid so the caller can queue it
    /// for insertion; invalid rows are recorded immediately.
    pub fn record_row(&mut self, validation: RowValidation) -> Option<CreateCar> {
        self.summary.total_rows += 1;
        match validation {
            RowValidation::Valid(record) => {
                self.summary.valid_rows += 1;
                Some(record)
            }
            RowValidation::Invalid(rejection) => {
                self.record_rejection(rejection);
                None
            }
        }
    }

    fn record_rejection(&mut self, rejection: RowRejection) {
        let RowRejection {
            row_number,
            errors,
            raw,
        } = rejection;
        self.summary.invalid_rows += 1;
        self.errors.push(ImportErrorEntry {
            row_number: RowMarker::Row(row_number),
            data: ErrorData::Raw(raw),
            errors,
        });
    }

    /// Count a successful store insert.
    pub fn record_inserted(&mut self) {
        debug_assert!(self.summary.inserted_rows < self.summary.valid_rows);
        self.summary.inserted_rows += 1;
    }

    /// Reclassify a previously valid record as invalid after the store
    /// refused it.
    pub fn demote(&mut self, record: CreateCar, message: String) {
        self.summary.valid_rows = self.summary.valid_rows.saturating_sub(1);
        self.summary.invalid_rows += 1;
        self.errors.push(ImportErrorEntry {
            row_number: RowMarker::DatabaseInsert,
            data: ErrorData::Record(record),
            errors: vec![message],
        });
    }

    pub fn summary(&self) -> ImportSummary {
        self.summary
    }

    pub fn total_rows(&self) -> u64 {
        self.summary.total_rows
    }

    pub fn valid_rows(&self) -> u64 {
        self.summary.valid_rows
    }

    pub fn invalid_rows(&self) -> u64 {
        self.summary.invalid_rows
    }

    pub fn inserted_rows(&self) -> u64 {
        self.summary.inserted_rows
    }

    /// Every error entry, in the order it was recorded.
    pub fn errors(&self) -> &[ImportErrorEntry] {
        &self.errors
    }

    /// The leading error entries returned in the HTTP response.
    pub fn response_errors(&self) -> &[ImportErrorEntry] {
        &self.errors[..self.errors.len().min(MAX_RESPONSE_ERRORS)]
    }
}
