//! Session-scoped prediction history.
//!
//! The [`HistoryLedger`] keeps successful predictions newest-first and hands
//! out ids from a monotonic counter that survives [`HistoryLedger::clear`].
//! Records serialize to CSV with [`to_table`].

use crate::error::{Result, TasadorError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// A single cell of a prediction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Whole number, rendered without a decimal point.
    Integer(i64),
    /// Real number, rendered with at least one decimal (`250000.0`).
    Float(f64),
    /// Free text, such as a categorical label.
    Text(String),
}

impl FieldValue {
    /// Numeric form input: whole values become integers.
    #[must_use]
    pub fn from_input(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Self::Integer(value as i64)
        } else {
            Self::Float(value)
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A prediction that has not yet been given an id.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRecord {
    fields: Vec<(String, FieldValue)>,
    prediction: f64,
}

impl PendingRecord {
    /// Creates a pending record for a predicted price.
    #[must_use]
    pub fn new(prediction: f64) -> Self {
        Self {
            fields: Vec::new(),
            prediction,
        }
    }

    /// Appends an input column; insertion order is preserved on export.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }
}

/// An immutable entry in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    id: u64,
    fields: Vec<(String, FieldValue)>,
    prediction: f64,
}

impl PredictionRecord {
    /// Unique id, also the record's insertion rank.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Predicted price.
    #[must_use]
    pub fn prediction(&self) -> f64 {
        self.prediction
    }

    /// Input columns in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// All columns in export order: inputs, then `prediction`, then `id`.
    #[must_use]
    pub fn columns(&self) -> Vec<(&str, FieldValue)> {
        let mut columns: Vec<(&str, FieldValue)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        columns.push(("prediction", FieldValue::Float(self.prediction)));
        columns.push(("id", FieldValue::Integer(self.id as i64)));
        columns
    }

    /// Value of column `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<FieldValue> {
        match key {
            "prediction" => Some(FieldValue::Float(self.prediction)),
            "id" => Some(FieldValue::Integer(self.id as i64)),
            _ => self
                .fields
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
        }
    }
}

/// Inclusive price bounds for history queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// Lower bound, default 0.
    pub min: f64,
    /// Upper bound, default unbounded.
    pub max: f64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

impl PriceRange {
    /// Creates a range, filling missing bounds with the defaults.
    #[must_use]
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        let default = Self::default();
        Self {
            min: min.unwrap_or(default.min),
            max: max.unwrap_or(default.max),
        }
    }

    /// Returns true if `price` lies within the bounds.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

/// Append-only, newest-first log of one session's predictions.
///
/// # Examples
///
/// ```
/// use tasador::history::{HistoryLedger, PendingRecord, PriceRange};
///
/// let mut ledger = HistoryLedger::new();
/// ledger.append(PendingRecord::new(250_000.0).with_field("area", 1200));
/// let latest = ledger.append(PendingRecord::new(180_000.5).with_field("area", 900));
///
/// assert_eq!(latest.id(), 2);
/// let all = ledger.filter(PriceRange::default());
/// assert_eq!(all[0].id(), 2);
///
/// ledger.clear();
/// assert_eq!(ledger.append(PendingRecord::new(1.0)).id(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    records: VecDeque<PredictionRecord>,
    next_id: u64,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLedger {
    /// Creates an empty ledger whose first id will be 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Assigns the next id and inserts the record at the head.
    pub fn append(&mut self, pending: PendingRecord) -> PredictionRecord {
        let record = PredictionRecord {
            id: self.next_id,
            fields: pending.fields,
            prediction: pending.prediction,
        };
        self.next_id += 1;
        self.records.push_front(record.clone());
        record
    }

    /// Records with a prediction inside `range`, newest-first.
    #[must_use]
    pub fn filter(&self, range: PriceRange) -> Vec<&PredictionRecord> {
        self.records
            .iter()
            .filter(|r| range.contains(r.prediction))
            .collect()
    }

    /// Removes every record. Issued ids are never reissued.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// CSV of the records inside `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if CSV serialization fails.
    pub fn export(&self, range: PriceRange) -> Result<String> {
        to_table(&self.filter(range))
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the ledger holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record.
    #[must_use]
    pub fn latest(&self) -> Option<&PredictionRecord> {
        self.records.front()
    }

    /// Id the next append will receive.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Records newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &PredictionRecord> + '_ {
        self.records.iter()
    }
}

/// Serializes records as CSV: a header of the first record's keys, then one
/// row per record aligned to that header.
///
/// Keys missing from a later record render as empty cells. Values containing
/// delimiters, quotes or newlines are quoted. No records yields an empty
/// string.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
///
/// # Examples
///
/// ```
/// use tasador::history::{to_table, HistoryLedger, PendingRecord};
///
/// let mut ledger = HistoryLedger::new();
/// let a = ledger.append(PendingRecord::new(250_000.0).with_field("area", 1200));
/// let b = ledger.append(PendingRecord::new(180_000.5).with_field("area", 900));
///
/// let csv = to_table(&[&a, &b]).unwrap();
/// assert_eq!(csv, "area,prediction,id\n1200,250000.0,1\n900,180000.5,2\n");
/// ```
pub fn to_table(records: &[&PredictionRecord]) -> Result<String> {
    let Some(first) = records.first() else {
        return Ok(String::new());
    };
    let header: Vec<&str> = first.columns().into_iter().map(|(k, _)| k).collect();

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&header)?;
    for record in records {
        let row: Vec<String> = header
            .iter()
            .map(|key| record.get(key).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TasadorError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TasadorError::Serialization(e.to_string()))
}
