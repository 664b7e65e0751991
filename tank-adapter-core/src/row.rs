use crate::Value;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::sync::Arc;

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;
/// Every row returned by a read, in the order produced by the connection.
pub type RowSet = Vec<RowLabeled>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values()[i])
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Serialized as an associative record, column order preserved.
impl Serialize for RowLabeled {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in self.labels.iter().zip(self.values.iter()) {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl From<RowLabeled> for Row {
    fn from(value: RowLabeled) -> Self {
        value.values
    }
}

/// Outcome of a write operation.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    #[serde(rename = "affectedRows")]
    pub rows_affected: u64,
}

impl From<u64> for RowsAffected {
    fn from(rows_affected: u64) -> Self {
        Self { rows_affected }
    }
}

/// What a successful operation produced: the rows of a read or the count of a write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome<'a> {
    Rows(&'a [RowLabeled]),
    Affected(RowsAffected),
}

impl<'a> QueryOutcome<'a> {
    pub fn rows(&self) -> Option<&'a [RowLabeled]> {
        match *self {
            QueryOutcome::Rows(rows) => Some(rows),
            QueryOutcome::Affected(..) => None,
        }
    }
    pub fn rows_affected(&self) -> Option<u64> {
        match self {
            QueryOutcome::Rows(..) => None,
            QueryOutcome::Affected(v) => Some(v.rows_affected),
        }
    }
}

impl<'a> From<&'a RowSet> for QueryOutcome<'a> {
    fn from(value: &'a RowSet) -> Self {
        QueryOutcome::Rows(value)
    }
}

impl From<u64> for QueryOutcome<'_> {
    fn from(value: u64) -> Self {
        QueryOutcome::Affected(value.into())
    }
}
