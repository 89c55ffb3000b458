//! Structural diff results.
//!
//! A diff maps attribute names to `(left, right)` pairs. An empty diff means the
//! two entities are identical under their comparison rules. The `columns` entry
//! of a [`TableDiff`] carries a per-column breakdown instead of a flat pair.
//!
//! Serialized with serde, a table diff looks like:
//!
//! ```text
//! {
//!   "description": ["old", null],
//!   "columns": {
//!     "email": {"type": ["VARCHAR", "TEXT"]},
//!     "legacy_id": "left only"
//!   }
//! }
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::errors::DriftError;

pub mod report;

pub const LEFT_ONLY: &str = "left only";
pub const RIGHT_ONLY: &str = "right only";

/// A single attribute value as seen by the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Absent,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::from)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{:?}", text),
            FieldValue::Flag(flag) => write!(f, "{}", flag),
            FieldValue::Absent => write!(f, "(absent)"),
        }
    }
}

pub type FieldPair = (FieldValue, FieldValue);

/// Differing attributes of two columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnDiff {
    fields: IndexMap<&'static str, FieldPair>,
}

impl ColumnDiff {
    pub(crate) fn insert(&mut self, field: &'static str, left: FieldValue, right: FieldValue) {
        self.fields.insert(field, (left, right));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldPair> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldPair)> {
        self.fields.iter().map(|(field, pair)| (*field, pair))
    }

    /// Same diff with left and right swapped.
    pub fn reversed(&self) -> ColumnDiff {
        ColumnDiff {
            fields: self
                .fields
                .iter()
                .map(|(field, (left, right))| (*field, (right.clone(), left.clone())))
                .collect(),
        }
    }
}

/// How one column name differs between two tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnChange {
    Changed(ColumnDiff),
    LeftOnly,
    RightOnly,
}

impl ColumnChange {
    pub fn reversed(&self) -> ColumnChange {
        match self {
            ColumnChange::Changed(diff) => ColumnChange::Changed(diff.reversed()),
            ColumnChange::LeftOnly => ColumnChange::RightOnly,
            ColumnChange::RightOnly => ColumnChange::LeftOnly,
        }
    }
}

impl Serialize for ColumnChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ColumnChange::Changed(diff) => diff.serialize(serializer),
            ColumnChange::LeftOnly => serializer.serialize_str(LEFT_ONLY),
            ColumnChange::RightOnly => serializer.serialize_str(RIGHT_ONLY),
        }
    }
}

pub type ColumnChanges = IndexMap<String, ColumnChange>;

/// One entry of a [`TableDiff`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TableChange {
    Changed(FieldValue, FieldValue),
    Columns(ColumnChanges),
}

impl TableChange {
    pub fn reversed(&self) -> TableChange {
        match self {
            TableChange::Changed(left, right) => TableChange::Changed(right.clone(), left.clone()),
            TableChange::Columns(columns) => TableChange::Columns(
                columns
                    .iter()
                    .map(|(name, change)| (name.clone(), change.reversed()))
                    .collect(),
            ),
        }
    }
}

/// Differing attributes of two tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TableDiff {
    changes: IndexMap<&'static str, TableChange>,
}

impl TableDiff {
    pub(crate) fn insert(&mut self, field: &'static str, change: TableChange) {
        self.changes.insert(field, change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, field: &str) -> Option<&TableChange> {
        self.changes.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.changes.contains_key(field)
    }

    /// Per-column breakdown, present only when column content or membership differs.
    pub fn columns(&self) -> Option<&ColumnChanges> {
        match self.changes.get("columns") {
            Some(TableChange::Columns(columns)) => Some(columns),
            _ => None,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.changes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TableChange)> {
        self.changes.iter().map(|(field, change)| (*field, change))
    }

    /// Same diff with left and right swapped at every level.
    pub fn reversed(&self) -> TableDiff {
        TableDiff {
            changes: self
                .changes
                .iter()
                .map(|(field, change)| (*field, change.reversed()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, DriftError> {
        Ok(serde_json::to_value(self)?)
    }
}
