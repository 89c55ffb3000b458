use serde::{Deserialize, Serialize};

use crate::{
    catalog::{find_value, ColumnMetadata},
    diff::{ColumnDiff, FieldValue},
    models::conventions::CatalogConventions,
};

/// Attributes of a [`Column`] known to the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnField {
    Name,
    Type,
    Length,
    Description,
    Primary,
}

impl ColumnField {
    /// Every column attribute takes part in equality and diffing.
    pub const COMPARED: [ColumnField; 5] = [
        ColumnField::Name,
        ColumnField::Type,
        ColumnField::Length,
        ColumnField::Description,
        ColumnField::Primary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColumnField::Name => "name",
            ColumnField::Type => "type",
            ColumnField::Length => "length",
            ColumnField::Description => "description",
            ColumnField::Primary => "primary",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    #[serde(rename = "type", default)]
    data_type: Option<String>,
    #[serde(default)]
    length: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    primary: bool,
}

impl Column {
    pub fn new(
        name: &str,
        data_type: Option<&str>,
        length: Option<&str>,
        description: Option<&str>,
        primary: bool,
    ) -> Self {
        Column {
            name: name.to_string(),
            data_type: data_type.map(str::to_string),
            length: length.map(str::to_string),
            description: description.map(str::to_string),
            primary,
        }
    }

    /// Column with only a name; every other attribute absent.
    pub fn named(name: &str) -> Self {
        Column::new(name, None, None, None, false)
    }

    pub fn with_type(self, data_type: &str) -> Self {
        Column {
            data_type: Some(data_type.to_string()),
            ..self
        }
    }

    pub fn with_length(self, length: &str) -> Self {
        Column {
            length: Some(length.to_string()),
            ..self
        }
    }

    pub fn with_description(self, description: &str) -> Self {
        Column {
            description: Some(description.to_string()),
            ..self
        }
    }

    pub fn primary(self, primary: bool) -> Self {
        Column { primary, ..self }
    }

    /// Columns described by catalog metadata, one per metadata key.
    pub fn from_metadata(
        metadata: &ColumnMetadata,
        primary_keys: &[String],
        conventions: &CatalogConventions,
    ) -> Vec<Column> {
        let provider = Some(conventions.datatype_provider.as_str());
        metadata
            .iter()
            .map(|(name, entries)| Column {
                name: name.clone(),
                data_type: find_value(entries, &conventions.base_type_key, provider),
                length: find_value(entries, &conventions.length_key, provider),
                description: find_value(entries, &conventions.description_key, None),
                primary: primary_keys.contains(name),
            })
            .collect()
    }

    /// Bare columns for tables the catalog holds no column metadata for.
    pub fn from_names(names: &[String], primary_keys: &[String]) -> Vec<Column> {
        names
            .iter()
            .map(|name| Column::named(name).primary(primary_keys.contains(name)))
            .collect()
    }

    /// Prefers rich metadata and falls back to plain names.
    pub fn from_catalog(
        metadata: Option<&ColumnMetadata>,
        primary_keys: &[String],
        names: Option<&[String]>,
        conventions: &CatalogConventions,
    ) -> Vec<Column> {
        match (metadata, names) {
            (Some(metadata), _) if !metadata.is_empty() => {
                Column::from_metadata(metadata, primary_keys, conventions)
            }
            (_, Some(names)) => Column::from_names(names, primary_keys),
            _ => Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref()
    }

    pub fn length(&self) -> Option<&str> {
        self.length.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn field_value(&self, field: ColumnField) -> FieldValue {
        match field {
            ColumnField::Name => FieldValue::from(self.name.as_str()),
            ColumnField::Type => FieldValue::from(self.data_type()),
            ColumnField::Length => FieldValue::from(self.length()),
            ColumnField::Description => FieldValue::from(self.description()),
            ColumnField::Primary => FieldValue::from(self.primary),
        }
    }

    /// Attributes whose values differ, as `(self, other)` pairs.
    pub fn diff(&self, other: &Column) -> ColumnDiff {
        let mut diff = ColumnDiff::default();
        for field in ColumnField::COMPARED {
            let left = self.field_value(field);
            let right = other.field_value(field);
            if left != right {
                diff.insert(field.name(), left, right);
            }
        }
        diff
    }
}
