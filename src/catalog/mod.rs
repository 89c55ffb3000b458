//! Wire shapes of the catalog service's table detail payload.
//!
//! Only the fields needed to build a [`Table`](crate::models::table::Table)
//! are modelled; everything else in the payload is ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// One `key`/`value` annotation attached to a table or column.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub provider: Option<String>,
}

impl MetadataEntry {
    pub fn new(key: &str, value: &str, provider: Option<&str>) -> Self {
        MetadataEntry {
            key: key.to_string(),
            value: value.to_string(),
            provider: provider.map(str::to_string),
        }
    }
}

/// Value of the first entry with `key`, restricted to `provider` when one is given.
pub fn find_value(entries: &[MetadataEntry], key: &str, provider: Option<&str>) -> Option<String> {
    entries
        .iter()
        .find(|entry| {
            entry.key == key
                && provider.map_or(true, |p| entry.provider.as_deref() == Some(p))
        })
        .map(|entry| entry.value.clone())
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BucketRef {
    pub id: String,
    pub display_name: String,
}

/// Column annotations keyed by column name, in payload order.
pub type ColumnMetadata = IndexMap<String, Vec<MetadataEntry>>;

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TablePayload {
    pub id: String,
    pub display_name: String,
    pub bucket: BucketRef,
    #[serde(default)]
    pub metadata: Option<Vec<MetadataEntry>>,
    #[serde(default, deserialize_with = "row_count")]
    pub rows_count: Option<String>,
    #[serde(default)]
    pub column_metadata: Option<ColumnMetadata>,
    #[serde(default)]
    pub primary_key: Option<Vec<String>>,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub is_typed: Option<bool>,
}

impl TablePayload {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// The service reports row counts either as a number or as a numeric string.
fn row_count<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RowCount {
        Text(String),
        Number(u64),
    }

    Ok(
        Option::<RowCount>::deserialize(deserializer)?.map(|count| match count {
            RowCount::Text(text) => text,
            RowCount::Number(n) => n.to_string(),
        }),
    )
}
