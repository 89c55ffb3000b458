use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::DriftError;

/// Metadata keys the catalog uses to describe columns and tables.
///
/// Any field left out of a conventions file falls back to the catalog's
/// stock markers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConventions {
    pub base_type_key: String,
    pub length_key: String,
    /// Provider that must own the base type and length entries.
    pub datatype_provider: String,
    /// Matched regardless of provider.
    pub description_key: String,
}

impl Default for CatalogConventions {
    fn default() -> Self {
        CatalogConventions {
            base_type_key: "KBC.datatype.basetype".to_string(),
            length_key: "KBC.datatype.length".to_string(),
            datatype_provider: "storage".to_string(),
            description_key: "KBC.description".to_string(),
        }
    }
}

impl CatalogConventions {
    pub fn from_json_str(raw: &str) -> Result<Self, DriftError> {
        serde_json::from_str(raw).map_err(|e| DriftError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DriftError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| DriftError::Config(format!("{}: {}", path.display(), e)))?;
        log::debug!("loaded catalog conventions from {}", path.display());
        Self::from_json_str(&raw)
    }
}
