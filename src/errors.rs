use thiserror::Error;

/// Error type for building entities and reporting drift.
#[derive(Error, Debug)]
pub enum DriftError {
    /// The catalog payload could not be decoded.
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),
    /// Conventions file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
    /// A table was given two columns with the same name.
    #[error("Duplicate column `{column}` in table `{table}`")]
    DuplicateColumn { table: String, column: String },
    /// A downstream reporter rejected a diff.
    #[error("Report error: {0}")]
    Report(String),
}
