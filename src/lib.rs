//! Catalog table snapshots and the structural diff used to detect schema drift.

pub mod catalog;
pub mod diff;
pub mod errors;
pub mod models;

pub use diff::report::{check_all, check_drift, DriftReporter};
pub use diff::{ColumnChange, ColumnDiff, FieldValue, TableChange, TableDiff};
pub use errors::DriftError;
pub use models::column::{Column, ColumnField};
pub use models::conventions::CatalogConventions;
pub use models::table::{Table, TableBuilder, TableField};
