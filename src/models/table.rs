use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

use crate::{
    catalog::{find_value, TablePayload},
    diff::{ColumnChange, ColumnChanges, FieldValue, TableChange, TableDiff},
    errors::DriftError,
    models::{column::Column, conventions::CatalogConventions},
};

/// Attributes of a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableField {
    Id,
    Name,
    Schema,
    SchemaId,
    Description,
    RowCount,
    NativeTypes,
    Columns,
}

impl TableField {
    pub const ALL: [TableField; 8] = [
        TableField::Id,
        TableField::Name,
        TableField::Schema,
        TableField::SchemaId,
        TableField::Description,
        TableField::RowCount,
        TableField::NativeTypes,
        TableField::Columns,
    ];

    /// Attributes that take part in equality and diffing. The rest is payload
    /// carried alongside the table.
    pub const COMPARED: [TableField; 4] = [
        TableField::Name,
        TableField::Schema,
        TableField::Description,
        TableField::Columns,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TableField::Id => "id",
            TableField::Name => "name",
            TableField::Schema => "schema",
            TableField::SchemaId => "schema_id",
            TableField::Description => "description",
            TableField::RowCount => "row_cnt",
            TableField::NativeTypes => "native_types",
            TableField::Columns => "columns",
        }
    }

    pub fn is_compared(self) -> bool {
        TableField::COMPARED.contains(&self)
    }
}

/// Snapshot of a catalog table. Immutable once built.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Table {
    id: Option<String>,
    name: String,
    schema: Option<String>,
    schema_id: String,
    description: Option<String>,
    row_cnt: Option<String>,
    native_types: Option<bool>,
    columns: Vec<Column>,
}

#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    id: Option<String>,
    name: String,
    schema: Option<String>,
    schema_id: String,
    description: Option<String>,
    row_cnt: Option<String>,
    native_types: Option<bool>,
    columns: Vec<Column>,
}

impl TableBuilder {
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.to_string());
        self
    }

    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_string);
        self
    }

    pub fn row_cnt(mut self, row_cnt: Option<&str>) -> Self {
        self.row_cnt = row_cnt.map(str::to_string);
        self
    }

    pub fn native_types(mut self, native_types: Option<bool>) -> Self {
        self.native_types = native_types;
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Fails if two columns share a name.
    pub fn build(self) -> Result<Table, DriftError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name()) {
                return Err(DriftError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name().to_string(),
                });
            }
        }

        Ok(Table {
            id: self.id,
            name: self.name,
            schema: self.schema,
            schema_id: self.schema_id,
            description: self.description,
            row_cnt: self.row_cnt,
            native_types: self.native_types,
            columns: self.columns,
        })
    }
}

impl Table {
    pub fn builder(name: &str, schema_id: &str) -> TableBuilder {
        TableBuilder {
            name: name.to_string(),
            schema_id: schema_id.to_string(),
            ..TableBuilder::default()
        }
    }

    /// A desired table that does not exist in the catalog yet.
    pub fn new_table(name: &str, schema_id: &str, columns: Vec<Column>) -> Result<Table, DriftError> {
        Table::builder(name, schema_id).columns(columns).build()
    }

    pub fn from_catalog(
        payload: &TablePayload,
        conventions: &CatalogConventions,
    ) -> Result<Table, DriftError> {
        let description = payload
            .metadata
            .as_deref()
            .and_then(|entries| find_value(entries, &conventions.description_key, None));
        let primary_keys = payload.primary_key.as_deref().unwrap_or_default();
        let columns = Column::from_catalog(
            payload.column_metadata.as_ref(),
            primary_keys,
            payload.columns.as_deref(),
            conventions,
        );

        debug!(
            "mapped catalog table {} with {} columns",
            payload.id,
            columns.len()
        );

        Table::builder(&payload.display_name, &payload.bucket.id)
            .id(&payload.id)
            .schema(&payload.bucket.display_name)
            .description(description.as_deref())
            .row_cnt(payload.rows_count.as_deref())
            .native_types(payload.is_typed)
            .columns(columns)
            .build()
    }

    pub fn from_catalog_json(raw: &str, conventions: &CatalogConventions) -> Result<Table, DriftError> {
        let payload = TablePayload::from_json_str(raw)?;
        Table::from_catalog(&payload, conventions)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn row_cnt(&self) -> Option<&str> {
        self.row_cnt.as_deref()
    }

    pub fn native_types(&self) -> Option<bool> {
        self.native_types
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// Primary key columns in declared order.
    pub fn primary_keys(&self) -> Vec<&Column> {
        self.columns.iter().filter(|column| column.is_primary()).collect()
    }

    pub fn primary_key_names(&self) -> Vec<&str> {
        self.primary_keys().into_iter().map(Column::name).collect()
    }

    /// Value of a scalar attribute; `None` for the column list.
    pub fn field_value(&self, field: TableField) -> Option<FieldValue> {
        let value = match field {
            TableField::Id => FieldValue::from(self.id()),
            TableField::Name => FieldValue::from(self.name()),
            TableField::Schema => FieldValue::from(self.schema()),
            TableField::SchemaId => FieldValue::from(self.schema_id()),
            TableField::Description => FieldValue::from(self.description()),
            TableField::RowCount => FieldValue::from(self.row_cnt()),
            TableField::NativeTypes => self.native_types.map_or(FieldValue::Absent, FieldValue::from),
            TableField::Columns => return None,
        };
        Some(value)
    }

    /// Structural difference between `self` (left) and `other` (right).
    ///
    /// Scalar attributes are reported as `(left, right)` pairs. Columns are
    /// matched by name, so reordering alone is not drift; when the lists hold
    /// different content the `columns` entry carries one [`ColumnChange`] per
    /// affected column name.
    pub fn diff(&self, other: &Table) -> TableDiff {
        let mut diff = TableDiff::default();
        for field in TableField::COMPARED {
            if field == TableField::Columns {
                if self.columns == other.columns {
                    continue;
                }
                let changes = diff_columns(&self.columns, &other.columns);
                if changes.is_empty() {
                    debug!("columns of {} differ only in order", self.name);
                } else {
                    diff.insert(field.name(), TableChange::Columns(changes));
                }
                continue;
            }

            if let (Some(left), Some(right)) = (self.field_value(field), other.field_value(field)) {
                if left != right {
                    diff.insert(field.name(), TableChange::Changed(left, right));
                }
            }
        }
        diff
    }

    pub fn is_identical(&self, other: &Table) -> bool {
        self.diff(other).is_empty()
    }
}

fn column_lookup(columns: &[Column]) -> IndexMap<&str, &Column> {
    let mut lookup = IndexMap::with_capacity(columns.len());
    for column in columns {
        if lookup.insert(column.name(), column).is_some() {
            warn!("duplicate column {}, keeping the last one", column.name());
        }
    }
    lookup
}

fn diff_columns(left: &[Column], right: &[Column]) -> ColumnChanges {
    let left = column_lookup(left);
    let right = column_lookup(right);

    let mut changes = ColumnChanges::new();
    for (name, column) in &left {
        match right.get(name) {
            Some(other) => {
                let diff = column.diff(other);
                if !diff.is_empty() {
                    changes.insert(name.to_string(), ColumnChange::Changed(diff));
                }
            }
            None => {
                changes.insert(name.to_string(), ColumnChange::LeftOnly);
            }
        }
    }
    for name in right.keys() {
        if !left.contains_key(name) {
            changes.insert(name.to_string(), ColumnChange::RightOnly);
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(columns: Vec<Column>) -> Table {
        Table::builder("orders", "in.c-sales")
            .id("in.c-sales.orders")
            .schema("sales")
            .description(Some("Customer orders"))
            .row_cnt(Some("42"))
            .native_types(Some(true))
            .columns(columns)
            .build()
            .unwrap()
    }

    fn base_columns() -> Vec<Column> {
        vec![
            Column::named("id").with_type("INT").primary(true),
            Column::named("email").with_type("VARCHAR"),
        ]
    }

    #[test]
    fn test_identical_tables_have_no_diff() {
        let table = orders(base_columns());
        assert!(table.diff(&table.clone()).is_empty());
        assert!(table.is_identical(&table));
    }

    #[test]
    fn test_changed_column_type() {
        let left = orders(base_columns());
        let right = orders(vec![
            Column::named("id").with_type("INT").primary(true),
            Column::named("email").with_type("TEXT"),
        ]);

        let diff = left.diff(&right);
        assert_eq!(diff.len(), 1);
        let columns = diff.columns().unwrap();
        assert_eq!(columns.len(), 1);
        match &columns["email"] {
            ColumnChange::Changed(change) => {
                assert_eq!(change.len(), 1);
                assert_eq!(change.get("type"), Some(&("VARCHAR".into(), "TEXT".into())));
            }
            other => panic!("unexpected change {:?}", other),
        }
    }

    #[test]
    fn test_reordered_columns_are_not_drift() {
        let mut reordered = base_columns();
        reordered.reverse();

        let diff = orders(base_columns()).diff(&orders(reordered));
        assert!(diff.is_empty());
        assert!(!diff.contains("columns"));
    }

    #[test]
    fn test_membership_markers() {
        let left = orders(base_columns());
        let right = orders(vec![
            Column::named("id").with_type("INT").primary(true),
            Column::named("created_at").with_type("TIMESTAMP"),
        ]);

        let diff = left.diff(&right);
        let columns = diff.columns().unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns["email"], ColumnChange::LeftOnly);
        assert_eq!(columns["created_at"], ColumnChange::RightOnly);
    }

    #[test]
    fn test_non_compared_fields_are_ignored() {
        let left = orders(base_columns());
        let right = Table::builder("orders", "out.c-other")
            .id("out.c-other.orders")
            .schema("sales")
            .description(Some("Customer orders"))
            .row_cnt(Some("9000"))
            .native_types(Some(false))
            .columns(base_columns())
            .build()
            .unwrap();

        assert!(left.diff(&right).is_empty());
    }

    #[test]
    fn test_scalar_change_is_single_entry() {
        let left = orders(base_columns());
        let right = Table::builder("orders", "in.c-sales")
            .id("in.c-sales.orders")
            .schema("sales")
            .columns(base_columns())
            .build()
            .unwrap();

        let diff = left.diff(&right);
        assert_eq!(diff.len(), 1);
        assert_eq!(
            diff.get("description"),
            Some(&TableChange::Changed("Customer orders".into(), FieldValue::Absent))
        );
    }

    #[test]
    fn test_diff_is_symmetric_in_detection() {
        let left = orders(base_columns());
        let right = Table::new_table(
            "orders_v2",
            "in.c-sales",
            vec![
                Column::named("id").with_type("BIGINT").primary(true),
                Column::named("status"),
            ],
        )
        .unwrap();

        let forward = left.diff(&right);
        let backward = right.diff(&left);
        let forward_fields: Vec<_> = forward.fields().collect();
        let backward_fields: Vec<_> = backward.fields().collect();
        assert_eq!(forward_fields, backward_fields);
        assert_eq!(forward.reversed().get("name"), backward.get("name"));
        assert_eq!(forward.reversed().get("schema"), backward.get("schema"));
        assert_eq!(
            forward.reversed().columns().unwrap()["email"],
            backward.columns().unwrap()["email"]
        );
    }

    #[test]
    fn test_primary_keys_keep_declared_order() {
        let table = Table::new_table(
            "codes",
            "in.c-ref",
            vec![
                Column::named("id").primary(true),
                Column::named("name"),
                Column::named("code").primary(true),
            ],
        )
        .unwrap();

        assert_eq!(table.primary_key_names(), vec!["id", "code"]);
        assert_eq!(table.primary_keys()[1].name(), "code");
    }

    #[test]
    fn test_new_table_leaves_catalog_fields_absent() {
        let table = Table::new_table("orders", "in.c-sales", base_columns()).unwrap();
        assert_eq!(table.id(), None);
        assert_eq!(table.schema(), None);
        assert_eq!(table.description(), None);
        assert_eq!(table.row_cnt(), None);
        assert_eq!(table.native_types(), None);
        assert_eq!(table.schema_id(), "in.c-sales");
    }

    #[test]
    fn test_duplicate_column_names_are_rejected() {
        let err = Table::new_table(
            "orders",
            "in.c-sales",
            vec![Column::named("id"), Column::named("id").with_type("INT")],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DriftError::DuplicateColumn { ref table, ref column } if table == "orders" && column == "id"
        ));
    }

    #[test]
    fn test_duplicate_lookup_keeps_last_occurrence() {
        let left = vec![Column::named("id"), Column::named("id").with_type("INT")];
        let right = vec![Column::named("id").with_type("INT")];
        assert!(diff_columns(&left, &right).is_empty());
    }

    #[test]
    fn test_compared_fields() {
        let compared: Vec<&str> = TableField::ALL
            .iter()
            .filter(|f| f.is_compared())
            .map(|f| f.name())
            .collect();
        assert_eq!(compared, vec!["name", "schema", "description", "columns"]);
        assert_eq!(orders(vec![]).field_value(TableField::Columns), None);
    }
}
