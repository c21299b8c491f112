//! Record shape descriptors.
//!
//! A [`Shape`] names the table a record type is written to and describes its
//! fields as a tree: plain columns, some flagged as primary key, and embedded
//! sub-structures whose fields are stored as columns of the same table. The
//! tree is flattened once, when the shape is built, into the ordered column
//! list that records report their values in.

use std::collections::HashSet;
use std::fmt;

use crate::error_handling::BatchSaveError;

/// One field of a record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    kind: FieldKind,
}

/// What a field holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A stored column.
    Column { primary_key: bool },
    /// A nested sub-structure. Its columns are stored in the same table,
    /// named with `prefix` prepended.
    Embedded { prefix: String, fields: Vec<Field> },
}

impl Field {
    /// A plain column.
    pub fn column(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Column { primary_key: false },
        }
    }

    /// A column that is part of the record's identity.
    pub fn primary_key(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Column { primary_key: true },
        }
    }

    /// An embedded sub-structure whose columns keep their own names.
    pub fn embedded(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::embedded_with_prefix(name, "", fields)
    }

    /// An embedded sub-structure whose column names get `prefix` prepended.
    pub fn embedded_with_prefix(
        name: impl Into<String>,
        prefix: impl Into<String>,
        fields: Vec<Field>,
    ) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Embedded {
                prefix: prefix.into(),
                fields,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

/// A flattened, stored column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub primary_key: bool,
}

/// Describes one record type: its table, field tree and flattened columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    table: String,
    fields: Vec<Field>,
    columns: Vec<Column>,
    identity: Vec<usize>,
}

impl Shape {
    /// Builds a shape, flattening embedded fields depth-first.
    ///
    /// # Errors
    ///
    /// Returns `BatchSaveError::InvalidShape` if the table name is empty, no
    /// column exists anywhere in the tree, a column name is empty, or two
    /// columns flatten to the same name.
    pub fn new(table: impl Into<String>, fields: Vec<Field>) -> Result<Self, BatchSaveError> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(BatchSaveError::InvalidShape(
                "table name is empty".to_string(),
            ));
        }

        let mut columns = Vec::new();
        flatten("", &fields, &mut columns);
        if columns.is_empty() {
            return Err(BatchSaveError::InvalidShape(format!(
                "table {} has no columns",
                table
            )));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.name.is_empty() {
                return Err(BatchSaveError::InvalidShape(format!(
                    "table {} has a column with an empty name",
                    table
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(BatchSaveError::InvalidShape(format!(
                    "table {} has duplicate column {}",
                    table, column.name
                )));
            }
        }

        let identity = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.primary_key)
            .map(|(i, _)| i)
            .collect();

        Ok(Shape {
            table,
            fields,
            columns,
            identity,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Stored columns in the order records report their values.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Positions in [`Shape::columns`] of the identity columns.
    pub fn identity_positions(&self) -> &[usize] {
        &self.identity
    }

    /// True when any column, at any nesting depth, is flagged primary key.
    pub fn has_identity(&self) -> bool {
        !self.identity.is_empty()
    }

    pub fn identity_columns(&self) -> impl Iterator<Item = &Column> {
        self.identity.iter().map(|&i| &self.columns[i])
    }
}

fn flatten(prefix: &str, fields: &[Field], out: &mut Vec<Column>) {
    for field in fields {
        match &field.kind {
            FieldKind::Column { primary_key } => out.push(Column {
                name: format!("{}{}", prefix, field.name),
                primary_key: *primary_key,
            }),
            FieldKind::Embedded {
                prefix: inner,
                fields,
            } => flatten(&format!("{}{}", prefix, inner), fields, out),
        }
    }
}

/// Renders as `table(col, *key_col, ...)`, with identity columns starred.
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.table)?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if column.primary_key {
                f.write_str("*")?;
            }
            f.write_str(&column.name)?;
        }
        f.write_str(")")
    }
}
