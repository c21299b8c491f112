//! Dynamically shaped records.

use std::sync::Arc;

use crate::error_handling::BatchSaveError;

use super::shape::Shape;
use super::value::Value;
use super::Record;

/// A record whose shape is only known at runtime.
///
/// Rows sharing one `Arc<Shape>` can be staged in the same buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    shape: Arc<Shape>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from values in [`Shape::columns`] order.
    pub fn new(shape: Arc<Shape>, values: Vec<Value>) -> Result<Self, BatchSaveError> {
        if values.len() != shape.columns().len() {
            return Err(BatchSaveError::TypeMismatch {
                expected: shape.to_string(),
                found: format!("{} values", values.len()),
            });
        }
        Ok(Row { shape, values })
    }

    /// Creates a row from `(column, value)` pairs. Columns not named are null.
    pub fn from_named<I, K, V>(shape: Arc<Shape>, pairs: I) -> Result<Self, BatchSaveError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut values = vec![Value::Null; shape.columns().len()];
        for (name, value) in pairs {
            let name = name.as_ref();
            let position = shape
                .columns()
                .iter()
                .position(|c| c.name == name)
                .ok_or_else(|| BatchSaveError::TypeMismatch {
                    expected: shape.to_string(),
                    found: format!("unknown column {}", name),
                })?;
            values[position] = value.into();
        }
        Ok(Row { shape, values })
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.shape
            .columns()
            .iter()
            .position(|c| c.name == column)
            .map(|i| &self.values[i])
    }

    pub fn shape_handle(&self) -> &Arc<Shape> {
        &self.shape
    }
}

impl Record for Row {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn values(&self) -> Vec<Value> {
        self.values.clone()
    }
}
