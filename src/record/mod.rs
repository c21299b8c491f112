//! Record shapes, values and identity.
//!
//! Any type implementing [`Record`] can be staged in a
//! [`BatchBuffer`](crate::BatchBuffer). A record reports the [`Shape`] it
//! belongs to and its column values; the shape says which columns form the
//! record's identity.
//!
//! # Example
//!
//! ```
//! use std::sync::OnceLock;
//! use batch_save::record::{Field, Record, Shape, Value};
//!
//! struct TransformationRule {
//!     id: i64,
//!     name: String,
//!     type_mappings: Option<String>,
//! }
//!
//! fn rule_shape() -> &'static Shape {
//!     static SHAPE: OnceLock<Shape> = OnceLock::new();
//!     SHAPE.get_or_init(|| {
//!         Shape::new(
//!             "_tool_tapd_transformation_rules",
//!             vec![
//!                 Field::primary_key("id"),
//!                 Field::column("name"),
//!                 Field::column("type_mappings"),
//!             ],
//!         )
//!         .expect("static shape is valid")
//!     })
//! }
//!
//! impl Record for TransformationRule {
//!     fn shape(&self) -> &Shape {
//!         rule_shape()
//!     }
//!
//!     fn values(&self) -> Vec<Value> {
//!         vec![
//!             self.id.into(),
//!             self.name.as_str().into(),
//!             self.type_mappings.clone().into(),
//!         ]
//!     }
//! }
//! ```

mod identity;
mod row;
mod shape;
mod value;

pub(crate) use identity::identity_key;
pub use row::Row;
pub use shape::{Column, Field, FieldKind, Shape};
pub use value::Value;

/// A value that can be written to storage as one row.
pub trait Record: Send + Sync {
    /// The shape this record belongs to.
    fn shape(&self) -> &Shape;

    /// Column values, in [`Shape::columns`] order.
    fn values(&self) -> Vec<Value>;
}
