//! Identity key derivation.
//!
//! The key of a record is built from its identity column values in column
//! order. Every component starts with the value's variant tag; non-null
//! components add a length prefix (`t2:BC`, `i1:7`) and null is the bare tag
//! `n`. Components are joined with [`IDENTITY_SEPARATOR`], so `("A", "BC")`
//! and `("AB", "C")` differ, and so do `NULL`, `""`, `1` and `"1"`.

use std::fmt::Write;

use crate::config::IDENTITY_SEPARATOR;

use super::shape::Shape;
use super::value::Value;

static MISSING: Value = Value::Null;

/// Derives the identity key of a record from its column values.
///
/// Returns `None` when the shape has no identity columns, or when every
/// identity value is blank (null or empty text). Such records never
/// deduplicate against each other. A missing value counts as null.
///
/// `values` must be in [`Shape::columns`] order.
pub(crate) fn identity_key(shape: &Shape, values: &[Value]) -> Option<String> {
    let positions = shape.identity_positions();
    let component = |i: usize| values.get(i).unwrap_or(&MISSING);
    if positions.iter().all(|&i| component(i).is_blank()) {
        return None;
    }

    let mut key = String::new();
    for (n, &i) in positions.iter().enumerate() {
        if n > 0 {
            key.push(IDENTITY_SEPARATOR);
        }
        let value = component(i);
        key.push(value.identity_tag());
        if !matches!(value, Value::Null) {
            let text = value.to_string();
            // Writing into a String cannot fail
            let _ = write!(key, "{}{}{}", text.len(), IDENTITY_SEPARATOR, text);
        }
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    fn key(shape: &Shape, values: Vec<Value>) -> Option<String> {
        identity_key(shape, &values)
    }

    fn two_key_shape() -> Shape {
        Shape::new(
            "pairs",
            vec![
                Field::primary_key("left"),
                Field::column("note"),
                Field::embedded("Inner", vec![Field::primary_key("right")]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_key_is_tagged_and_length_prefixed() {
        let shape = two_key_shape();
        let key = key(&shape, vec!["A".into(), "x".into(), 42i64.into()]);
        assert_eq!(key.as_deref(), Some("t1:A:i2:42"));
    }

    #[test]
    fn test_no_concatenation_collision() {
        let shape = two_key_shape();
        let a = key(&shape, vec!["A".into(), Value::Null, "BC".into()]);
        let b = key(&shape, vec!["AB".into(), Value::Null, "C".into()]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_null_and_empty_text_differ() {
        let shape = two_key_shape();
        let null = key(&shape, vec!["A".into(), Value::Null, Value::Null]);
        let empty = key(&shape, vec!["A".into(), Value::Null, "".into()]);
        assert_eq!(null.as_deref(), Some("t1:A:n"));
        assert_eq!(empty.as_deref(), Some("t1:A:t0:"));
    }

    #[test]
    fn test_variants_with_same_display_differ() {
        let shape = two_key_shape();
        let keys: Vec<Option<String>> = [Value::from(1i64), Value::from("1"), Value::from(1.0f64)]
            .into_iter()
            .map(|right| key(&shape, vec!["A".into(), Value::Null, right]))
            .collect();
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[0], keys[2]);
        assert_ne!(keys[1], keys[2]);
    }

    #[test]
    fn test_non_identity_values_ignored() {
        let shape = two_key_shape();
        let a = key(&shape, vec![1i64.into(), "first".into(), 2i64.into()]);
        let b = key(&shape, vec![1i64.into(), "second".into(), 2i64.into()]);
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn test_partially_blank_key_keeps_positions() {
        let shape = two_key_shape();
        let a = key(&shape, vec!["A".into(), Value::Null, "".into()]);
        let b = key(&shape, vec!["".into(), Value::Null, "A".into()]);
        assert_eq!(a.as_deref(), Some("t1:A:t0:"));
        assert_eq!(b.as_deref(), Some("t0::t1:A"));
    }

    #[test]
    fn test_blank_key_is_none() {
        let shape = two_key_shape();
        assert_eq!(
            key(&shape, vec![Value::Null, "x".into(), "".into()]),
            None
        );
    }

    #[test]
    fn test_short_value_slice_does_not_panic() {
        let shape = two_key_shape();
        assert_eq!(key(&shape, vec!["A".into()]).as_deref(), Some("t1:A:n"));
        assert_eq!(key(&shape, Vec::new()), None);
    }

    #[test]
    fn test_identity_less_shape_is_none() {
        let shape = Shape::new("logs", vec![Field::column("line")]).unwrap();
        assert_eq!(key(&shape, vec!["hello".into()]), None);
    }
}
