//! Operand values stored in a predicate tree.

use serde_json::{Number, Value};

/// Value compared against a field.
///
/// `Null` and non-finite floats are "absent": the builder never stores them.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Missing value (`null` / `None`).
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// List of values (for `in`, `not_in`, `contains`).
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Returns `true` if this value must not be written into a tree.
    pub fn is_absent(&self) -> bool {
        match self {
            FilterValue::Null => true,
            FilterValue::Float(f) => !f.is_finite(),
            _ => false,
        }
    }

    /// Drop absent members from lists, at any depth.
    pub(crate) fn prune(self) -> Self {
        match self {
            FilterValue::List(items) => FilterValue::List(
                items
                    .into_iter()
                    .filter(|v| !v.is_absent())
                    .map(Self::prune)
                    .collect(),
            ),
            other => other,
        }
    }

    /// Convert to integer if possible.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FilterValue::Integer(i) => Some(*i),
            FilterValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Convert to the JSON form sent to the content store.
    ///
    /// Non-finite floats have no JSON representation and become `null`;
    /// the builder never stores them.
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Null => Value::Null,
            FilterValue::Boolean(b) => Value::Bool(*b),
            FilterValue::Integer(i) => Value::Number((*i).into()),
            FilterValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            FilterValue::String(s) => Value::String(s.clone()),
            FilterValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }

    /// Decode a JSON operand. Objects are not valid operands.
    pub fn from_json(value: Value) -> Option<Self> {
        Some(match value {
            Value::Null => FilterValue::Null,
            Value::Bool(b) => FilterValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FilterValue::Integer(i),
                None => FilterValue::Float(n.as_f64()?),
            },
            Value::String(s) => FilterValue::String(s),
            Value::Array(items) => FilterValue::List(
                items
                    .into_iter()
                    .map(Self::from_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Object(_) => return None,
        })
    }
}

impl From<&FilterValue> for Value {
    fn from(value: &FilterValue) -> Self {
        value.to_json()
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Boolean(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FilterValue {
                fn from(i: $t) -> Self {
                    FilterValue::Integer(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for FilterValue {
    fn from(i: u64) -> Self {
        i64::try_from(i).map_or(FilterValue::Float(i as f64), FilterValue::Integer)
    }
}

impl From<usize> for FilterValue {
    fn from(i: usize) -> Self {
        i64::try_from(i).map_or(FilterValue::Float(i as f64), FilterValue::Integer)
    }
}

impl From<f32> for FilterValue {
    fn from(f: f32) -> Self {
        FilterValue::Float(f64::from(f))
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Float(f)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<&String> for FilterValue {
    fn from(s: &String) -> Self {
        FilterValue::String(s.clone())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Null, Into::into)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_values() {
        assert!(FilterValue::Null.is_absent());
        assert!(FilterValue::from(f64::NAN).is_absent());
        assert!(FilterValue::from(None::<i32>).is_absent());
        assert!(!FilterValue::from(0).is_absent());
        assert!(!FilterValue::from("").is_absent());
        assert!(!FilterValue::from(false).is_absent());
        assert!(FilterValue::from(f64::INFINITY).is_absent());
        assert!(FilterValue::from(f64::NEG_INFINITY).is_absent());
        assert!(FilterValue::from(f32::INFINITY).is_absent());
        assert!(!FilterValue::from(f64::MAX).is_absent());
    }

    #[test]
    fn prune_drops_absent_list_members() {
        let value = FilterValue::List(vec![
            FilterValue::from(1),
            FilterValue::Null,
            FilterValue::from(f64::INFINITY),
            FilterValue::List(vec![FilterValue::from(f64::NAN), FilterValue::from("a")]),
        ]);
        assert_eq!(value.prune().to_json(), json!([1, ["a"]]));
        assert_eq!(FilterValue::from(2.5).prune(), FilterValue::Float(2.5));
    }

    #[test]
    fn json_conversion() {
        let value = FilterValue::from(vec![1, 2, 3]);
        assert_eq!(value.to_json(), json!([1, 2, 3]));
        assert_eq!(FilterValue::from(2.5).to_json(), json!(2.5));
        assert_eq!(FilterValue::from(f64::INFINITY).to_json(), Value::Null);
        assert_eq!(FilterValue::from("5").to_json(), json!("5"));
    }

    #[test]
    fn json_decoding() {
        assert_eq!(FilterValue::from_json(json!(7)), Some(FilterValue::Integer(7)));
        assert_eq!(FilterValue::from_json(json!(1.5)), Some(FilterValue::Float(1.5)));
        assert_eq!(
            FilterValue::from_json(json!(["a", true])),
            Some(FilterValue::List(vec![
                FilterValue::String("a".to_string()),
                FilterValue::Boolean(true)
            ]))
        );
        assert_eq!(FilterValue::from_json(json!({"a": 1})), None);
        assert_eq!(FilterValue::from_json(json!([{"a": 1}])), None);
    }

    #[test]
    fn integer_coercion() {
        assert_eq!(FilterValue::from("42").as_i64(), Some(42));
        assert_eq!(FilterValue::from(u64::MAX), FilterValue::Float(u64::MAX as f64));
        assert_eq!(FilterValue::from(true).as_i64(), None);
    }
}
