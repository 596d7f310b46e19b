//! Coerced cell values and typed field states.
//!
//! `CellValue` is what the coercer produces from one raw cell.
//! `Field<T>` is how a typed record stores a non-text field: absent,
//! holding a well-shaped value, or holding a value of the wrong shape
//! that validation must report.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A coerced cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty or unparseable input.
    Null,
    /// Numeric magnitude.
    Number(f64),
    /// Plain text (also used for malformed JSON kept verbatim).
    Text(String),
    /// Integer phase/slot list.
    Integers(Vec<i64>),
    /// String list.
    List(Vec<String>),
    /// Parsed JSON object.
    Object(Map<String, Value>),
}

impl CellValue {
    /// Whether this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts an arbitrary JSON value into the closest cell shape.
    ///
    /// Arrays of integers become `Integers`; other arrays become `List`
    /// with non-string elements rendered as JSON text.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Text(b.to_string()),
            Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Null),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => {
                let ints: Option<Vec<i64>> = items.iter().map(Value::as_i64).collect();
                match ints {
                    Some(ints) if !items.is_empty() => Self::Integers(ints),
                    _ => Self::List(items.into_iter().map(json_to_text).collect()),
                }
            }
            Value::Object(map) => Self::Object(map),
        }
    }

    /// Renders the cell as a JSON value (for diagnostics and export).
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Number(n) => number_json(*n),
            Self::Text(s) => Value::String(s.clone()),
            Self::Integers(v) => Value::from(v.clone()),
            Self::List(v) => Value::from(v.clone()),
            Self::Object(m) => Value::Object(m.clone()),
        }
    }

    /// Renders the cell as a display string; `None` for `Null`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(number_json(*n).to_string()),
            other => Some(other.to_json().to_string()),
        }
    }
}

/// JSON element to list item: strings unquoted, everything else as JSON text.
pub(crate) fn json_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Integral floats render without a fractional part.
pub(crate) fn number_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// State of a typed, non-text record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field<T> {
    /// No value was supplied.
    Missing,
    /// A value of the expected shape.
    Value(T),
    /// A value of the wrong shape, kept for reporting.
    Invalid(CellValue),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T> Field<T> {
    /// Returns the well-shaped value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Whether no value was supplied.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl<T: IntoCell + Clone> Field<T> {
    /// The field as a cell value (for diagnostics and grid display).
    pub fn to_cell(&self) -> CellValue {
        match self {
            Self::Missing => CellValue::Null,
            Self::Value(v) => v.clone().into_cell(),
            Self::Invalid(cell) => cell.clone(),
        }
    }
}

/// Conversion from a coerced cell into a typed field.
pub trait FromCell: Sized {
    /// Classifies `cell` as missing, well-shaped, or invalid.
    fn from_cell(cell: CellValue) -> Field<Self>;
}

/// Conversion back into a cell value.
pub trait IntoCell {
    /// Converts into a cell value.
    fn into_cell(self) -> CellValue;
}

impl FromCell for f64 {
    fn from_cell(cell: CellValue) -> Field<Self> {
        match cell {
            CellValue::Null => Field::Missing,
            CellValue::Number(n) if n.is_finite() => Field::Value(n),
            other => Field::Invalid(other),
        }
    }
}

impl IntoCell for f64 {
    fn into_cell(self) -> CellValue {
        CellValue::Number(self)
    }
}

impl FromCell for Vec<String> {
    fn from_cell(cell: CellValue) -> Field<Self> {
        match cell {
            CellValue::Null => Field::Missing,
            CellValue::List(items) => Field::Value(items),
            CellValue::Integers(items) => {
                Field::Value(items.into_iter().map(|i| i.to_string()).collect())
            }
            other => Field::Invalid(other),
        }
    }
}

impl IntoCell for Vec<String> {
    fn into_cell(self) -> CellValue {
        CellValue::List(self)
    }
}

impl FromCell for Vec<i64> {
    fn from_cell(cell: CellValue) -> Field<Self> {
        match cell {
            CellValue::Null => Field::Missing,
            CellValue::Integers(items) => Field::Value(items),
            CellValue::List(items) => {
                let parsed: Option<Vec<i64>> =
                    items.iter().map(|s| s.trim().parse().ok()).collect();
                match parsed {
                    Some(ints) => Field::Value(ints),
                    None => Field::Invalid(CellValue::List(items)),
                }
            }
            other => Field::Invalid(other),
        }
    }
}

impl IntoCell for Vec<i64> {
    fn into_cell(self) -> CellValue {
        CellValue::Integers(self)
    }
}

impl FromCell for Map<String, Value> {
    fn from_cell(cell: CellValue) -> Field<Self> {
        match cell {
            CellValue::Null => Field::Missing,
            CellValue::Object(map) => Field::Value(map),
            other => Field::Invalid(other),
        }
    }
}

impl IntoCell for Map<String, Value> {
    fn into_cell(self) -> CellValue {
        CellValue::Object(self)
    }
}

/// Text fields accept any scalar; lists and objects render as JSON text.
pub(crate) fn text_from_cell(cell: CellValue) -> Option<String> {
    cell.as_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_field_states() {
        assert_eq!(f64::from_cell(CellValue::Null), Field::Missing);
        assert_eq!(f64::from_cell(CellValue::Number(3.0)), Field::Value(3.0));
        assert_eq!(
            f64::from_cell(CellValue::Text("abc".into())),
            Field::Invalid(CellValue::Text("abc".into()))
        );
    }

    #[test]
    fn test_integer_list_accepts_numeric_strings() {
        let field = Vec::<i64>::from_cell(CellValue::List(vec!["1".into(), " 2".into()]));
        assert_eq!(field, Field::Value(vec![1, 2]));

        let bad = Vec::<i64>::from_cell(CellValue::List(vec!["a".into()]));
        assert!(matches!(bad, Field::Invalid(_)));
    }

    #[test]
    fn test_object_field_rejects_text() {
        let field = Map::from_cell(CellValue::Text("{bad".into()));
        assert_eq!(field, Field::Invalid(CellValue::Text("{bad".into())));
    }

    #[test]
    fn test_from_json_shapes() {
        assert_eq!(CellValue::from_json(json!([1, 2])), CellValue::Integers(vec![1, 2]));
        assert_eq!(
            CellValue::from_json(json!(["a", 3])),
            CellValue::List(vec!["a".into(), "3".into()])
        );
        assert_eq!(CellValue::from_json(json!([])), CellValue::List(vec![]));
        assert_eq!(CellValue::from_json(json!(5)), CellValue::Number(5.0));
    }

    #[test]
    fn test_field_serializes_transparently() {
        let missing: Field<f64> = Field::Missing;
        assert_eq!(serde_json::to_value(&missing).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(Field::Value(2.5)).unwrap(), json!(2.5));

        let invalid: Field<Vec<i64>> = Field::Invalid(CellValue::Text("x".into()));
        assert_eq!(serde_json::to_value(&invalid).unwrap(), json!("x"));
        let back: Field<Vec<i64>> = serde_json::from_value(json!("x")).unwrap();
        assert_eq!(back, invalid);
    }

    #[test]
    fn test_number_json_drops_integral_fraction() {
        assert_eq!(number_json(5.0), json!(5));
        assert_eq!(number_json(2.5), json!(2.5));
        assert_eq!(CellValue::Number(3.0).as_text().as_deref(), Some("3"));
    }
}
