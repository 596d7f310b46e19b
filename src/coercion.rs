//! Raw cell coercion.
//!
//! Converts a decoded cell string into the shape its canonical field
//! expects. Coercion never fails: unparseable numbers become `Null` and
//! malformed JSON objects are kept verbatim as text, leaving the
//! validator to report them.
//!
//! # Policy
//!
//! | Kind | Input | Output |
//! |------|-------|--------|
//! | any | empty / blank | `Null` |
//! | `List` | `["a","b"]`, `[a, b]`, `a, b` | `List` |
//! | `JsonObject` | `{"k": 1}` | `Object`, else verbatim `Text` |
//! | `Number` | `3`, ` 2.5 ` | `Number`, else `Null` |
//! | `IntegerList` | `[1,2]`, `1, 2`, `1-3` | `Integers` (non-numeric pieces dropped) |
//! | `Text` | anything | trimmed `Text` |

use serde_json::Value;

use crate::models::CellValue;
use crate::schema::{CanonicalField, CoercionKind};

/// Longest `a-b` phase range expanded by integer-list coercion.
pub const MAX_RANGE_SPAN: i64 = 1000;

/// Coerces one raw cell for `field`.
///
/// # Examples
///
/// ```
/// use u_intake::coercion::coerce;
/// use u_intake::models::CellValue;
/// use u_intake::schema::CanonicalField;
///
/// assert_eq!(coerce(Some("1,2,3"), CanonicalField::AvailableSlots), CellValue::Integers(vec![1, 2, 3]));
/// assert_eq!(coerce(Some("[1, 2, x]"), CanonicalField::AvailableSlots), CellValue::Integers(vec![1, 2]));
/// ```
pub fn coerce(raw: Option<&str>, field: CanonicalField) -> CellValue {
    coerce_as(raw, field.coercion())
}

/// Coerces one raw cell by coercion kind.
pub fn coerce_as(raw: Option<&str>, kind: CoercionKind) -> CellValue {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return CellValue::Null,
    };
    let trimmed = raw.trim();

    match kind {
        CoercionKind::List => CellValue::List(split_list(trimmed)),
        CoercionKind::JsonObject => match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => CellValue::Object(map),
            _ => CellValue::Text(raw.to_string()),
        },
        CoercionKind::Number => parse_number(trimmed).map_or(CellValue::Null, CellValue::Number),
        CoercionKind::IntegerList => CellValue::Integers(
            split_list(trimmed)
                .iter()
                .flat_map(|piece| parse_phases(piece))
                .collect(),
        ),
        CoercionKind::Text => CellValue::Text(trimmed.to_string()),
    }
}

/// Splits a bracketed JSON array or a comma-separated string into items.
fn split_list(trimmed: &str) -> Vec<String> {
    let inner = match trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => {
            if let Ok(items) = serde_json::from_str::<Vec<Value>>(trimmed) {
                return items
                    .into_iter()
                    .filter(|v| !v.is_null())
                    .map(|v| match v {
                        Value::String(s) => s.trim().to_string(),
                        other => other.to_string(),
                    })
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            inner
        }
        None => trimmed,
    };
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// One integer-list piece: an integer, an integral float, or an `a-b` range.
fn parse_phases(piece: &str) -> Vec<i64> {
    if let Ok(n) = piece.parse::<i64>() {
        return vec![n];
    }
    if let Some(n) = parse_number(piece).filter(|n| n.fract() == 0.0) {
        return vec![n as i64];
    }
    if let Some((lo, hi)) = piece.split_once('-') {
        if let (Ok(lo), Ok(hi)) = (lo.trim().parse::<i64>(), hi.trim().parse::<i64>()) {
            if lo <= hi && hi - lo <= MAX_RANGE_SPAN {
                return (lo..=hi).collect();
            }
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_is_null_for_every_kind() {
        for kind in [
            CoercionKind::List,
            CoercionKind::JsonObject,
            CoercionKind::Number,
            CoercionKind::IntegerList,
            CoercionKind::Text,
        ] {
            assert_eq!(coerce_as(None, kind), CellValue::Null);
            assert_eq!(coerce_as(Some(""), kind), CellValue::Null);
            assert_eq!(coerce_as(Some("   "), kind), CellValue::Null);
        }
    }

    #[test]
    fn test_list_from_json_array() {
        assert_eq!(
            coerce(Some(r#"["T1", "T2"]"#), CanonicalField::RequestedTaskIds),
            CellValue::List(vec!["T1".into(), "T2".into()])
        );
    }

    #[test]
    fn test_list_from_loose_brackets() {
        assert_eq!(
            coerce(Some("[coding, ml ]"), CanonicalField::Skills),
            CellValue::List(vec!["coding".into(), "ml".into()])
        );
    }

    #[test]
    fn test_list_from_commas_drops_empty_pieces() {
        assert_eq!(
            coerce(Some("T1, ,T3,"), CanonicalField::RequestedTaskIds),
            CellValue::List(vec!["T1".into(), "T3".into()])
        );
    }

    #[test]
    fn test_slots_from_commas() {
        assert_eq!(
            coerce(Some("1,2,3"), CanonicalField::AvailableSlots),
            CellValue::Integers(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_slots_drop_non_numeric() {
        assert_eq!(
            coerce(Some("[1, 2, x]"), CanonicalField::AvailableSlots),
            CellValue::Integers(vec![1, 2])
        );
    }

    #[test]
    fn test_phase_ranges_expand() {
        assert_eq!(
            coerce(Some("1-3, 5"), CanonicalField::PreferredPhases),
            CellValue::Integers(vec![1, 2, 3, 5])
        );
        assert_eq!(
            coerce(Some("[-2, 4]"), CanonicalField::PreferredPhases),
            CellValue::Integers(vec![-2, 4])
        );
        assert_eq!(
            coerce(Some("5-2"), CanonicalField::PreferredPhases),
            CellValue::Integers(vec![])
        );
    }

    #[test]
    fn test_phase_range_span_is_capped() {
        assert_eq!(
            coerce(Some("1-2000"), CanonicalField::PreferredPhases),
            CellValue::Integers(vec![])
        );
        assert_eq!(
            coerce(Some("1-2000, 7"), CanonicalField::AvailableSlots),
            CellValue::Integers(vec![7])
        );
        match coerce(Some("0-1000"), CanonicalField::AvailableSlots) {
            CellValue::Integers(v) => {
                assert_eq!(v.len(), 1001);
                assert_eq!(v.last(), Some(&MAX_RANGE_SPAN));
            }
            other => panic!("expected integers, got {other:?}"),
        }
    }

    #[test]
    fn test_json_object_parses() {
        let cell = coerce(Some(r#"{"location": "NY", "budget": 100}"#), CanonicalField::AttributesJson);
        assert_eq!(cell.to_json(), json!({"location": "NY", "budget": 100}));
    }

    #[test]
    fn test_bad_json_kept_verbatim() {
        assert_eq!(
            coerce(Some("{bad json"), CanonicalField::AttributesJson),
            CellValue::Text("{bad json".into())
        );
        assert_eq!(
            coerce(Some("[1,2]"), CanonicalField::AttributesJson),
            CellValue::Text("[1,2]".into())
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(coerce(Some(" 3 "), CanonicalField::PriorityLevel), CellValue::Number(3.0));
        assert_eq!(coerce(Some("2.5"), CanonicalField::Duration), CellValue::Number(2.5));
        assert_eq!(coerce(Some("high"), CanonicalField::PriorityLevel), CellValue::Null);
        assert_eq!(coerce(Some("NaN"), CanonicalField::MaxLoadPerPhase), CellValue::Null);
        assert_eq!(coerce(Some("0"), CanonicalField::MaxConcurrent), CellValue::Number(0.0));
    }

    #[test]
    fn test_text_is_trimmed() {
        assert_eq!(
            coerce(Some("  Acme Corp "), CanonicalField::ClientName),
            CellValue::Text("Acme Corp".into())
        );
    }
}
