//! Passthrough columns.
//!
//! Incoming columns that no canonical field claimed travel alongside the
//! typed record, in header order, without being interpreted.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::cell::json_to_text;

/// Ordered header → raw value pairs not mapped to any canonical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extras(Vec<(String, String)>);

impl Extras {
    /// Creates an empty set of extras.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a column; a repeated header replaces the earlier value in place.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.0.iter_mut().find(|(h, _)| *h == header) {
            Some(slot) => slot.1 = value,
            None => self.0.push((header, value)),
        }
    }

    /// Looks up a column by header.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates columns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Extras {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (h, v) in &self.0 {
            map.serialize_entry(h, v)?;
        }
        map.end()
    }
}

struct ExtrasVisitor;

impl<'de> Visitor<'de> for ExtrasVisitor {
    type Value = Extras;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of passthrough columns")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Extras, A::Error> {
        let mut extras = Extras::new();
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            extras.insert(key, json_to_text(value));
        }
        Ok(extras)
    }
}

impl<'de> Deserialize<'de> for Extras {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ExtrasVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order_and_replaces() {
        let mut extras = Extras::new();
        extras.insert("Notes", "a");
        extras.insert("Region", "EU");
        extras.insert("Notes", "b");

        let pairs: Vec<_> = extras.iter().collect();
        assert_eq!(pairs, vec![("Notes", "b"), ("Region", "EU")]);
        assert_eq!(extras.get("Region"), Some("EU"));
        assert_eq!(extras.len(), 2);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut extras = Extras::new();
        extras.insert("Notes", "x");
        let json = serde_json::to_string(&extras).unwrap();
        assert_eq!(json, r#"{"Notes":"x"}"#);

        let back: Extras = serde_json::from_str(r#"{"Notes":"x","Count":3}"#).unwrap();
        assert_eq!(back.get("Count"), Some("3"));
    }
}
