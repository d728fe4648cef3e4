//! Catalog records
//!
//! A [`Record`] is one row of a catalog reply: an ordered set of named
//! scalar fields. Field order matters because view columns are inferred from
//! the first record of a listing.

use crate::types::ItemId;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// Suffix marking identifier fields, which are never shown as columns
pub const ID_SUFFIX: &str = "_id";

/// Scalar field value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Integer view of the value, if it is a non-negative id
    pub fn as_id(&self) -> Option<ItemId> {
        match self {
            Value::Int(n) => ItemId::try_from(*n).ok(),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Float(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            // Whole floats keep one decimal so 123.0 doesn't read as an integer
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// Ordered field set of one catalog row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, keeping insertion order
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field; a replaced field keeps its position
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Identifier field as an [`ItemId`]
    pub fn id(&self, key: &str) -> Option<ItemId> {
        self.get(key).and_then(Value::as_id)
    }

    /// Field rendered for display, empty when absent
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Keys that are not identifiers, in record order
    pub fn visible_keys(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|k| !k.ends_with(ID_SUFFIX))
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of field names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    if record.contains(&key) {
                        return Err(de::Error::custom(format!("duplicate field '{}'", key)));
                    }
                    record.fields.push((key, value));
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}
