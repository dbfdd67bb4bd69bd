//! Helpers for reading the host's loosely typed document data.
//!
//! The host stores most item attributes as `{ "value": ... }` objects and does
//! not enforce numeric types, so counts may arrive as numbers, numeric strings,
//! or garbage. Everything here degrades to a default instead of failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// `{ "value": ... }` wrapper used for most item attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueField<T> {
    #[serde(default)]
    pub value: T,
}

impl<T> ValueField<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

/// Parses a count the way the sheet always has: leading digits of a string or
/// the integer part of a number. Anything else (including negatives) is zero.
pub fn parse_count(value: &Value) -> u8 {
    let parsed = match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(text) => {
            let digits: String = text
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse::<u64>().ok()
        }
        _ => None,
    };
    parsed.map(|n| n.min(u8::MAX as u64) as u8).unwrap_or(0)
}

/// Host-side truthiness for flags that may have crossed a text boundary.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(parse_count).unwrap_or(0))
}

pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().is_some_and(is_truthy))
}

/// Reads a field that may hold anything, falling back to its default when the
/// stored value has the wrong shape.
pub fn deserialize_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Accepts either a JSON array or an object keyed by decimal indices and
/// returns the entries placed at their index. Holes are filled with `Null`.
/// Indices at or past `limit` are dropped.
///
/// Partial updates addressed by dotted paths (`prepared.3`) make the host
/// persist arrays as index-keyed objects, so both shapes show up in practice.
pub fn index_addressed(value: Value, limit: usize) -> Vec<Value> {
    match value {
        Value::Array(mut items) => {
            items.truncate(limit);
            items
        }
        Value::Object(map) => {
            let indexed: BTreeMap<usize, Value> = map
                .into_iter()
                .filter_map(|(key, item)| key.parse::<usize>().ok().map(|index| (index, item)))
                .filter(|(index, _)| *index < limit)
                .collect();
            let len = indexed.keys().next_back().map_or(0, |last| last + 1);
            let mut items = vec![Value::Null; len];
            for (index, item) in indexed {
                items[index] = item;
            }
            items
        }
        _ => Vec::new(),
    }
}

/// Parses keys of the form `slot<N>` into `N`.
pub fn parse_slot_key(key: &str) -> Option<u8> {
    key.strip_prefix("slot")?.parse::<u8>().ok()
}

pub fn slot_key(level: u8) -> String {
    format!("slot{}", level)
}
