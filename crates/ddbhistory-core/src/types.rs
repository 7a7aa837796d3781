//! The plain value model.
//!
//! Typed attribute maps wrap every value in a single-tag object. Once the
//! tags are stripped, consumers deal only with `PlainValue`, whose JSON form
//! is the natural one (strings, numbers, booleans, null, arrays, objects).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// An untagged attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum PlainValue {
    Null,
    Bool(bool),
    /// Kept in its decimal form so high-precision values are never narrowed.
    Number(serde_json::Number),
    String(String),
    /// Raw bytes; serialized as a standard base64 string.
    Bytes(Vec<u8>),
    List(Vec<PlainValue>),
    Map(IndexMap<String, PlainValue>),
}

impl PlainValue {
    /// Returns `true` if this value is logically null/absent.
    pub fn is_null(&self) -> bool {
        matches!(self, PlainValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlainValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PlainValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a member of a `Map` value.
    pub fn get(&self, key: &str) -> Option<&PlainValue> {
        match self {
            PlainValue::Map(m) => m.get(key),
            _ => None,
        }
    }
}

impl Serialize for PlainValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PlainValue::Null => serializer.serialize_unit(),
            PlainValue::Bool(b) => serializer.serialize_bool(*b),
            PlainValue::Number(n) => n.serialize(serializer),
            PlainValue::String(s) => serializer.serialize_str(s),
            PlainValue::Bytes(b) => serializer.serialize_str(&STANDARD.encode(b)),
            PlainValue::List(items) => serializer.collect_seq(items),
            PlainValue::Map(members) => serializer.collect_map(members),
        }
    }
}

impl fmt::Display for PlainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlainValue::Null => write!(f, "null"),
            PlainValue::Bool(b) => write!(f, "{b}"),
            PlainValue::Number(n) => write!(f, "{n}"),
            PlainValue::String(s) => write!(f, "{s}"),
            PlainValue::Bytes(b) => write!(f, "b64:{}", STANDARD.encode(b)),
            PlainValue::List(items) => {
                let parts: Vec<_> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            PlainValue::Map(members) => {
                let parts: Vec<_> = members.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}
