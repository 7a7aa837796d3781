//! Converts DynamoDB typed attribute values → ddbhistory `PlainValue`.
//!
//! This is where the single-tag wire encoding is stripped into the plain
//! value model defined in `ddbhistory-core`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ddbhistory_core::{error::DecodeError, types::PlainValue};
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::envelope::TaggedImage;

/// A tagged attribute value. Exactly one tag is present on the wire;
/// serde rejects objects with zero or several keys and unknown tags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "S")]
    String(String),
    /// Numbers travel as decimal strings
    #[serde(rename = "N")]
    Number(String),
    /// Base64-encoded bytes
    #[serde(rename = "B")]
    Binary(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    /// The payload is always `true` on the wire and carries no information.
    #[serde(rename = "NULL")]
    Null(bool),
    #[serde(rename = "L")]
    List(Vec<AttributeValue>),
    #[serde(rename = "M")]
    Map(IndexMap<String, AttributeValue>),
    #[serde(rename = "SS")]
    StringSet(Vec<String>),
    #[serde(rename = "NS")]
    NumberSet(Vec<String>),
    #[serde(rename = "BS")]
    BinarySet(Vec<String>),
}

impl AttributeValue {
    /// Wire tag of this value.
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "S",
            AttributeValue::Number(_) => "N",
            AttributeValue::Binary(_) => "B",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::Null(_) => "NULL",
            AttributeValue::List(_) => "L",
            AttributeValue::Map(_) => "M",
            AttributeValue::StringSet(_) => "SS",
            AttributeValue::NumberSet(_) => "NS",
            AttributeValue::BinarySet(_) => "BS",
        }
    }
}

/// Payload errors found while untagging a well-formed tag.
#[derive(Debug, Error)]
pub enum UntagError {
    #[error("invalid number '{value}': {reason}")]
    InvalidNumber { value: String, reason: String },

    #[error("invalid binary value: {0}")]
    InvalidBinary(#[from] base64::DecodeError),
}

/// Strip the tags from one attribute value, recursing into lists and maps.
pub fn untag(value: AttributeValue) -> Result<PlainValue, UntagError> {
    match value {
        AttributeValue::String(s) => Ok(PlainValue::String(s)),
        AttributeValue::Number(n) => parse_number(&n).map(PlainValue::Number),
        AttributeValue::Binary(b) => Ok(PlainValue::Bytes(STANDARD.decode(b)?)),
        AttributeValue::Bool(b) => Ok(PlainValue::Bool(b)),
        AttributeValue::Null(_) => Ok(PlainValue::Null),
        AttributeValue::List(items) => items
            .into_iter()
            .map(untag)
            .collect::<Result<Vec<_>, _>>()
            .map(PlainValue::List),
        AttributeValue::Map(members) => members
            .into_iter()
            .map(|(k, v)| untag(v).map(|v| (k, v)))
            .collect::<Result<IndexMap<_, _>, _>>()
            .map(PlainValue::Map),
        AttributeValue::StringSet(items) => {
            Ok(PlainValue::List(items.into_iter().map(PlainValue::String).collect()))
        }
        AttributeValue::NumberSet(items) => items
            .iter()
            .map(|n| parse_number(n).map(PlainValue::Number))
            .collect::<Result<Vec<_>, _>>()
            .map(PlainValue::List),
        AttributeValue::BinarySet(items) => items
            .into_iter()
            .map(|b| STANDARD.decode(b).map(PlainValue::Bytes))
            .collect::<Result<Vec<_>, _>>()
            .map(PlainValue::List)
            .map_err(UntagError::from),
    }
}

/// Untag every attribute of a typed attribute map.
///
/// Errors name the top-level attribute that failed; nested failures carry
/// the serde or payload reason.
pub fn untag_image(image: &TaggedImage) -> Result<IndexMap<String, PlainValue>, DecodeError> {
    image
        .iter()
        .map(|(name, raw)| -> Result<(String, PlainValue), DecodeError> {
            let tagged = AttributeValue::deserialize(raw)
                .map_err(|e| DecodeError::invalid_tag(name.as_str(), e.to_string()))?;
            let plain =
                untag(tagged).map_err(|e| DecodeError::invalid_tag(name.as_str(), e.to_string()))?;
            Ok((name.clone(), plain))
        })
        .collect()
}

/// Parse a decimal string as an exact JSON number (no f64 round-trip).
fn parse_number(raw: &str) -> Result<serde_json::Number, UntagError> {
    if raw.trim() != raw {
        return Err(UntagError::InvalidNumber {
            value: raw.to_string(),
            reason: "surrounding whitespace".into(),
        });
    }
    serde_json::from_str::<serde_json::Number>(raw).map_err(|e| UntagError::InvalidNumber {
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
