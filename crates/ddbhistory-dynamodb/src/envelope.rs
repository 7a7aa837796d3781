//! Wire shape of a DynamoDB stream record as carried inside `data`.

use indexmap::IndexMap;
use serde::Deserialize;

/// Typed attribute map before untagging: attribute name → tagged value.
pub type TaggedImage = IndexMap<String, serde_json::Value>;

/// The decoded JSON document describing one table change.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeEnvelope {
    #[serde(rename = "eventID")]
    pub event_id: Option<String>,
    /// `INSERT` | `MODIFY` | `REMOVE`; not validated
    #[serde(rename = "eventName")]
    pub event_name: Option<String>,
    #[serde(rename = "tableName")]
    pub table_name: Option<String>,
    #[serde(rename = "awsRegion")]
    pub aws_region: Option<String>,
    #[serde(rename = "eventSource")]
    pub event_source: Option<String>,
    /// The change itself. Required, but kept optional here so its absence
    /// surfaces as a `MissingField` rather than a parse error.
    #[serde(rename = "dynamodb")]
    pub change: Option<StreamChange>,
}

/// The `dynamodb` member of a stream record.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChange {
    #[serde(rename = "ApproximateCreationDateTime")]
    pub creation_time: Option<i64>,
    #[serde(rename = "SizeBytes")]
    pub size_bytes: Option<u64>,
    #[serde(rename = "NewImage")]
    pub new_image: Option<TaggedImage>,
    #[serde(rename = "OldImage")]
    pub old_image: Option<TaggedImage>,
}
