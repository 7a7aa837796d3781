//! Input, normalized, and output record types.

use crate::types::PlainValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw, undecoded record as delivered by the delivery pipeline.
/// This is the input to every decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Opaque identifier, unique within the batch
    #[serde(rename = "recordId")]
    pub record_id: String,
    /// Arrival time at the stream (epoch milliseconds)
    #[serde(rename = "approximateArrivalTimestamp")]
    pub arrival_timestamp: i64,
    /// Base64-encoded change envelope
    #[serde(rename = "data")]
    pub payload: String,
    /// Source stream metadata, when the pipeline reads from a Kinesis stream
    #[serde(
        rename = "kinesisRecordMetadata",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_metadata",
        default
    )]
    pub kinesis_metadata: Option<KinesisRecordMetadata>,
}

impl InputRecord {
    pub fn new(
        record_id: impl Into<String>,
        arrival_timestamp: i64,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            arrival_timestamp,
            payload: payload.into(),
            kinesis_metadata: None,
        }
    }

    /// Shard the record was read from, if known.
    pub fn shard_id(&self) -> Option<&str> {
        self.kinesis_metadata
            .as_ref()
            .and_then(|m| m.shard_id.as_deref())
    }
}

/// Kinesis-side metadata attached to each record of a stream-sourced batch.
/// Log context only: every member may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KinesisRecordMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsequence_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approximate_arrival_timestamp: Option<i64>,
}

/// Metadata that does not fit `KinesisRecordMetadata` is dropped instead of
/// failing the whole request.
fn lenient_metadata<'de, D>(deserializer: D) -> Result<Option<KinesisRecordMetadata>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

/// A decoded, normalized change record: the primary output of ddbhistory.
///
/// Field order here is the serialized field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    #[serde(rename = "recordId")]
    pub record_id: String,
    #[serde(rename = "approximateArrivalTimestamp")]
    pub arrival_timestamp: i64,
    #[serde(rename = "eventID", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// `INSERT`, `MODIFY`, `REMOVE`; anything else is passed through
    #[serde(rename = "eventName", skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(rename = "tableName", skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(
        rename = "ApproximateCreationDateTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_time: Option<i64>,
    #[serde(rename = "SizeBytes", skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(rename = "NewImage", skip_serializing_if = "Option::is_none")]
    pub new_image: Option<IndexMap<String, PlainValue>>,
    #[serde(rename = "OldImage", skip_serializing_if = "Option::is_none")]
    pub old_image: Option<IndexMap<String, PlainValue>>,
}

impl NormalizedRecord {
    /// Serialize as a single JSON line (terminated by `\n`), the unit the
    /// delivery pipeline concatenates into storage objects.
    pub fn to_json_line(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = serde_json::to_vec(self)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

/// Per-record outcome token. The spelling is the routing signal the
/// delivery pipeline uses for retry and backup handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    Ok,
    ProcessingFailed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Ok => "Ok",
            RecordStatus::ProcessingFailed => "ProcessingFailed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of the result batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "recordId")]
    pub record_id: String,
    #[serde(rename = "result")]
    pub status: RecordStatus,
    /// Encoded normalized record on `Ok`, the untouched input payload otherwise
    #[serde(rename = "data")]
    pub payload: String,
}

impl OutputRecord {
    pub fn ok(record_id: impl Into<String>, payload: String) -> Self {
        Self {
            record_id: record_id.into(),
            status: RecordStatus::Ok,
            payload,
        }
    }

    /// A failed output carrying the original payload for the replay path.
    pub fn failed(input: &InputRecord) -> Self {
        Self {
            record_id: input.record_id.clone(),
            status: RecordStatus::ProcessingFailed,
            payload: input.payload.clone(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RecordStatus::Ok
    }
}
