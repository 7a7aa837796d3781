//! Firehose data-transformation request and response wire types.

use ddbhistory_core::record::{InputRecord, OutputRecord};
use serde::{Deserialize, Serialize};

/// One transformation invocation as sent by the delivery pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_stream_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_kinesis_stream_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub records: Vec<InputRecord>,
}

impl TransformationEvent {
    pub fn new(records: Vec<InputRecord>) -> Self {
        Self {
            invocation_id: None,
            delivery_stream_arn: None,
            source_kinesis_stream_arn: None,
            region: None,
            records,
        }
    }
}

/// The transformed batch handed back to the delivery pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationResponse {
    pub records: Vec<OutputRecord>,
}
