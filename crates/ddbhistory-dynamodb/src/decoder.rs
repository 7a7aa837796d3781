//! `DynamoStreamDecoder`: decodes one Firehose record carrying a DynamoDB
//! stream record into a `NormalizedRecord`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ddbhistory_core::{
    decoder::RecordDecoder,
    error::DecodeError,
    record::{InputRecord, NormalizedRecord},
};
use tracing::trace;

use crate::attribute::untag_image;
use crate::envelope::ChangeEnvelope;

/// DynamoDB stream record decoder. Stateless; share one instance freely.
#[derive(Debug, Default, Clone)]
pub struct DynamoStreamDecoder;

impl DynamoStreamDecoder {
    pub fn new() -> Self {
        Self
    }

    /// base64 → UTF-8 → JSON. A `null` document counts as a missing envelope.
    pub fn decode_envelope(payload: &str) -> Result<ChangeEnvelope, DecodeError> {
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| DecodeError::MalformedEncoding {
                reason: format!("invalid base64: {e}"),
            })?;
        let text = std::str::from_utf8(&bytes).map_err(|e| DecodeError::MalformedEncoding {
            reason: format!("invalid UTF-8: {e}"),
        })?;
        serde_json::from_str::<Option<ChangeEnvelope>>(text)
            .map_err(DecodeError::MalformedJson)?
            .ok_or_else(|| DecodeError::missing("envelope"))
    }
}

impl RecordDecoder for DynamoStreamDecoder {
    fn source_format(&self) -> &'static str {
        "dynamodb-stream"
    }

    fn decode_record(&self, record: &InputRecord) -> Result<NormalizedRecord, DecodeError> {
        let envelope = Self::decode_envelope(&record.payload)?;
        let change = envelope
            .change
            .ok_or_else(|| DecodeError::missing("dynamodb"))?;

        let new_image = change.new_image.as_ref().map(untag_image).transpose()?;
        let old_image = change.old_image.as_ref().map(untag_image).transpose()?;

        trace!(
            record_id = %record.record_id,
            event_name = envelope.event_name.as_deref().unwrap_or(""),
            region = envelope.aws_region.as_deref().unwrap_or(""),
            "decoded stream record"
        );

        Ok(NormalizedRecord {
            record_id: record.record_id.clone(),
            arrival_timestamp: record.arrival_timestamp,
            event_id: envelope.event_id,
            event_name: envelope.event_name,
            table_name: envelope.table_name,
            creation_time: change.creation_time,
            size_bytes: change.size_bytes,
            new_image,
            old_image,
        })
    }
}
