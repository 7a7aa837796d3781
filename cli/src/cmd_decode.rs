//! `ddbhistory decode`: decode one record and print the normalized JSON.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ddbhistory_core::{InputRecord, NormalizedRecord, RecordDecoder};
use ddbhistory_dynamodb::DynamoStreamDecoder;
use std::path::Path;

pub fn run(
    data: Option<String>,
    envelope: Option<&Path>,
    record_id: &str,
    arrival_ts: i64,
) -> Result<()> {
    let payload = payload_from(data, envelope)?;
    let normalized = decode(&payload, record_id, arrival_ts)?;
    println!("{}", serde_json::to_string_pretty(&normalized)?);
    Ok(())
}

fn payload_from(data: Option<String>, envelope: Option<&Path>) -> Result<String> {
    match (data, envelope) {
        (Some(data), _) => Ok(data),
        (None, Some(path)) => {
            let raw = std::fs::read(path)
                .with_context(|| format!("read envelope file '{}'", path.display()))?;
            Ok(STANDARD.encode(raw))
        }
        (None, None) => Err(anyhow!("either --data or --envelope is required")),
    }
}

fn decode(payload: &str, record_id: &str, arrival_ts: i64) -> Result<NormalizedRecord> {
    let record = InputRecord::new(record_id, arrival_ts, payload);
    DynamoStreamDecoder::new()
        .decode_record(&record)
        .map_err(|e| anyhow!("{} ({})", e, e.kind()))
}
