//! `BatchTransformer`: applies a `RecordDecoder` to every record of a batch.

use crate::config::TransformerConfig;
use crate::request::{TransformationEvent, TransformationResponse};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ddbhistory_core::{
    decoder::RecordDecoder,
    error::{BatchError, DecodeError},
    record::{InputRecord, OutputRecord},
    summary::BatchSummary,
};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of transforming one batch.
#[derive(Debug)]
pub struct BatchOutput {
    /// One output per input, same order
    pub records: Vec<OutputRecord>,
    /// (original_index, error) for every record that came out `ProcessingFailed`
    pub failures: Vec<(usize, DecodeError)>,
}

impl BatchOutput {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_records(&self.records, &self.failures)
    }

    pub fn into_response(self) -> TransformationResponse {
        TransformationResponse {
            records: self.records,
        }
    }
}

/// Batch transformer.
///
/// Holds no per-batch state: one instance can serve concurrent invocations.
pub struct BatchTransformer {
    decoder: Arc<dyn RecordDecoder>,
    config: TransformerConfig,
    pool: Option<rayon::ThreadPool>,
}

impl BatchTransformer {
    /// Transformer with the default configuration, running on the global
    /// Rayon pool.
    pub fn new(decoder: Arc<dyn RecordDecoder>) -> Self {
        Self {
            decoder,
            config: TransformerConfig::default(),
            pool: None,
        }
    }

    /// Transformer with an explicit configuration. A non-zero `concurrency`
    /// gets a dedicated worker pool of that size.
    pub fn with_config(
        decoder: Arc<dyn RecordDecoder>,
        config: TransformerConfig,
    ) -> Result<Self, BatchError> {
        let pool = if config.concurrency > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.concurrency)
                .thread_name(|i| format!("ddbhistory-worker-{i}"))
                .build()
                .map_err(|e| BatchError::ThreadPool {
                    reason: e.to_string(),
                })?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            decoder,
            config,
            pool,
        })
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Transform a batch. Never fails: every record yields exactly one
    /// output, in input order.
    pub fn transform(&self, records: &[InputRecord]) -> BatchOutput {
        let outcomes = self.run(records, None).unwrap_or_default();
        self.collect(records, outcomes)
    }

    /// Like [`transform`](Self::transform), but gives up once `cancel` is
    /// set. Checked before every record; records already in flight finish.
    /// A cancelled batch yields no partial output.
    pub fn transform_cancellable(
        &self,
        records: &[InputRecord],
        cancel: &AtomicBool,
    ) -> Result<BatchOutput, BatchError> {
        match self.run(records, Some(cancel)) {
            Some(outcomes) => Ok(self.collect(records, outcomes)),
            None => {
                info!("BatchTransformer: cancelled, discarding {} records", records.len());
                Err(BatchError::Cancelled {
                    total: records.len(),
                })
            }
        }
    }

    /// Per-record outcomes in input order, or `None` when cancelled.
    fn run(
        &self,
        records: &[InputRecord],
        cancel: Option<&AtomicBool>,
    ) -> Option<Vec<Result<OutputRecord, DecodeError>>> {
        let total = records.len();
        let parallel = total >= self.config.parallel_threshold;
        info!(
            "BatchTransformer: transforming {} records with '{}' (parallel={})",
            total,
            self.decoder.source_format(),
            parallel
        );

        let cancelled = || cancel.is_some_and(|c| c.load(Ordering::Relaxed));
        let decoder = self.decoder.as_ref();
        let mut outcomes = Vec::with_capacity(total);
        if parallel {
            let chunk_size = self.config.chunk_size.max(1);
            for chunk in records.chunks(chunk_size) {
                // indexed collect: slot i holds record i regardless of completion order
                let part: Vec<Option<_>> = self.install(|| {
                    chunk
                        .par_iter()
                        .map(|rec| (!cancelled()).then(|| transform_record(decoder, rec)))
                        .collect()
                });
                // the flag never resets, so a skipped slot implies this check fires
                if cancelled() {
                    return None;
                }
                outcomes.extend(part.into_iter().flatten());
            }
        } else {
            for rec in records {
                if cancelled() {
                    return None;
                }
                outcomes.push(transform_record(decoder, rec));
            }
        }
        Some(outcomes)
    }

    fn collect(
        &self,
        records: &[InputRecord],
        outcomes: Vec<Result<OutputRecord, DecodeError>>,
    ) -> BatchOutput {
        let total = records.len();
        let mut output = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for (idx, (record, outcome)) in records.iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(out) => output.push(out),
                Err(err) => {
                    debug!(
                        index = idx,
                        record_id = %record.record_id,
                        shard_id = record.shard_id().unwrap_or(""),
                        kind = err.kind(),
                        error = %err,
                        "record transformation failed"
                    );
                    output.push(OutputRecord::failed(record));
                    failures.push((idx, err));
                }
            }
        }

        info!(
            "BatchTransformer: complete, {} ok, {} failed",
            total - failures.len(),
            failures.len()
        );

        BatchOutput {
            records: output,
            failures,
        }
    }

    /// Handle one delivery-pipeline invocation.
    pub fn handle(&self, event: &TransformationEvent) -> TransformationResponse {
        if let Some(id) = &event.invocation_id {
            debug!(invocation_id = %id, records = event.records.len(), "transformation invocation");
        }
        self.transform(&event.records).into_response()
    }

    /// Raw JSON boundary. Only a structurally invalid request fails here;
    /// individual records never do.
    pub fn handle_json(&self, body: &[u8]) -> Result<Vec<u8>, BatchError> {
        let event: TransformationEvent =
            serde_json::from_slice(body).map_err(BatchError::MalformedRequest)?;
        let response = self.handle(&event);
        serde_json::to_vec(&response).map_err(BatchError::Serialization)
    }

    fn install<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

/// Decode one record and encode the normalized form as a base64 JSON line.
pub fn transform_record(
    decoder: &dyn RecordDecoder,
    record: &InputRecord,
) -> Result<OutputRecord, DecodeError> {
    let normalized = decoder.decode_record(record)?;
    let line = normalized
        .to_json_line()
        .map_err(DecodeError::Serialization)?;
    Ok(OutputRecord::ok(record.record_id.clone(), STANDARD.encode(line)))
}
