//! ddbhistory metrics definitions.
//!
//! All metrics use OpenTelemetry conventions. Without a global meter
//! provider installed they are no-ops.

use ddbhistory_core::summary::BatchSummary;
use opentelemetry::{
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Central metrics handle for ddbhistory.
#[derive(Clone)]
pub struct TransformMetrics {
    pub records_ok: Counter<u64>,
    pub records_failed: Counter<u64>,
    pub batch_size: Histogram<u64>,
    pub transform_latency_ms: Histogram<f64>,
}

impl TransformMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            records_ok: meter
                .u64_counter("ddbhistory.records_ok")
                .with_description("Records transformed successfully")
                .init(),
            records_failed: meter
                .u64_counter("ddbhistory.records_failed")
                .with_description("Records returned as ProcessingFailed")
                .init(),
            batch_size: meter
                .u64_histogram("ddbhistory.batch_size")
                .with_description("Number of records in a transformation batch")
                .init(),
            transform_latency_ms: meter
                .f64_histogram("ddbhistory.transform_latency_ms")
                .with_description("Time to transform one batch in milliseconds")
                .init(),
        }
    }

    /// Metrics handle bound to the global meter provider.
    pub fn global() -> Self {
        Self::new(&opentelemetry::global::meter("ddbhistory"))
    }

    pub fn record_summary(&self, summary: &BatchSummary, source_format: &str) {
        let source = KeyValue::new("source", source_format.to_string());
        self.batch_size.record(summary.total as u64, &[source.clone()]);
        self.records_ok.add(summary.ok as u64, &[source.clone()]);
        for (kind, count) in &summary.failures_by_kind {
            self.records_failed.add(
                *count as u64,
                &[source.clone(), KeyValue::new("error_kind", *kind)],
            );
        }
    }

    pub fn record_latency(&self, ms: f64, source_format: &str) {
        self.transform_latency_ms
            .record(ms, &[KeyValue::new("source", source_format.to_string())]);
    }
}
