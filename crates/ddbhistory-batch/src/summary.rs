//! `SummaryReporter`: post-batch aggregate counts for operators.
//!
//! Advisory only: nothing here feeds back into the transformation results.

use crate::engine::BatchOutput;
use ddbhistory_core::summary::BatchSummary;
use tracing::info;

/// Emits the per-batch summary line. Create one per invocation.
#[derive(Debug, Clone)]
pub struct SummaryReporter {
    log_samples: bool,
}

impl SummaryReporter {
    pub fn new(log_samples: bool) -> Self {
        Self { log_samples }
    }

    /// Summarize `output`, emit the summary, and hand it back for metrics.
    pub fn report(&self, output: &BatchOutput) -> BatchSummary {
        let summary = output.summary();
        self.emit(&summary);
        summary
    }

    pub fn emit(&self, summary: &BatchSummary) {
        if self.log_samples {
            if let Some(rec) = &summary.sample_ok {
                info!(
                    record_id = %rec.record_id,
                    result = %rec.status,
                    data = %rec.payload,
                    "sample Ok record"
                );
            }
            if let Some(rec) = &summary.sample_failed {
                info!(
                    record_id = %rec.record_id,
                    result = %rec.status,
                    data = %rec.payload,
                    "sample ProcessingFailed record"
                );
            }
        }

        info!(
            total = summary.total,
            ok = summary.ok,
            failed = summary.failed,
            failures = ?summary.failures_by_kind,
            "Total:{}, OK:{}, NG:{}",
            summary.total,
            summary.ok,
            summary.failed
        );
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new(true)
    }
}
