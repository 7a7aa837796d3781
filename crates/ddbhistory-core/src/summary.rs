//! Post-batch aggregate counts.

use crate::error::DecodeError;
use crate::record::{OutputRecord, RecordStatus};
use std::collections::BTreeMap;

/// Aggregate view of one completed batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
    /// First `Ok` record of the batch, if any
    pub sample_ok: Option<OutputRecord>,
    /// First `ProcessingFailed` record of the batch, if any
    pub sample_failed: Option<OutputRecord>,
    /// error kind → count
    pub failures_by_kind: BTreeMap<&'static str, usize>,
}

impl BatchSummary {
    /// Summarize the ordered output of a batch plus the `(index, error)`
    /// pairs collected for its failed records.
    pub fn from_records(records: &[OutputRecord], failures: &[(usize, DecodeError)]) -> Self {
        let mut summary = BatchSummary {
            total: records.len(),
            ..Default::default()
        };

        for rec in records {
            match rec.status {
                RecordStatus::Ok => {
                    summary.ok += 1;
                    if summary.sample_ok.is_none() {
                        summary.sample_ok = Some(rec.clone());
                    }
                }
                RecordStatus::ProcessingFailed => {
                    summary.failed += 1;
                    if summary.sample_failed.is_none() {
                        summary.sample_failed = Some(rec.clone());
                    }
                }
            }
        }

        for (_, err) in failures {
            *summary.failures_by_kind.entry(err.kind()).or_default() += 1;
        }

        summary
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
