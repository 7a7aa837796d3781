//! # ddbhistory-observability
//!
//! OpenTelemetry-based observability for ddbhistory.
//!
//! ## Built-in metrics
//! - `ddbhistory.records_ok`: counter, tagged with source format
//! - `ddbhistory.records_failed`: counter, tagged with source format + error_kind
//! - `ddbhistory.batch_size`: histogram
//! - `ddbhistory.transform_latency_ms`: histogram, whole-batch wall time
//!
//! ## Structured logging
//! JSON-structured logs compatible with CloudWatch, Loki, ELK.
//! Log levels configurable per component.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::TransformMetrics;
pub use tracing_setup::{init_tracing, LogConfig};
