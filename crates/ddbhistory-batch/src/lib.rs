//! # ddbhistory-batch
//!
//! Batch transformation engine for the delivery pipeline's processing hook.
//!
//! ## Features
//! - Strict one-to-one output: same count, same order, same `recordId`s
//! - Per-record isolation: a failed record never affects its siblings
//! - CPU-parallel decoding via Rayon, chunked for bounded memory
//! - Post-batch summary (counts plus one sample per outcome)
//!
//! ## Usage
//! ```no_run
//! use ddbhistory_batch::{BatchTransformer, SummaryReporter};
//! use ddbhistory_dynamodb::DynamoStreamDecoder;
//! use std::sync::Arc;
//!
//! let transformer = BatchTransformer::new(Arc::new(DynamoStreamDecoder::new()));
//! // let output = transformer.transform(&event.records);
//! // SummaryReporter::default().report(&output);
//! ```

pub mod config;
pub mod engine;
pub mod request;
pub mod summary;

pub use config::{ConfigError, TransformerConfig};
pub use engine::{transform_record, BatchOutput, BatchTransformer};
pub use request::{TransformationEvent, TransformationResponse};
pub use summary::SummaryReporter;
