//! # ddbhistory-core
//!
//! Core traits, types, and primitives shared across all ddbhistory crates.
//! The record decoder, the batch transformer, and the observability layer
//! are all built on top of the interfaces defined here.

pub mod decoder;
pub mod error;
pub mod record;
pub mod summary;
pub mod types;

pub use decoder::RecordDecoder;
pub use error::{BatchError, DecodeError};
pub use record::{InputRecord, KinesisRecordMetadata, NormalizedRecord, OutputRecord, RecordStatus};
pub use summary::BatchSummary;
pub use types::PlainValue;
