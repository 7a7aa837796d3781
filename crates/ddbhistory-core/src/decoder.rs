//! The core `RecordDecoder` trait.
//!
//! Every source format implements `RecordDecoder`. The trait is object-safe
//! so decoders can be stored as `Arc<dyn RecordDecoder>` in the batch
//! transformer and shared across Rayon workers.

use crate::error::DecodeError;
use crate::record::{InputRecord, NormalizedRecord};

/// Converts one input record into one normalized record.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` and must not keep mutable state
/// between calls: the batch transformer decodes sibling records in parallel.
pub trait RecordDecoder: Send + Sync {
    /// Short name of the envelope format this decoder understands.
    fn source_format(&self) -> &'static str;

    /// Decode a single record. Pure: the same input always yields the same
    /// output.
    fn decode_record(&self, record: &InputRecord) -> Result<NormalizedRecord, DecodeError>;
}
