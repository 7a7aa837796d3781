//! # ddbhistory-dynamodb
//!
//! DynamoDB stream record decoder implementing the `RecordDecoder` trait.
//!
//! ## Implementation notes
//! - `data` is a base64-encoded DynamoDB stream record (the JSON the
//!   table's Kinesis stream destination writes)
//! - `dynamodb.NewImage` / `dynamodb.OldImage` are typed attribute maps;
//!   each value is a single-tag object (`{"S": "..."}`, `{"BOOL": false}`, …)
//! - Untagging is done by `attribute::untag`, the equivalent of the SDK's
//!   `unmarshall`, but lossless for high-precision numbers

pub mod attribute;
pub mod decoder;
pub mod envelope;

pub use attribute::{untag, untag_image, AttributeValue};
pub use decoder::DynamoStreamDecoder;
pub use envelope::{ChangeEnvelope, StreamChange};
