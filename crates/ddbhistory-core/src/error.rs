//! Error types for the ddbhistory transformation pipeline.

use thiserror::Error;

/// Errors that can occur while decoding a single record.
///
/// These never escape a record boundary: the batch transformer turns every
/// one of them into a `ProcessingFailed` output for that record only.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed encoding: {reason}")]
    MalformedEncoding { reason: String },

    #[error("Malformed JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid attribute tag on '{attribute}': {reason}")]
    InvalidAttributeTag { attribute: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl DecodeError {
    /// Stable label for logs and metric attributes.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::MalformedEncoding { .. } => "malformed_encoding",
            DecodeError::MalformedJson(_) => "malformed_json",
            DecodeError::MissingField { .. } => "missing_field",
            DecodeError::InvalidAttributeTag { .. } => "invalid_attribute_tag",
            DecodeError::Serialization(_) => "serialization",
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        DecodeError::MissingField { field: field.into() }
    }

    pub fn invalid_tag(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        DecodeError::InvalidAttributeTag {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that fail a batch invocation as a whole.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Malformed transformation request: {0}")]
    MalformedRequest(#[source] serde_json::Error),

    #[error("Failed to build worker pool: {reason}")]
    ThreadPool { reason: String },

    #[error("Failed to serialize transformation response: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Transformation of {total} records cancelled before completion")]
    Cancelled { total: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(DecodeError::missing("dynamodb").kind(), "missing_field");
        assert_eq!(
            DecodeError::invalid_tag("active", "unknown variant `BOOLEAN`").kind(),
            "invalid_attribute_tag"
        );
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(DecodeError::MalformedJson(json_err).kind(), "malformed_json");
    }

    #[test]
    fn display_names_the_attribute() {
        let err = DecodeError::invalid_tag("product", "expected exactly one tag");
        assert_eq!(
            err.to_string(),
            "Invalid attribute tag on 'product': expected exactly one tag"
        );
    }
}
