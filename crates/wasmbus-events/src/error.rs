//! Event encoding errors.

use thiserror::Error;
use wasmbus_types::ErrorCode;

/// Errors from envelope construction and serialization.
#[derive(Debug, Clone, Error)]
pub enum EventError {
    /// A payload or envelope could not be serialized to JSON.
    #[error("failed to serialize event '{kind}': {message}")]
    Serialize { kind: String, message: String },
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::Serialize { .. } => "EVENT_SERIALIZE",
        }
    }

    fn is_recoverable(&self) -> bool {
        // A payload that failed to serialize will fail again
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasmbus_types::assert_error_codes;

    #[test]
    fn error_codes_valid() {
        assert_error_codes(
            &[EventError::Serialize {
                kind: "host_started".into(),
                message: "x".into(),
            }],
            "EVENT_",
        );
    }
}
