//! The lattice client seam.
//!
//! The actual bus client (subject-based pub/sub plus request/reply) is
//! an external collaborator; the host only ever talks to this trait.
//! Production wiring supplies a broker-backed implementation; tests use
//! [`crate::testing::InMemoryLattice`]; [`NoopLattice`] stands in when
//! no broker is configured.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use wasmbus_types::ErrorCode;

/// Shared handle to the process-wide lattice client.
pub type SharedLattice = Arc<dyn LatticeClient>;

/// Subject-based messaging used by the host.
///
/// Implementations must be safe to share across all provider instance
/// tasks; `publish` is fire-and-forget, `request` blocks the caller for
/// at most `timeout`.
#[async_trait]
pub trait LatticeClient: Send + Sync {
    /// Publishes `payload` on `subject`.
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), LatticeError>;

    /// Sends a request on `subject` and waits up to `timeout` for any
    /// reply.
    async fn request(
        &self,
        subject: &str,
        payload: Vec<u8>,
        timeout: Duration,
    ) -> Result<Vec<u8>, LatticeError>;
}

/// Errors from the lattice seam.
#[derive(Debug, Clone, Error)]
pub enum LatticeError {
    /// No reply arrived within the request timeout.
    #[error("request on '{subject}' timed out")]
    Timeout { subject: String },

    /// Nothing is listening on the subject.
    #[error("no responders on '{subject}'")]
    NoResponders { subject: String },

    /// The underlying connection is gone.
    #[error("lattice connection closed: {message}")]
    Closed { message: String },
}

impl ErrorCode for LatticeError {
    fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "LATTICE_TIMEOUT",
            Self::NoResponders { .. } => "LATTICE_NO_RESPONDERS",
            Self::Closed { .. } => "LATTICE_CLOSED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // A responder may appear or the broker may answer next time
        !matches!(self, Self::Closed { .. })
    }
}

/// Lattice client used when no broker is wired up.
///
/// Publishes are dropped (logged at trace level); requests report
/// [`LatticeError::NoResponders`] immediately, so health probes read as
/// failing rather than hanging for the full timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLattice;

#[async_trait]
impl LatticeClient for NoopLattice {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), LatticeError> {
        tracing::trace!(subject, bytes = payload.len(), "dropping publish (no lattice)");
        Ok(())
    }

    async fn request(
        &self,
        subject: &str,
        _payload: Vec<u8>,
        _timeout: Duration,
    ) -> Result<Vec<u8>, LatticeError> {
        Err(LatticeError::NoResponders {
            subject: subject.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasmbus_types::assert_error_codes;

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(
            &[
                LatticeError::Timeout {
                    subject: "s".into(),
                },
                LatticeError::NoResponders {
                    subject: "s".into(),
                },
                LatticeError::Closed {
                    message: "gone".into(),
                },
            ],
            "LATTICE_",
        );
    }

    #[tokio::test]
    async fn noop_publish_succeeds() {
        let lattice = NoopLattice;
        assert!(lattice
            .publish("wasmbus.evt.default", b"{}".to_vec())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn noop_request_has_no_responders() {
        let lattice = NoopLattice;
        let result = lattice
            .request("wasmbus.rpc.default.V.default.health", vec![], Duration::from_millis(10))
            .await;
        assert!(matches!(result, Err(LatticeError::NoResponders { .. })));
    }
}
