//! Lifecycle event publication.
//!
//! [`EventPublisher`] wraps payloads in the CloudEvents envelope and
//! hands the bytes to the lattice client. The envelope `source` and the
//! event subject are read from the host state at call time, so provider
//! instances never cache host identity beyond their own snapshot.
//!
//! Publish failures are logged and swallowed: losing an event must
//! never take down the instance that emitted it.

use crate::host::HostState;
use crate::lattice::SharedLattice;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use wasmbus_events::{subject, CloudEvent};

/// Shared emitter for host and provider lifecycle events.
#[derive(Clone)]
pub struct EventPublisher {
    state: Arc<HostState>,
    lattice: SharedLattice,
}

impl EventPublisher {
    /// Creates a publisher bound to the host state and lattice client.
    #[must_use]
    pub fn new(state: Arc<HostState>, lattice: SharedLattice) -> Self {
        Self { state, lattice }
    }

    /// Publishes one lifecycle event of `kind` with `data` as payload.
    ///
    /// Failures (serialization or lattice) are logged at warn level and
    /// otherwise ignored.
    pub async fn emit<T: Serialize>(&self, kind: &str, data: &T) {
        let source = self.state.host_key();
        let subject = subject::events(&self.state.lattice_prefix());

        let bytes = match CloudEvent::new(source, kind, data).and_then(|e| e.to_bytes()) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(kind, error = %e, "failed to encode lifecycle event");
                return;
            }
        };

        if let Err(e) = self.lattice.publish(&subject, bytes).await {
            warn!(kind, subject = %subject, error = %e, "failed to publish lifecycle event");
        }
    }
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("host_key", &self.state.host_key())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryLattice;
    use serde_json::json;

    #[tokio::test]
    async fn emit_wraps_and_publishes() {
        let lattice = Arc::new(InMemoryLattice::new());
        let state = Arc::new(HostState::new("NHOST", "default", "quiet-otter"));
        let publisher = EventPublisher::new(state, lattice.clone());

        publisher.emit("host_started", &json!({"labels": {}})).await;

        let published = lattice.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].subject, "wasmbus.evt.default");

        let event: CloudEvent = serde_json::from_slice(&published[0].payload).unwrap();
        assert_eq!(event.source, "NHOST");
        assert_eq!(event.kind(), "host_started");
    }

    #[tokio::test]
    async fn emit_survives_publish_failure() {
        let lattice = Arc::new(InMemoryLattice::new().with_closed_publish());
        let state = Arc::new(HostState::new("NHOST", "default", "quiet-otter"));
        let publisher = EventPublisher::new(state, lattice);

        // Must not panic or error out
        publisher.emit("host_stopped", &json!({"labels": {}})).await;
    }
}
