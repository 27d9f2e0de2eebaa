//! Test doubles for the lattice seam.
//!
//! [`InMemoryLattice`] records every publish and answers requests from
//! scripted per-subject outcome queues, which is enough to drive the
//! whole provider lifecycle without a broker:
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use wasmbus_host::testing::{InMemoryLattice, RequestOutcome};
//! use wasmbus_host::LatticeClient;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let lattice = InMemoryLattice::new();
//! lattice.script_request("wasmbus.rpc.default.V.default.health", RequestOutcome::Reply(vec![]));
//!
//! let reply = lattice
//!     .request("wasmbus.rpc.default.V.default.health", vec![], Duration::from_millis(10))
//!     .await;
//! assert!(reply.is_ok());
//! # }
//! ```

use crate::lattice::{LatticeClient, LatticeError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use wasmbus_events::CloudEvent;

/// One recorded publish or request.
#[derive(Debug, Clone)]
pub struct RecordedMessage {
    /// Subject the message went out on.
    pub subject: String,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

/// Scripted outcome for one request on a subject.
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    /// Reply with these bytes.
    Reply(Vec<u8>),
    /// Let the request time out.
    Timeout,
}

/// Recording in-memory lattice client.
pub struct InMemoryLattice {
    published: Mutex<Vec<RecordedMessage>>,
    requests: Mutex<Vec<RecordedMessage>>,
    scripts: Mutex<HashMap<String, VecDeque<RequestOutcome>>>,
    closed_publish: bool,
}

impl InMemoryLattice {
    /// Creates an empty recorder. Unscripted requests time out.
    #[must_use]
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            scripts: Mutex::new(HashMap::new()),
            closed_publish: false,
        }
    }

    /// Makes every publish fail with [`LatticeError::Closed`], for
    /// exercising the publish-failures-are-not-fatal policy.
    #[must_use]
    pub fn with_closed_publish(mut self) -> Self {
        self.closed_publish = true;
        self
    }

    /// Queues one outcome for the next request on `subject`.
    pub fn script_request(&self, subject: &str, outcome: RequestOutcome) {
        self.scripts
            .lock()
            .entry(subject.to_string())
            .or_default()
            .push_back(outcome);
    }

    /// Queues several outcomes at once, consumed in order.
    pub fn script_requests<I>(&self, subject: &str, outcomes: I)
    where
        I: IntoIterator<Item = RequestOutcome>,
    {
        let mut scripts = self.scripts.lock();
        let queue = scripts.entry(subject.to_string()).or_default();
        queue.extend(outcomes);
    }

    /// Returns every publish recorded so far.
    #[must_use]
    pub fn published(&self) -> Vec<RecordedMessage> {
        self.published.lock().clone()
    }

    /// Returns every request recorded so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedMessage> {
        self.requests.lock().clone()
    }

    /// Returns the decoded CloudEvents among the published messages
    /// whose bare kind equals `kind`, in publish order.
    #[must_use]
    pub fn events_of_kind(&self, kind: &str) -> Vec<CloudEvent> {
        self.published
            .lock()
            .iter()
            .filter_map(|m| serde_json::from_slice::<CloudEvent>(&m.payload).ok())
            .filter(|e| e.kind() == kind)
            .collect()
    }

    /// Polls until at least `count` events of `kind` were published, or
    /// the deadline passes. Returns whether the count was reached.
    pub async fn wait_for_kind(&self, kind: &str, count: usize, deadline: Duration) -> bool {
        let poll = Duration::from_millis(10);
        let mut waited = Duration::ZERO;
        loop {
            if self.events_of_kind(kind).len() >= count {
                return true;
            }
            if waited >= deadline {
                return false;
            }
            tokio::time::sleep(poll).await;
            waited += poll;
        }
    }
}

impl Default for InMemoryLattice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LatticeClient for InMemoryLattice {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), LatticeError> {
        if self.closed_publish {
            return Err(LatticeError::Closed {
                message: "test lattice closed".into(),
            });
        }
        self.published.lock().push(RecordedMessage {
            subject: subject.to_string(),
            payload,
        });
        Ok(())
    }

    async fn request(
        &self,
        subject: &str,
        payload: Vec<u8>,
        _timeout: Duration,
    ) -> Result<Vec<u8>, LatticeError> {
        self.requests.lock().push(RecordedMessage {
            subject: subject.to_string(),
            payload,
        });

        let outcome = self
            .scripts
            .lock()
            .get_mut(subject)
            .and_then(VecDeque::pop_front);

        match outcome {
            Some(RequestOutcome::Reply(bytes)) => Ok(bytes),
            Some(RequestOutcome::Timeout) | None => Err(LatticeError::Timeout {
                subject: subject.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_publishes() {
        let lattice = InMemoryLattice::new();
        lattice.publish("a.b", b"one".to_vec()).await.unwrap();
        lattice.publish("a.c", b"two".to_vec()).await.unwrap();

        let published = lattice.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].subject, "a.b");
        assert_eq!(published[1].payload, b"two");
    }

    #[tokio::test]
    async fn scripted_outcomes_consumed_in_order() {
        let lattice = InMemoryLattice::new();
        lattice.script_requests(
            "probe",
            [
                RequestOutcome::Reply(b"ok".to_vec()),
                RequestOutcome::Timeout,
            ],
        );

        let first = lattice.request("probe", vec![], Duration::ZERO).await;
        assert_eq!(first.unwrap(), b"ok");

        let second = lattice.request("probe", vec![], Duration::ZERO).await;
        assert!(matches!(second, Err(LatticeError::Timeout { .. })));

        // Exhausted script falls back to timeout
        let third = lattice.request("probe", vec![], Duration::ZERO).await;
        assert!(matches!(third, Err(LatticeError::Timeout { .. })));
    }

    #[tokio::test]
    async fn closed_publish_errors() {
        let lattice = InMemoryLattice::new().with_closed_publish();
        let result = lattice.publish("a.b", vec![]).await;
        assert!(matches!(result, Err(LatticeError::Closed { .. })));
    }
}
