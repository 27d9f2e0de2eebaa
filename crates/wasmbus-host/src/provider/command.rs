//! Commands delivered to a provider instance's inbox.
//!
//! Everything that happens to an instance flows through one bounded
//! mpsc channel, so queries, halts, health probes, and child-exit
//! notifications are totally ordered per instance. Commands carry a
//! `oneshot` reply sender; a dropped reply means the caller went away
//! and is ignored.

use std::collections::HashMap;
use tokio::sync::oneshot;

/// A command for one provider instance.
#[derive(Debug)]
pub enum ProviderCommand {
    /// Terminate the provider. The reply is sent only after the
    /// `provider_stopped` event has been handed to the lattice client.
    Halt {
        /// Completion acknowledgement.
        reply: oneshot::Sender<()>,
    },

    /// Query the per-start instance id.
    InstanceId {
        /// Reply with the UUID text.
        reply: oneshot::Sender<String>,
    },

    /// Query the annotations the provider was started with.
    Annotations {
        /// Reply with the annotation map.
        reply: oneshot::Sender<HashMap<String, String>>,
    },

    /// Query the OCI/bindle reference the provider was started from.
    OciRef {
        /// Reply with the reference, or the dead sentinel when the
        /// provider was started from a local path.
        reply: oneshot::Sender<String>,
    },

    /// Query the executable path.
    Path {
        /// Reply with the path as text.
        reply: oneshot::Sender<String>,
    },
}
