//! Provider supervisor.
//!
//! The factory/registry for provider instances. Identity uniqueness is
//! enforced by the registration tables, so the supervisor itself holds
//! no state beyond the shared pieces it wires into every instance.
//!
//! Restart policy is transient: a crashed instance removes its
//! registration and is never respawned here; the caller recovers with a
//! new `start_provider`.

use crate::config::HostOptions;
use crate::error::ProviderError;
use crate::events::EventPublisher;
use crate::lattice::SharedLattice;
use crate::provider::instance::{ProviderHandle, ProviderInstance, ProviderSpec};
use crate::tables::ProviderTables;
use std::sync::Arc;
use tracing::{debug, info};
use wasmbus_types::{InstanceId, ProviderIdentity};

/// Factory and registry for running provider instances.
pub struct ProviderSupervisor {
    tables: Arc<ProviderTables>,
    publisher: EventPublisher,
    lattice: SharedLattice,
    options: Arc<HostOptions>,
}

impl ProviderSupervisor {
    /// Creates a supervisor over the shared host pieces.
    pub(crate) fn new(
        tables: Arc<ProviderTables>,
        publisher: EventPublisher,
        lattice: SharedLattice,
        options: Arc<HostOptions>,
    ) -> Self {
        Self {
            tables,
            publisher,
            lattice,
            options,
        }
    }

    /// Starts a provider and returns its handle.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::AlreadyRegistered`] when the identity is
    ///   already running in this host
    /// - [`ProviderError::SpawnFailed`] when the executable cannot be
    ///   spawned or bootstrapped
    pub async fn start_provider(&self, spec: ProviderSpec) -> Result<ProviderHandle, ProviderError> {
        debug!(
            provider_id = %spec.claims.public_key,
            link_name = %spec.link_name,
            contract_id = %spec.contract_id,
            "starting provider"
        );

        ProviderInstance::start(
            spec,
            Arc::clone(&self.tables),
            self.publisher.clone(),
            Arc::clone(&self.lattice),
        )
        .await
    }

    /// Stops the provider with the given identity. A no-op when nothing
    /// is registered under it.
    pub async fn stop(&self, identity: &ProviderIdentity) {
        if let Some(handle) = self.tables.handle(identity) {
            handle.halt().await;
        }
    }

    /// Halts every running provider, one after another. Does not wait
    /// for child reaping beyond SIGKILL issuance inside each halt.
    pub async fn terminate_all(&self) {
        let running = self.tables.list();
        if running.is_empty() {
            return;
        }

        info!(count = running.len(), "terminating all providers");
        for (identity, _, _) in running {
            self.stop(&identity).await;
        }
    }

    /// Lists running providers as `(identity, contract_id, instance_id)`.
    #[must_use]
    pub fn list(&self) -> Vec<(ProviderIdentity, String, InstanceId)> {
        self.tables.list()
    }

    /// Number of running providers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tables.len()
    }

    /// The host options snapshot this supervisor starts providers with.
    #[must_use]
    pub fn options(&self) -> &HostOptions {
        &self.options
    }
}

impl std::fmt::Debug for ProviderSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSupervisor")
            .field("running", &self.count())
            .finish_non_exhaustive()
    }
}
