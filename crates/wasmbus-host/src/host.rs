//! Host supervisor.
//!
//! The host supervisor owns the process-wide pieces: the registration
//! tables, the configuration snapshot, the merged labels, and the event
//! publisher. Starting it announces the host on the lattice; stopping
//! it purges every provider, announces the shutdown, and waits the
//! configured drain delay so the final event leaves the process before
//! the caller exits.

use crate::config::{env_labels, platform_labels, HostOptions};
use crate::events::EventPublisher;
use crate::friendly::friendly_name;
use crate::lattice::SharedLattice;
use crate::provider::ProviderSupervisor;
use crate::tables::ProviderTables;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use wasmbus_events::{subject, HostStarted, HostStopped};

/// Shared, read-mostly host identity and runtime state.
///
/// Provider instances and the event publisher read `host_key` and
/// `lattice_prefix` through these accessors at call time instead of
/// caching them.
pub struct HostState {
    host_key: String,
    lattice_prefix: String,
    friendly_name: String,
    labels: RwLock<HashMap<String, String>>,
    supplemental_config: RwLock<Option<serde_json::Value>>,
}

impl HostState {
    /// Creates state with empty labels and no supplemental config.
    #[must_use]
    pub fn new(
        host_key: impl Into<String>,
        lattice_prefix: impl Into<String>,
        friendly_name: impl Into<String>,
    ) -> Self {
        Self {
            host_key: host_key.into(),
            lattice_prefix: lattice_prefix.into(),
            friendly_name: friendly_name.into(),
            labels: RwLock::new(HashMap::new()),
            supplemental_config: RwLock::new(None),
        }
    }

    /// This host's public key.
    #[must_use]
    pub fn host_key(&self) -> String {
        self.host_key.clone()
    }

    /// The lattice namespace partition.
    #[must_use]
    pub fn lattice_prefix(&self) -> String {
        self.lattice_prefix.clone()
    }

    /// The deterministic two-word host name.
    #[must_use]
    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    /// A snapshot of the current labels.
    #[must_use]
    pub fn labels(&self) -> HashMap<String, String> {
        self.labels.read().clone()
    }

    /// Replaces the label set.
    pub fn set_labels(&self, labels: HashMap<String, String>) {
        *self.labels.write() = labels;
    }

    /// The supplemental configuration fetched at boot, if any.
    #[must_use]
    pub fn supplemental_config(&self) -> Option<serde_json::Value> {
        self.supplemental_config.read().clone()
    }

    fn set_supplemental_config(&self, config: serde_json::Value) {
        *self.supplemental_config.write() = Some(config);
    }
}

/// Process-wide host lifecycle owner.
pub struct HostSupervisor {
    state: Arc<HostState>,
    options: Arc<HostOptions>,
    tables: Arc<ProviderTables>,
    lattice: SharedLattice,
    publisher: EventPublisher,
    providers: ProviderSupervisor,
}

impl HostSupervisor {
    /// Boots the host: merges labels, initializes the tables and the
    /// configuration snapshot, publishes `host_started`, and fetches
    /// supplemental configuration when the config service is enabled.
    ///
    /// A missing `host_key` is generated on the spot so the host always
    /// has an identity to stamp events with.
    pub async fn start(mut options: HostOptions, lattice: SharedLattice) -> Self {
        if options.host_key.is_empty() {
            options.host_key = generate_host_key();
            debug!(host_key = %options.host_key, "generated host key");
        }

        // Environment labels win over platform-detected ones.
        let mut labels = platform_labels();
        labels.extend(env_labels());

        let state = Arc::new(HostState::new(
            &options.host_key,
            &options.lattice_prefix,
            friendly_name(&options.host_key),
        ));
        state.set_labels(labels.clone());

        let options = Arc::new(options);
        let tables = Arc::new(ProviderTables::new());
        tables.set_config(Arc::clone(&options));

        let publisher = EventPublisher::new(Arc::clone(&state), Arc::clone(&lattice));
        let providers = ProviderSupervisor::new(
            Arc::clone(&tables),
            publisher.clone(),
            Arc::clone(&lattice),
            Arc::clone(&options),
        );

        let host = Self {
            state,
            options,
            tables,
            lattice,
            publisher,
            providers,
        };

        info!(
            host_key = %host.state.host_key(),
            friendly_name = %host.state.friendly_name(),
            lattice_prefix = %host.state.lattice_prefix(),
            "host started"
        );

        host.publisher
            .emit(
                HostStarted::KIND,
                &HostStarted {
                    labels,
                    friendly_name: host.state.friendly_name().to_string(),
                },
            )
            .await;

        if host.options.config_service_enabled {
            host.fetch_supplemental_config().await;
        }

        host
    }

    /// The provider subsystem.
    #[must_use]
    pub fn providers(&self) -> &ProviderSupervisor {
        &self.providers
    }

    /// Shared host state (identity accessors, labels).
    #[must_use]
    pub fn state(&self) -> Arc<HostState> {
        Arc::clone(&self.state)
    }

    /// The registration tables.
    #[must_use]
    pub fn tables(&self) -> Arc<ProviderTables> {
        Arc::clone(&self.tables)
    }

    /// Terminates every supervised provider.
    pub async fn purge(&self) {
        self.providers.terminate_all().await;
    }

    /// Stops the host: purge, `host_stopped`, drain delay, table
    /// teardown. The caller exits the process afterwards.
    pub async fn stop(self) {
        info!(host_key = %self.state.host_key(), "host stopping");

        self.purge().await;

        self.publisher
            .emit(
                HostStopped::KIND,
                &HostStopped {
                    labels: self.state.labels(),
                },
            )
            .await;

        // Let the final event drain before the process goes away.
        tokio::time::sleep(self.options.provider_delay()).await;

        self.tables.clear();
    }

    /// Asks the config service for supplemental configuration, sending
    /// the host labels as the request payload. Absence of the service
    /// is tolerated.
    async fn fetch_supplemental_config(&self) {
        let subject = subject::config_service(&self.state.lattice_prefix());
        let payload = match serde_json::to_vec(&self.state.labels()) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "failed to encode config service payload");
                return;
            }
        };

        match self
            .lattice
            .request(&subject, payload, self.options.rpc_timeout())
            .await
        {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(config) => {
                    info!("applied supplemental configuration");
                    self.state.set_supplemental_config(config);
                }
                Err(e) => debug!(error = %e, "config service reply was not JSON"),
            },
            Err(e) => debug!(error = %e, "config service unavailable"),
        }
    }
}

/// Generates a fresh host public key.
fn generate_host_key() -> String {
    format!("N{}", Uuid::new_v4().simple().to_string().to_uppercase())
}
