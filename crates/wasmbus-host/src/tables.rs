//! Process-wide registration tables.
//!
//! The tables are the only shared mutable state between the host
//! supervisor and provider instances. Writers are the provider start
//! and teardown paths; everything else reads. The handle registry and
//! the triple table live under a single lock so registration and
//! removal are each one atomic critical section with respect to
//! external observers.
//!
//! ```text
//! ProviderInstance::start ──register()──►┌──────────────────────────┐
//! ProviderInstance teardown ──remove()──►│      ProviderTables      │
//!                                        │  handles + triples (one  │
//! HostSupervisor ──────set_config()─────►│  lock), config snapshot, │
//!                                        │  claims, refmaps, links  │
//! anyone ──────────────lookups──────────►└──────────────────────────┘
//! ```

use crate::config::HostOptions;
use crate::provider::ProviderHandle;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use wasmbus_types::{Claims, InstanceId, LinkDefinition, ProviderIdentity};

use crate::error::ProviderError;

/// A row in the provider handle registry.
#[derive(Debug, Clone)]
pub struct RegistrationRecord {
    /// Capability contract the provider satisfies.
    pub contract_id: String,
    /// Instance id minted for this start.
    pub instance_id: InstanceId,
    /// Live handle to the owning instance task.
    pub handle: ProviderHandle,
}

#[derive(Default)]
struct Registry {
    /// `(public_key, link_name)` → registration record.
    handles: HashMap<ProviderIdentity, RegistrationRecord>,
    /// `(public_key, link_name, contract_id)` presence rows.
    triples: HashSet<(String, String, String)>,
}

/// Shared registration tables, claims, refmaps, and link store.
///
/// Constructed by the host supervisor at init and handed to every
/// provider instance as `Arc<ProviderTables>`; `clear()` at host
/// teardown.
#[derive(Default)]
pub struct ProviderTables {
    registry: RwLock<Registry>,
    config: RwLock<Option<Arc<HostOptions>>>,
    claims: RwLock<HashMap<String, Claims>>,
    refmaps: RwLock<HashMap<String, String>>,
    links: RwLock<Vec<LinkDefinition>>,
}

impl ProviderTables {
    /// Creates empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider identity, atomically inserting the handle
    /// row and the triple row.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::AlreadyRegistered`] when the identity is
    /// present; nothing is modified in that case.
    pub fn register(
        &self,
        identity: &ProviderIdentity,
        contract_id: &str,
        instance_id: InstanceId,
        handle: ProviderHandle,
    ) -> Result<(), ProviderError> {
        let mut registry = self.registry.write();

        if registry.handles.contains_key(identity) {
            return Err(ProviderError::AlreadyRegistered(identity.clone()));
        }

        registry.handles.insert(
            identity.clone(),
            RegistrationRecord {
                contract_id: contract_id.to_string(),
                instance_id,
                handle,
            },
        );
        registry.triples.insert((
            identity.public_key.clone(),
            identity.link_name.clone(),
            contract_id.to_string(),
        ));

        Ok(())
    }

    /// Removes a provider registration, atomically dropping the handle
    /// row and the triple row. Idempotent: removing an absent identity
    /// is a no-op returning `None`.
    pub fn remove(&self, identity: &ProviderIdentity) -> Option<RegistrationRecord> {
        let mut registry = self.registry.write();

        let record = registry.handles.remove(identity)?;
        registry.triples.remove(&(
            identity.public_key.clone(),
            identity.link_name.clone(),
            record.contract_id.clone(),
        ));

        Some(record)
    }

    /// Returns `true` when the identity is registered.
    #[must_use]
    pub fn contains(&self, identity: &ProviderIdentity) -> bool {
        self.registry.read().handles.contains_key(identity)
    }

    /// Returns the live handle for an identity, if registered.
    #[must_use]
    pub fn handle(&self, identity: &ProviderIdentity) -> Option<ProviderHandle> {
        self.registry
            .read()
            .handles
            .get(identity)
            .map(|r| r.handle.clone())
    }

    /// Lists all registrations as `(identity, contract_id, instance_id)`.
    #[must_use]
    pub fn list(&self) -> Vec<(ProviderIdentity, String, InstanceId)> {
        self.registry
            .read()
            .handles
            .iter()
            .map(|(id, r)| (id.clone(), r.contract_id.clone(), r.instance_id))
            .collect()
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.read().handles.len()
    }

    /// Returns `true` when no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.read().handles.is_empty()
    }

    /// Returns the triple rows `(public_key, link_name, contract_id)`.
    #[must_use]
    pub fn triples(&self) -> Vec<(String, String, String)> {
        self.registry.read().triples.iter().cloned().collect()
    }

    /// Stores the immutable host configuration snapshot.
    pub fn set_config(&self, options: Arc<HostOptions>) {
        *self.config.write() = Some(options);
    }

    /// Returns the host configuration snapshot, defaults if unset.
    #[must_use]
    pub fn config(&self) -> Arc<HostOptions> {
        self.config.read().clone().unwrap_or_default()
    }

    /// Stores claims for a provider public key.
    pub fn put_claims(&self, claims: Claims) {
        self.claims.write().insert(claims.public_key.clone(), claims);
    }

    /// Returns claims for a public key, if stored.
    #[must_use]
    pub fn claims_for(&self, public_key: &str) -> Option<Claims> {
        self.claims.read().get(public_key).cloned()
    }

    /// Records an `image_ref → public_key` mapping.
    pub fn record_ref(&self, image_ref: &str, public_key: &str) {
        self.refmaps
            .write()
            .insert(image_ref.to_string(), public_key.to_string());
    }

    /// Resolves an image reference to the public key it was started as.
    #[must_use]
    pub fn lookup_ref(&self, image_ref: &str) -> Option<String> {
        self.refmaps.read().get(image_ref).cloned()
    }

    /// Adds a link definition to the shared link store.
    pub fn put_link(&self, link: LinkDefinition) {
        self.links.write().push(link);
    }

    /// Returns all link definitions bound to `(provider_id, link_name)`.
    #[must_use]
    pub fn links_for(&self, provider_id: &str, link_name: &str) -> Vec<LinkDefinition> {
        self.links
            .read()
            .iter()
            .filter(|l| l.matches(provider_id, link_name))
            .cloned()
            .collect()
    }

    /// Drops every row in every table. Called at host teardown.
    pub fn clear(&self) {
        let mut registry = self.registry.write();
        registry.handles.clear();
        registry.triples.clear();
        drop(registry);

        self.claims.write().clear();
        self.refmaps.write().clear();
        self.links.write().clear();
    }
}
