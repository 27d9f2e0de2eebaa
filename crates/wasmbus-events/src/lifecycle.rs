//! Typed payloads for host and provider lifecycle events.
//!
//! Each struct here is the `data` member of a [`CloudEvent`]
//! (see [`crate::envelope`]); the associated `KIND` constants are the
//! bare event kinds that become `com.wasmcloud.lattice.<kind>`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use wasmbus_types::Claims;

/// Payload of `host_started`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStarted {
    /// Merged host labels (environment over platform-detected).
    pub labels: HashMap<String, String>,
    /// Deterministic two-word host name.
    pub friendly_name: String,
}

impl HostStarted {
    /// Event kind for the envelope `type`.
    pub const KIND: &'static str = "host_started";
}

/// Payload of `host_stopped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStopped {
    /// Labels at the moment of shutdown.
    pub labels: HashMap<String, String>,
}

impl HostStopped {
    /// Event kind for the envelope `type`.
    pub const KIND: &'static str = "host_stopped";
}

/// Claims subset carried inside `provider_started`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsSummary {
    pub issuer: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub not_before_human: Option<String>,
    pub expires_human: Option<String>,
}

impl From<&Claims> for ClaimsSummary {
    fn from(claims: &Claims) -> Self {
        Self {
            issuer: claims.issuer.clone(),
            tags: claims.tags.clone(),
            name: claims.name.clone(),
            version: claims.version.clone(),
            not_before_human: claims.not_before_human.clone(),
            expires_human: claims.expires_human.clone(),
        }
    }
}

/// Payload of `provider_started`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStarted {
    pub public_key: String,
    /// OCI or bindle reference, empty when started from a local path.
    pub image_ref: String,
    pub link_name: String,
    pub contract_id: String,
    /// Freshly minted per-start instance id (UUID v4 text).
    pub instance_id: String,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    pub claims: ClaimsSummary,
}

impl ProviderStarted {
    /// Event kind for the envelope `type`.
    pub const KIND: &'static str = "provider_started";
}

/// Payload of `provider_stopped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStopped {
    pub public_key: String,
    pub link_name: String,
    pub contract_id: String,
    pub instance_id: String,
    /// `"normal"` for voluntary halts and clean exits, otherwise the
    /// stringified exit status or signal name.
    pub reason: String,
}

impl ProviderStopped {
    /// Event kind for the envelope `type`.
    pub const KIND: &'static str = "provider_stopped";
}

/// Payload of `health_check_passed` / `health_check_failed`.
///
/// The two kinds share one payload shape; the edge direction is carried
/// by the envelope `type` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub public_key: String,
    pub link_name: String,
}

impl HealthCheck {
    /// Event kind emitted on the false→true health edge.
    pub const PASSED_KIND: &'static str = "health_check_passed";
    /// Event kind emitted on the true→false health edge.
    pub const FAILED_KIND: &'static str = "health_check_failed";

    /// Creates the payload for a provider identity.
    #[must_use]
    pub fn new(public_key: impl Into<String>, link_name: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            link_name: link_name.into(),
        }
    }
}
