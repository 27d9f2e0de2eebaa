//! Provider identity types.
//!
//! A provider is addressed within a host by the pair
//! `(public_key, link_name)`. The public key is an opaque signed
//! identity string; the link name is a short caller-chosen string that
//! allows the same binary to be started more than once under different
//! bindings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Link name used when the caller does not supply one.
pub const DEFAULT_LINK_NAME: &str = "default";

/// Identity of a capability provider within a host.
///
/// Two providers with equal identity MUST NOT coexist in one host; the
/// registration tables enforce this at start time.
///
/// # Example
///
/// ```
/// use wasmbus_types::ProviderIdentity;
///
/// let id = ProviderIdentity::new("VAHTTP", "default");
/// assert_eq!(id.public_key, "VAHTTP");
/// assert_eq!(id.to_string(), "VAHTTP/default");
///
/// let defaulted = ProviderIdentity::with_default_link("VAHTTP");
/// assert_eq!(defaulted.link_name, "default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// Opaque signed identity (subject public key).
    pub public_key: String,
    /// Binding name, `"default"` unless the caller chose otherwise.
    pub link_name: String,
}

impl ProviderIdentity {
    /// Creates an identity from its two components.
    #[must_use]
    pub fn new(public_key: impl Into<String>, link_name: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            link_name: link_name.into(),
        }
    }

    /// Creates an identity with [`DEFAULT_LINK_NAME`].
    #[must_use]
    pub fn with_default_link(public_key: impl Into<String>) -> Self {
        Self::new(public_key, DEFAULT_LINK_NAME)
    }

    /// Returns the identity as the `(public_key, link_name)` tuple.
    #[must_use]
    pub fn as_tuple(&self) -> (&str, &str) {
        (&self.public_key, &self.link_name)
    }
}

impl std::fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.public_key, self.link_name)
    }
}

/// Identifier minted for each successful provider start.
///
/// Backed by a UUID v4, so an instance id is never reused across starts,
/// even for the same identity.
///
/// # Example
///
/// ```
/// use wasmbus_types::InstanceId;
///
/// let a = InstanceId::new();
/// let b = InstanceId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

#[allow(clippy::new_without_default)] // minted only at provider start, never implicitly
impl InstanceId {
    /// Mints a new instance id (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_display() {
        let id = ProviderIdentity::new("Vxxx", "backend");
        assert_eq!(id.to_string(), "Vxxx/backend");
    }

    #[test]
    fn identity_equality_is_pairwise() {
        let a = ProviderIdentity::new("Vxxx", "default");
        let b = ProviderIdentity::with_default_link("Vxxx");
        let c = ProviderIdentity::new("Vxxx", "other");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn identity_as_tuple() {
        let id = ProviderIdentity::new("Vxxx", "default");
        assert_eq!(id.as_tuple(), ("Vxxx", "default"));
    }

    #[test]
    fn instance_ids_are_unique() {
        let ids: Vec<InstanceId> = (0..32).map(|_| InstanceId::new()).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn instance_id_serde_is_uuid_text() {
        let id = InstanceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.uuid()));
    }
}
