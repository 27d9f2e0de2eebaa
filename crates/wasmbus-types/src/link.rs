//! Link definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A binding between an actor and a provider identity.
///
/// Link definitions carry the per-binding configuration values a
/// provider needs to serve a particular actor (listen ports, bucket
/// names, ...). At provider start, every definition matching the
/// starting `(provider_id, link_name)` is included in the host
/// descriptor so the provider can come up with its existing links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDefinition {
    /// Actor public key.
    pub actor_id: String,
    /// Provider public key.
    pub provider_id: String,
    /// Binding name.
    pub link_name: String,
    /// Capability contract (e.g. `wasmcloud:httpserver`).
    pub contract_id: String,
    /// Per-binding configuration values.
    #[serde(default)]
    pub values: HashMap<String, String>,
}

impl LinkDefinition {
    /// Returns `true` if this definition binds the given provider
    /// identity.
    #[must_use]
    pub fn matches(&self, provider_id: &str, link_name: &str) -> bool {
        self.provider_id == provider_id && self.link_name == link_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_by_provider_and_link() {
        let link = LinkDefinition {
            actor_id: "Mxxx".into(),
            provider_id: "Vxxx".into(),
            link_name: "default".into(),
            contract_id: "wasmcloud:keyvalue".into(),
            values: HashMap::new(),
        };

        assert!(link.matches("Vxxx", "default"));
        assert!(!link.matches("Vxxx", "other"));
        assert!(!link.matches("Vyyy", "default"));
    }
}
