//! Signed provider metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Claims associated with a capability provider.
///
/// Claims arrive already verified; this host fragment treats them as
/// trusted metadata and never re-checks signatures (verification is an
/// explicit non-goal).
///
/// # Example
///
/// ```
/// use wasmbus_types::Claims;
///
/// let claims = Claims::new("VAHTTP", "AISSUER")
///     .with_name("HTTP Server")
///     .with_version("0.14.2")
///     .with_tag("web");
///
/// assert_eq!(claims.public_key, "VAHTTP");
/// assert!(claims.tags.contains("web"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject public key; matches the provider identity.
    pub public_key: String,
    /// Issuer account key.
    pub issuer: String,
    /// Human-readable provider name.
    pub name: Option<String>,
    /// Provider version string.
    pub version: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Human-readable not-before timestamp.
    pub not_before_human: Option<String>,
    /// Human-readable expiry timestamp.
    pub expires_human: Option<String>,
}

impl Claims {
    /// Creates claims with the two required keys.
    #[must_use]
    pub fn new(public_key: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            issuer: issuer.into(),
            ..Self::default()
        }
    }

    /// Sets the provider name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the provider version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a single tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Sets the human-readable validity window.
    #[must_use]
    pub fn with_validity(
        mut self,
        not_before: impl Into<String>,
        expires: impl Into<String>,
    ) -> Self {
        self.not_before_human = Some(not_before.into());
        self.expires_human = Some(expires.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chain() {
        let claims = Claims::new("Vxxx", "Axxx")
            .with_name("kv")
            .with_version("1.0.0")
            .with_tag("storage")
            .with_tag("kv")
            .with_validity("never", "never");

        assert_eq!(claims.name.as_deref(), Some("kv"));
        assert_eq!(claims.tags.len(), 2);
        assert_eq!(claims.expires_human.as_deref(), Some("never"));
    }

    #[test]
    fn tags_default_empty_on_deserialize() {
        let claims: Claims =
            serde_json::from_str(r#"{"public_key":"V","issuer":"A"}"#).unwrap();
        assert!(claims.tags.is_empty());
        assert!(claims.name.is_none());
    }
}
