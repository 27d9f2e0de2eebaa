//! The host descriptor handed to a starting provider.
//!
//! Immediately after spawn, the host writes exactly one line to the
//! child's stdin: `base64(json(descriptor)) + "\n"`. The child decodes
//! the Base64, parses the JSON, and uses the result to dial the lattice
//! and serve its existing links.

use crate::config::HostOptions;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use wasmbus_types::{InstanceId, LinkDefinition, ProviderIdentity};

/// Bootstrap document a provider reads from its stdin.
///
/// # Example
///
/// ```
/// use wasmbus_host::{HostDescriptor, HostOptions};
/// use wasmbus_types::{InstanceId, ProviderIdentity};
///
/// let options = HostOptions::default();
/// let identity = ProviderIdentity::with_default_link("VAHTTP");
/// let descriptor =
///     HostDescriptor::for_start(&options, &identity, InstanceId::new(), None, Vec::new());
///
/// let line = descriptor.encode_line().unwrap();
/// let decoded = HostDescriptor::decode_line(&line).unwrap();
/// assert_eq!(decoded, descriptor);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostDescriptor {
    /// Public key of the host performing the start.
    pub host_id: String,
    /// Lattice namespace partition.
    pub lattice_rpc_prefix: String,
    /// Binding name the provider was started under.
    pub link_name: String,
    /// The provider's own public key.
    pub provider_key: String,
    /// Per-start instance id (UUID v4 text).
    pub instance_id: String,
    /// Broker address the provider should dial, `host:port`.
    pub lattice_rpc_url: String,
    /// User JWT for the RPC connection; may be empty.
    pub lattice_rpc_user_jwt: String,
    /// User seed for the RPC connection; may be empty.
    pub lattice_rpc_user_seed: String,
    /// Whether the RPC connection uses TLS.
    pub lattice_rpc_tls: bool,
    /// Invocation timeout the provider should assume.
    pub default_rpc_timeout_ms: u64,
    /// Issuers trusted for invocations, in priority order.
    pub cluster_issuers: Vec<String>,
    /// Seed for signing invocations.
    pub invocation_seed: String,
    /// Optional JetStream domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub js_domain: Option<String>,
    /// Whether the provider should emit structured logs. Tolerates the
    /// string spellings `"true"` / `"false"` on decode.
    #[serde(deserialize_with = "bool_or_string")]
    pub enable_structured_logging: bool,
    /// Reserved for backward compatibility; always empty.
    pub env_values: HashMap<String, String>,
    /// Opaque configuration string supplied by the start caller.
    pub config_json: String,
    /// Link definitions bound to this provider identity at start time.
    pub link_definitions: Vec<LinkDefinition>,
}

impl HostDescriptor {
    /// Assembles the descriptor for one provider start.
    ///
    /// Missing optional inputs always yield the complete default field
    /// set; the descriptor never has holes.
    #[must_use]
    pub fn for_start(
        options: &HostOptions,
        identity: &ProviderIdentity,
        instance_id: InstanceId,
        config_json: Option<String>,
        link_definitions: Vec<LinkDefinition>,
    ) -> Self {
        Self {
            host_id: options.host_key.clone(),
            lattice_rpc_prefix: options.lattice_prefix.clone(),
            link_name: identity.link_name.clone(),
            provider_key: identity.public_key.clone(),
            instance_id: instance_id.to_string(),
            lattice_rpc_url: options.prov_rpc_url(),
            lattice_rpc_user_jwt: options.prov_rpc_jwt.clone(),
            lattice_rpc_user_seed: options.prov_rpc_seed.clone(),
            lattice_rpc_tls: options.prov_rpc_tls,
            default_rpc_timeout_ms: options.rpc_timeout_ms,
            cluster_issuers: options.cluster_issuers.clone(),
            invocation_seed: options.cluster_seed.clone(),
            js_domain: options.js_domain.clone(),
            enable_structured_logging: options.enable_structured_logging,
            env_values: HashMap::new(),
            config_json: config_json.unwrap_or_default(),
            link_definitions,
        }
    }

    /// Encodes the descriptor as the single stdin line, trailing
    /// newline included.
    ///
    /// # Errors
    ///
    /// Returns the underlying serialization error; with the field types
    /// above this cannot fail in practice.
    pub fn encode_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(format!("{}\n", BASE64.encode(json)))
    }

    /// Decodes a stdin line back into a descriptor.
    ///
    /// The inverse of [`encode_line`](Self::encode_line); used by tests
    /// and provider-side tooling.
    pub fn decode_line(line: &str) -> Result<Self, DescriptorDecodeError> {
        let bytes = BASE64
            .decode(line.trim())
            .map_err(|e| DescriptorDecodeError::Base64(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| DescriptorDecodeError::Json(e.to_string()))
    }
}

/// Failure decoding a descriptor stdin line.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DescriptorDecodeError {
    #[error("invalid base64: {0}")]
    Base64(String),
    #[error("invalid descriptor JSON: {0}")]
    Json(String),
}

/// Accepts a JSON bool or the strings `"true"` / `"false"`.
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Text(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Text(s) => match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected bool or \"true\"/\"false\", got {other:?}"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HostDescriptor {
        let mut options = HostOptions::default();
        options.host_key = "NHOST".into();
        options.cluster_issuers = vec!["CAAA".into()];
        options.cluster_seed = "SCSEED".into();
        options.js_domain = Some("core".into());

        HostDescriptor::for_start(
            &options,
            &ProviderIdentity::with_default_link("VAHTTP"),
            InstanceId::new(),
            Some(r#"{"port":8080}"#.to_string()),
            vec![LinkDefinition {
                actor_id: "Mxxx".into(),
                provider_id: "VAHTTP".into(),
                link_name: "default".into(),
                contract_id: "wasmcloud:httpserver".into(),
                values: HashMap::new(),
            }],
        )
    }

    #[test]
    fn line_round_trip() {
        let descriptor = sample();
        let line = descriptor.encode_line().unwrap();

        assert!(line.ends_with('\n'));
        assert!(!line.trim_end().contains('\n'));

        let decoded = HostDescriptor::decode_line(&line).unwrap();
        assert_eq!(decoded, descriptor);
    }

    #[test]
    fn defaults_produce_complete_descriptor() {
        let descriptor = HostDescriptor::for_start(
            &HostOptions::default(),
            &ProviderIdentity::with_default_link("Vxxx"),
            InstanceId::new(),
            None,
            Vec::new(),
        );

        assert_eq!(descriptor.default_rpc_timeout_ms, 2000);
        assert_eq!(descriptor.lattice_rpc_url, "127.0.0.1:4222");
        assert_eq!(descriptor.config_json, "");
        assert!(descriptor.env_values.is_empty());
        assert!(descriptor.link_definitions.is_empty());
        assert!(descriptor.js_domain.is_none());
    }

    #[test]
    fn js_domain_omitted_when_absent() {
        let descriptor = HostDescriptor::for_start(
            &HostOptions::default(),
            &ProviderIdentity::with_default_link("Vxxx"),
            InstanceId::new(),
            None,
            Vec::new(),
        );
        let value = serde_json::to_value(&descriptor).unwrap();
        assert!(value.get("js_domain").is_none());
    }

    #[test]
    fn structured_logging_accepts_string_spellings() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["enable_structured_logging"] = serde_json::Value::String("true".into());

        let descriptor: HostDescriptor = serde_json::from_value(value).unwrap();
        assert!(descriptor.enable_structured_logging);
    }

    #[test]
    fn structured_logging_rejects_garbage() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["enable_structured_logging"] = serde_json::Value::String("yes".into());

        assert!(serde_json::from_value::<HostDescriptor>(value).is_err());
    }

    #[test]
    fn decode_rejects_bad_base64() {
        assert!(matches!(
            HostDescriptor::decode_line("!!! not base64 !!!"),
            Err(DescriptorDecodeError::Base64(_))
        ));
    }
}
