//! Host configuration.
//!
//! [`HostOptions`] carries every process-wide configuration key the
//! host ingests at init. Values come from compile-time defaults
//! overlaid with `WASMBUS_*` environment variables; an immutable
//! snapshot is stored in the registration tables so provider starts
//! read one consistent view.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Tokens accepted as "enabled" for `config_service_enabled`.
///
/// The informal aliases are preserved from the original wire contract;
/// removing them would break existing deployments.
const TRUTHY_TOKENS: &[&str] = &["TRUE", "YES", "Y", "ENABLED", "YOU BETCHA", "YUPPERS", "TOTES"];

/// Returns `true` if `token` is one of the recognized truthy spellings
/// (case-insensitive).
#[must_use]
pub fn is_truthy(token: &str) -> bool {
    let upper = token.trim().to_ascii_uppercase();
    TRUTHY_TOKENS.contains(&upper.as_str())
}

/// Process-wide host configuration snapshot.
///
/// # Example
///
/// ```
/// use wasmbus_host::HostOptions;
///
/// let options = HostOptions::default();
/// assert_eq!(options.rpc_timeout_ms, 2000);
/// assert_eq!(options.provider_delay_ms, 300);
/// assert_eq!(options.lattice_prefix, "default");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostOptions {
    /// This host's public key. Generated at startup when empty.
    pub host_key: String,
    /// Lattice namespace partition.
    pub lattice_prefix: String,
    /// Cluster signing key.
    pub cluster_key: String,
    /// Issuers trusted for invocations, in priority order.
    pub cluster_issuers: Vec<String>,
    /// Cluster seed handed to providers as the invocation seed.
    pub cluster_seed: String,
    /// Whether the cluster key was generated ad hoc at startup.
    pub cluster_adhoc: bool,
    /// Seed backing the host key.
    pub host_seed: String,
    /// Broker host providers should dial for RPC.
    pub prov_rpc_host: String,
    /// Broker port providers should dial for RPC.
    pub prov_rpc_port: u16,
    /// User JWT for provider RPC connections.
    pub prov_rpc_jwt: String,
    /// User seed for provider RPC connections.
    pub prov_rpc_seed: String,
    /// Whether provider RPC connections use TLS.
    pub prov_rpc_tls: bool,
    /// Lattice request timeout in milliseconds.
    pub rpc_timeout_ms: u64,
    /// Shutdown drain delay in milliseconds.
    pub provider_delay_ms: u64,
    /// Whether providers should emit structured logs.
    pub enable_structured_logging: bool,
    /// Optional JetStream domain forwarded to providers.
    pub js_domain: Option<String>,
    /// Whether to ask the config service for supplemental configuration
    /// at boot.
    pub config_service_enabled: bool,
    /// Delay before the first health probe of a fresh instance, in
    /// milliseconds.
    pub health_probe_initial_ms: u64,
    /// Interval between subsequent health probes, in milliseconds.
    pub health_probe_period_ms: u64,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            host_key: String::new(),
            lattice_prefix: "default".to_string(),
            cluster_key: String::new(),
            cluster_issuers: Vec::new(),
            cluster_seed: String::new(),
            cluster_adhoc: false,
            host_seed: String::new(),
            prov_rpc_host: "127.0.0.1".to_string(),
            prov_rpc_port: 4222,
            prov_rpc_jwt: String::new(),
            prov_rpc_seed: String::new(),
            prov_rpc_tls: false,
            rpc_timeout_ms: 2000,
            provider_delay_ms: 300,
            enable_structured_logging: false,
            js_domain: None,
            config_service_enabled: false,
            health_probe_initial_ms: 5_000,
            health_probe_period_ms: 30_000,
        }
    }
}

impl HostOptions {
    /// Loads options from the process environment over the defaults.
    ///
    /// Every key is read from its `WASMBUS_`-prefixed upper-case
    /// variable (e.g. `WASMBUS_RPC_TIMEOUT_MS`). Unparseable numeric
    /// values fall back to the default rather than failing boot.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Loads options from an explicit variable iterator.
    ///
    /// Split out from [`from_env`](Self::from_env) so tests can supply a
    /// deterministic environment.
    #[must_use]
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter_map(|(k, v)| k.strip_prefix("WASMBUS_").map(|k| (k.to_string(), v)))
            .collect();

        let mut options = Self::default();
        let get = |key: &str| vars.get(key).map(String::as_str);

        if let Some(v) = get("HOST_KEY") {
            options.host_key = v.to_string();
        }
        if let Some(v) = get("LATTICE_PREFIX") {
            options.lattice_prefix = v.to_string();
        }
        if let Some(v) = get("CLUSTER_KEY") {
            options.cluster_key = v.to_string();
        }
        if let Some(v) = get("CLUSTER_ISSUERS") {
            options.cluster_issuers = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(v) = get("CLUSTER_SEED") {
            options.cluster_seed = v.to_string();
        }
        if let Some(v) = get("CLUSTER_ADHOC") {
            options.cluster_adhoc = parse_bool(v).unwrap_or(options.cluster_adhoc);
        }
        if let Some(v) = get("HOST_SEED") {
            options.host_seed = v.to_string();
        }
        if let Some(v) = get("PROV_RPC_HOST") {
            options.prov_rpc_host = v.to_string();
        }
        if let Some(v) = get("PROV_RPC_PORT") {
            options.prov_rpc_port = v.parse().unwrap_or(options.prov_rpc_port);
        }
        if let Some(v) = get("PROV_RPC_JWT") {
            options.prov_rpc_jwt = v.to_string();
        }
        if let Some(v) = get("PROV_RPC_SEED") {
            options.prov_rpc_seed = v.to_string();
        }
        if let Some(v) = get("PROV_RPC_TLS") {
            options.prov_rpc_tls = parse_bool(v).unwrap_or(options.prov_rpc_tls);
        }
        if let Some(v) = get("RPC_TIMEOUT_MS") {
            options.rpc_timeout_ms = v.parse().unwrap_or(options.rpc_timeout_ms);
        }
        if let Some(v) = get("PROVIDER_DELAY") {
            options.provider_delay_ms = v.parse().unwrap_or(options.provider_delay_ms);
        }
        if let Some(v) = get("STRUCTURED_LOGGING") {
            options.enable_structured_logging =
                parse_bool(v).unwrap_or(options.enable_structured_logging);
        }
        if let Some(v) = get("JS_DOMAIN") {
            if !v.is_empty() {
                options.js_domain = Some(v.to_string());
            }
        }
        if let Some(v) = get("CONFIG_SERVICE_ENABLED") {
            options.config_service_enabled = is_truthy(v);
        }

        options
    }

    /// Returns the lattice request timeout as a [`Duration`].
    #[must_use]
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    /// Returns the shutdown drain delay as a [`Duration`].
    #[must_use]
    pub fn provider_delay(&self) -> Duration {
        Duration::from_millis(self.provider_delay_ms)
    }

    /// Returns the broker URL providers should dial, `host:port`.
    #[must_use]
    pub fn prov_rpc_url(&self) -> String {
        format!("{}:{}", self.prov_rpc_host, self.prov_rpc_port)
    }
}

/// Parses a plain boolean, accepting the string coercions providers
/// historically sent (`"true"` / `"false"`, any case).
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Derives host labels from the process environment.
///
/// Every `HOST_*` variable contributes a label: the key is lowercased
/// with the prefix stripped, the value is taken verbatim.
#[must_use]
pub fn env_labels() -> HashMap<String, String> {
    env_labels_from(std::env::vars())
}

/// Label derivation over an explicit variable iterator, for tests.
#[must_use]
pub fn env_labels_from<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix("HOST_")
                .map(|stripped| (stripped.to_ascii_lowercase(), value))
        })
        .collect()
}

/// Labels detected from the platform the host runs on.
#[must_use]
pub fn platform_labels() -> HashMap<String, String> {
    let mut labels = HashMap::new();
    labels.insert("hostcore.arch".to_string(), std::env::consts::ARCH.to_string());
    labels.insert("hostcore.os".to_string(), std::env::consts::OS.to_string());
    labels.insert(
        "hostcore.osfamily".to_string(),
        std::env::consts::FAMILY.to_string(),
    );
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = HostOptions::default();
        assert_eq!(options.rpc_timeout_ms, 2000);
        assert_eq!(options.provider_delay_ms, 300);
        assert_eq!(options.lattice_prefix, "default");
        assert!(!options.config_service_enabled);
        assert_eq!(options.prov_rpc_url(), "127.0.0.1:4222");
    }

    #[test]
    fn env_overlay() {
        let vars = vec![
            ("WASMBUS_LATTICE_PREFIX".to_string(), "prod".to_string()),
            ("WASMBUS_RPC_TIMEOUT_MS".to_string(), "500".to_string()),
            (
                "WASMBUS_CLUSTER_ISSUERS".to_string(),
                "CAAA, CBBB,".to_string(),
            ),
            ("WASMBUS_PROV_RPC_TLS".to_string(), "true".to_string()),
            ("UNRELATED".to_string(), "ignored".to_string()),
        ];

        let options = HostOptions::from_vars(vars);
        assert_eq!(options.lattice_prefix, "prod");
        assert_eq!(options.rpc_timeout_ms, 500);
        assert_eq!(options.cluster_issuers, vec!["CAAA", "CBBB"]);
        assert!(options.prov_rpc_tls);
        // untouched keys keep their defaults
        assert_eq!(options.provider_delay_ms, 300);
    }

    #[test]
    fn env_overlay_bad_number_keeps_default() {
        let vars = vec![("WASMBUS_RPC_TIMEOUT_MS".to_string(), "soon".to_string())];
        let options = HostOptions::from_vars(vars);
        assert_eq!(options.rpc_timeout_ms, 2000);
    }

    #[test]
    fn truthy_tokens_enabled() {
        for token in ["true", "YES", "enabled", "totes", "You Betcha", "yuppers", "y"] {
            assert!(is_truthy(token), "{token:?} should be truthy");
        }
    }

    #[test]
    fn non_truthy_tokens_disabled() {
        for token in ["false", "", "maybe", "no", "on", "1"] {
            assert!(!is_truthy(token), "{token:?} should not be truthy");
        }
    }

    #[test]
    fn config_service_enabled_via_alias() {
        let vars = vec![(
            "WASMBUS_CONFIG_SERVICE_ENABLED".to_string(),
            "YOU BETCHA".to_string(),
        )];
        assert!(HostOptions::from_vars(vars).config_service_enabled);
    }

    #[test]
    fn labels_derived_from_host_env() {
        let vars = vec![
            ("HOST_region".to_string(), "us-east".to_string()),
            ("HOST_zone".to_string(), "a".to_string()),
            ("OTHER".to_string(), "x".to_string()),
        ];

        let labels = env_labels_from(vars);
        assert_eq!(labels.get("region").map(String::as_str), Some("us-east"));
        assert_eq!(labels.get("zone").map(String::as_str), Some("a"));
        assert_eq!(labels.len(), 2);
        assert!(labels.keys().all(|k| !k.starts_with("host_")));
    }

    #[test]
    fn label_keys_lowercased() {
        let vars = vec![("HOST_REGION".to_string(), "eu".to_string())];
        let labels = env_labels_from(vars);
        assert_eq!(labels.get("region").map(String::as_str), Some("eu"));
    }

    #[test]
    fn platform_labels_present() {
        let labels = platform_labels();
        assert!(labels.contains_key("hostcore.arch"));
        assert!(labels.contains_key("hostcore.os"));
        assert!(labels.contains_key("hostcore.osfamily"));
    }
}
