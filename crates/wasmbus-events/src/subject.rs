//! Lattice subject builders.
//!
//! All hosts in a lattice share a subject namespace rooted at `wasmbus`.
//! The lattice prefix partitions independent lattices on one broker.

/// Subject all lifecycle events are published on:
/// `wasmbus.evt.<prefix>`.
#[must_use]
pub fn events(lattice_prefix: &str) -> String {
    format!("wasmbus.evt.{lattice_prefix}")
}

/// Subject of a provider's health probe endpoint:
/// `wasmbus.rpc.<prefix>.<public_key>.<link_name>.health`.
#[must_use]
pub fn provider_health(lattice_prefix: &str, public_key: &str, link_name: &str) -> String {
    format!("wasmbus.rpc.{lattice_prefix}.{public_key}.{link_name}.health")
}

/// Subject of the optional supplemental configuration service:
/// `wasmbus.cfg.<prefix>`.
#[must_use]
pub fn config_service(lattice_prefix: &str) -> String {
    format!("wasmbus.cfg.{lattice_prefix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_subject() {
        assert_eq!(events("default"), "wasmbus.evt.default");
        assert_eq!(events("prod"), "wasmbus.evt.prod");
    }

    #[test]
    fn health_subject() {
        assert_eq!(
            provider_health("default", "VAHTTP", "default"),
            "wasmbus.rpc.default.VAHTTP.default.health"
        );
    }

    #[test]
    fn config_subject() {
        assert_eq!(config_service("staging"), "wasmbus.cfg.staging");
    }
}
