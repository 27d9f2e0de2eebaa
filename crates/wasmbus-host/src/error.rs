//! Provider subsystem errors.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`ProviderError::AlreadyRegistered`] | `PROVIDER_ALREADY_REGISTERED` | No |
//! | [`ProviderError::SpawnFailed`] | `PROVIDER_SPAWN_FAILED` | No |
//! | [`ProviderError::Died`] | `PROVIDER_DIED` | No |
//! | [`ProviderError::PublishFailed`] | `PROVIDER_PUBLISH_FAILED` | Yes |
//!
//! Health probe timeouts never appear here: they are collapsed into the
//! `healthy = false` edge and surface only as `health_check_failed`
//! events.

use thiserror::Error;
use wasmbus_types::{ErrorCode, ProviderIdentity};

/// Errors surfaced by provider start and teardown paths.
///
/// Start errors fail the `start_provider` call synchronously and leave
/// no registry residue. Runtime errors (health, publish) are absorbed
/// and reflected through lifecycle events instead.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A provider with this `(public_key, link_name)` is already
    /// registered in the host.
    #[error("provider already registered: {0}")]
    AlreadyRegistered(ProviderIdentity),

    /// The OS refused to exec the binary, or pipe setup / descriptor
    /// delivery failed before the provider was fully up.
    #[error("failed to spawn provider {identity}: {message}")]
    SpawnFailed {
        identity: ProviderIdentity,
        message: String,
    },

    /// The child process exited unexpectedly. Not retried; recovery is
    /// a fresh `start_provider`.
    #[error("provider {identity} died: {reason}")]
    Died {
        identity: ProviderIdentity,
        reason: String,
    },

    /// A lattice publish failed. Logged by the emitter and never fatal
    /// to the instance.
    #[error("failed to publish on '{subject}': {message}")]
    PublishFailed { subject: String, message: String },
}

impl ErrorCode for ProviderError {
    fn code(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered(_) => "PROVIDER_ALREADY_REGISTERED",
            Self::SpawnFailed { .. } => "PROVIDER_SPAWN_FAILED",
            Self::Died { .. } => "PROVIDER_DIED",
            Self::PublishFailed { .. } => "PROVIDER_PUBLISH_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Only publish failures are transient; the lattice may come back
        matches!(self, Self::PublishFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasmbus_types::assert_error_codes;

    fn all_variants() -> Vec<ProviderError> {
        let identity = ProviderIdentity::with_default_link("Vxxx");
        vec![
            ProviderError::AlreadyRegistered(identity.clone()),
            ProviderError::SpawnFailed {
                identity: identity.clone(),
                message: "no such file".into(),
            },
            ProviderError::Died {
                identity,
                reason: "137".into(),
            },
            ProviderError::PublishFailed {
                subject: "wasmbus.evt.default".into(),
                message: "closed".into(),
            },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "PROVIDER_");
    }

    #[test]
    fn only_publish_is_recoverable() {
        for err in all_variants() {
            let expect = matches!(err, ProviderError::PublishFailed { .. });
            assert_eq!(err.is_recoverable(), expect, "{}", err.code());
        }
    }
}
