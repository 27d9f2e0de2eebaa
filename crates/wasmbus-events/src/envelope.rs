//! CloudEvents 1.0 envelope.

use crate::error::EventError;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of every event `type` attribute emitted by a host.
pub const EVENT_TYPE_PREFIX: &str = "com.wasmcloud.lattice.";

/// A CloudEvents-1.0 envelope around a lattice event payload.
///
/// ```text
/// { specversion: "1.0",
///   id: <uuid v4>,
///   source: <host_key>,
///   type: "com.wasmcloud.lattice." <kind>,
///   time: <RFC 3339 UTC>,
///   datacontenttype: "application/json",
///   data: <payload> }
/// ```
///
/// The `source` attribute is always the emitting host's public key,
/// looked up from the host supervisor at emission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudEvent {
    /// Always `"1.0"`.
    pub specversion: String,
    /// Unique event id (UUID v4 text).
    pub id: String,
    /// Emitting host public key.
    pub source: String,
    /// Fully qualified event type, `com.wasmcloud.lattice.<kind>`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Emission time, RFC 3339 UTC, second precision.
    pub time: String,
    /// Always `"application/json"`.
    pub datacontenttype: String,
    /// Event payload.
    pub data: serde_json::Value,
}

impl CloudEvent {
    /// Wraps a payload in a fresh envelope.
    ///
    /// `kind` is the bare event kind (`"provider_started"`); the
    /// [`EVENT_TYPE_PREFIX`] is prepended here.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Serialize`] if the payload cannot be
    /// represented as JSON.
    pub fn new<T: Serialize>(
        source: impl Into<String>,
        kind: &str,
        data: &T,
    ) -> Result<Self, EventError> {
        let data = serde_json::to_value(data).map_err(|e| EventError::Serialize {
            kind: kind.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            specversion: "1.0".to_string(),
            id: Uuid::new_v4().to_string(),
            source: source.into(),
            ty: format!("{EVENT_TYPE_PREFIX}{kind}"),
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            datacontenttype: "application/json".to_string(),
            data,
        })
    }

    /// Serializes the envelope to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Serialize`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EventError> {
        serde_json::to_vec(self).map_err(|e| EventError::Serialize {
            kind: self.ty.clone(),
            message: e.to_string(),
        })
    }

    /// Returns the bare event kind (the `type` minus the prefix).
    #[must_use]
    pub fn kind(&self) -> &str {
        self.ty.strip_prefix(EVENT_TYPE_PREFIX).unwrap_or(&self.ty)
    }
}
