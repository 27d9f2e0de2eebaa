//! Lattice lifecycle events for the wasmbus host runtime.
//!
//! Everything a host publishes about itself and its providers travels as
//! a CloudEvents-1.0 envelope ([`CloudEvent`]) on the lattice event
//! subject. This crate owns:
//!
//! - the envelope and its canonical JSON serialization
//! - the typed `data` payloads per event kind ([`HostStarted`],
//!   [`ProviderStarted`], ...)
//! - the lattice subject builders ([`subject`])
//!
//! The crate is publication-agnostic: it produces serialized bytes and a
//! subject string; handing them to the lattice client is the runtime's
//! job.
//!
//! # Example
//!
//! ```
//! use wasmbus_events::{CloudEvent, HealthCheck, subject};
//!
//! let data = HealthCheck::new("VAHTTP", "default");
//! let event = CloudEvent::new("NHOSTKEY", HealthCheck::PASSED_KIND, &data).unwrap();
//! let bytes = event.to_bytes().unwrap();
//!
//! assert_eq!(event.ty, "com.wasmcloud.lattice.health_check_passed");
//! assert_eq!(subject::events("default"), "wasmbus.evt.default");
//! assert!(!bytes.is_empty());
//! ```

mod envelope;
mod error;
mod lifecycle;
pub mod subject;

pub use envelope::{CloudEvent, EVENT_TYPE_PREFIX};
pub use error::EventError;
pub use lifecycle::{
    ClaimsSummary, HealthCheck, HostStarted, HostStopped, ProviderStarted, ProviderStopped,
};
