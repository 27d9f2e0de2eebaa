//! Host runtime for a lattice of capability providers.
//!
//! The host launches, monitors, health-checks, and terminates
//! out-of-process capability providers, mediating their identity in
//! process-wide registration tables and publishing their lifecycle as
//! CloudEvents on the lattice.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        HostSupervisor                            │
//! │   labels / friendly name / host_started / purge / host_stopped   │
//! │                                                                  │
//! │  ┌────────────────────┐      ┌─────────────────────────────────┐ │
//! │  │  ProviderTables    │◄────►│      ProviderSupervisor         │ │
//! │  │  handles, triples, │      │  start / stop / terminate_all   │ │
//! │  │  claims, refmaps,  │      └──────────────┬──────────────────┘ │
//! │  │  links, config     │                     │ one task each      │
//! │  └────────────────────┘                     ▼                    │
//! │                              ┌─────────────────────────────────┐ │
//! │                              │       ProviderInstance          │ │
//! │                              │  child process + stdin bootstrap│ │
//! │                              │  health probes, exit monitor,   │ │
//! │                              │  lifecycle events, queries      │ │
//! │                              └──────────────┬──────────────────┘ │
//! └─────────────────────────────────────────────┼────────────────────┘
//!                                               │ publish / request
//!                                               ▼
//!                                   LatticeClient (trait seam)
//! ```
//!
//! # Concurrency model
//!
//! Each provider instance is one tokio task with a bounded command
//! inbox; everything that happens to an instance (queries, health
//! probes, child-exit notification, halt) is totally ordered through
//! that inbox. Instances run in parallel and coordinate only through
//! the shared [`ProviderTables`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wasmbus_host::{HostOptions, HostSupervisor, NoopLattice, ProviderSpec};
//! use wasmbus_types::Claims;
//!
//! #[tokio::main]
//! async fn main() {
//!     let host = HostSupervisor::start(HostOptions::default(), Arc::new(NoopLattice)).await;
//!
//!     let spec = ProviderSpec::new("/opt/providers/httpserver", Claims::new("VAHTTP", "AISS"))
//!         .with_contract_id("wasmcloud:httpserver");
//!     let handle = host.providers().start_provider(spec).await.unwrap();
//!
//!     println!("started instance {}", handle.instance_id().await);
//!     host.stop().await;
//! }
//! ```

mod config;
mod descriptor;
mod error;
mod events;
mod friendly;
mod host;
mod lattice;
pub mod provider;
mod tables;
pub mod testing;

pub use config::{env_labels, is_truthy, platform_labels, HostOptions};
pub use descriptor::{DescriptorDecodeError, HostDescriptor};
pub use error::ProviderError;
pub use events::EventPublisher;
pub use host::{HostState, HostSupervisor};
pub use lattice::{LatticeClient, LatticeError, NoopLattice, SharedLattice};
pub use provider::{ProviderHandle, ProviderSpec, ProviderSupervisor, DEAD_SENTINEL};
pub use tables::{ProviderTables, RegistrationRecord};
