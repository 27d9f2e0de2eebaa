//! Provider lifecycle subsystem.
//!
//! A capability provider is an out-of-process executable. Starting one
//! registers its identity in the shared tables, spawns the child with a
//! filtered environment, streams the host descriptor to its stdin, and
//! hands supervision to a dedicated instance task:
//!
//! ```text
//!  start_provider(spec)
//!        │
//!        ▼
//! ┌──────────────────┐  register   ┌────────────────┐
//! │ ProviderSupervisor│ ──────────► │ ProviderTables │
//! └────────┬─────────┘             └────────────────┘
//!          │ spawn + stdin descriptor
//!          ▼
//! ┌──────────────────────────────────────────────┐
//! │             ProviderInstance task            │
//! │  inbox ◄── ProviderHandle (queries, halt)    │
//! │  child.wait() ◄── exit monitor               │
//! │  stdout/stderr ◄── log forwarding            │
//! │  interval ◄── health probes (edge events)    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Restart policy is transient: when the instance task exits its
//! registration is removed and nothing is respawned. Recovery is a new
//! explicit `start_provider`.

mod command;
mod instance;
mod supervisor;

pub use command::ProviderCommand;
pub use instance::{ProviderHandle, ProviderSpec, DEAD_SENTINEL};
pub use supervisor::ProviderSupervisor;
