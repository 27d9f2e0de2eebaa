//! Core types for the wasmbus host runtime.
//!
//! This crate is the leaf of the workspace: every other crate depends on
//! it and it depends on nothing but serde and uuid.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SDK Layer                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  wasmbus-types  : identity, claims, links, ErrorCode ◄─ HERE │
//! │  wasmbus-events : CloudEvents envelope, lifecycle payloads   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  wasmbus-host   : tables, providers, host supervisor         │
//! │  wasmbus-hostd  : binary entry point                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identity model
//!
//! A capability provider is identified within a host by the pair
//! `(public_key, link_name)`, see [`ProviderIdentity`]. Each successful
//! start of a provider mints a fresh [`InstanceId`] (UUID v4) that is
//! never reused.
//!
//! # Error handling
//!
//! All workspace error enums implement [`ErrorCode`], providing a stable
//! UPPER_SNAKE_CASE code and a recoverability flag:
//!
//! ```
//! use wasmbus_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum ProbeError { Timeout }
//!
//! impl ErrorCode for ProbeError {
//!     fn code(&self) -> &'static str { "PROBE_TIMEOUT" }
//!     fn is_recoverable(&self) -> bool { true }
//! }
//!
//! assert_eq!(ProbeError::Timeout.code(), "PROBE_TIMEOUT");
//! ```

mod claims;
mod error;
mod identity;
mod link;

pub use claims::Claims;
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use identity::{InstanceId, ProviderIdentity, DEFAULT_LINK_NAME};
pub use link::LinkDefinition;
