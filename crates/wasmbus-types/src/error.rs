//! Unified error interface for the workspace.
//!
//! Every error enum in the workspace implements [`ErrorCode`], giving
//! callers a stable machine-readable code and a recoverability flag
//! independent of the `Display` text.
//!
//! # Code format
//!
//! - UPPER_SNAKE_CASE
//! - Prefixed with the owning domain: `PROVIDER_`, `HOST_`, `LATTICE_`,
//!   `EVENT_`
//! - Stable once published (changing a code is a breaking change)
//!
//! # Recoverability
//!
//! Recoverable means a retry or corrective action may succeed: lattice
//! timeouts, publish failures. Non-recoverable means retrying is
//! pointless: identity conflicts, spawn refusals, dead children.
//!
//! # Example
//!
//! ```
//! use wasmbus_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum TableError { Conflict }
//!
//! impl ErrorCode for TableError {
//!     fn code(&self) -> &'static str { "TABLE_CONFLICT" }
//!     fn is_recoverable(&self) -> bool { false }
//! }
//!
//! let err = TableError::Conflict;
//! assert_eq!(err.code(), "TABLE_CONFLICT");
//! assert!(!err.is_recoverable());
//! ```

/// Machine-readable error code interface.
pub trait ErrorCode {
    /// Returns the stable UPPER_SNAKE_CASE code for this error.
    fn code(&self) -> &'static str;

    /// Returns whether retrying or corrective action may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code follows workspace conventions.
///
/// Checks that the code is non-empty, UPPER_SNAKE_CASE, and carries the
/// expected domain prefix.
///
/// # Panics
///
/// Panics with a descriptive message when any check fails. Intended for
/// use in tests only.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Asserts conventions for every variant of an error enum at once.
///
/// # Example
///
/// ```
/// use wasmbus_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum E { A, B }
///
/// impl ErrorCode for E {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::A => "DOMAIN_A",
///             Self::B => "DOMAIN_B",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[E::A, E::B], "DOMAIN_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
