//! Error types for Explorer.
//!
//! One taxonomy is shared by the store, the upstream fetchers and the cache
//! orchestrator, so a failure keeps its kind all the way to the caller.

use thiserror::Error;

/// Result type alias using `ExplorerError`.
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Main error type for all Explorer operations.
#[derive(Debug, Error)]
pub enum ExplorerError {
    // ═══════════════════════════════════════════════════════════════════════════
    // STORE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Storage engine unreachable, closed, or the connection failed.
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    /// Malformed write: schema/column mismatch or a group that breaks the
    /// one-kind, one-key rule.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // UPSTREAM ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Provider network/HTTP failure or an undecodable payload.
    #[error("Upstream '{provider}' unavailable: {reason}")]
    UpstreamUnavailable {
        /// Provider name (e.g. "geocode")
        provider: String,
        /// What went wrong
        reason: String,
    },

    /// Provider answered but returned nothing usable.
    ///
    /// The cache orchestrator turns this into an empty resolution; it only
    /// escapes as an error from the fetchers themselves.
    #[error("No data from upstream '{provider}'")]
    NoData {
        /// Provider name
        provider: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // REQUEST ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The lookup key does not fit the requested resource kind.
    #[error("Invalid lookup: {0}")]
    InvalidLookup(String),

    /// Unknown resource kind name.
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error (missing API key, bad URL, ...).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ExplorerError {
    /// Builds an `UpstreamUnavailable` error.
    pub fn upstream(provider: impl Into<String>, reason: impl ToString) -> Self {
        ExplorerError::UpstreamUnavailable {
            provider: provider.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds a `NoData` error.
    pub fn no_data(provider: impl Into<String>) -> Self {
        ExplorerError::NoData {
            provider: provider.into(),
        }
    }

    /// Returns true if the caller may retry later with a chance of success.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExplorerError::StoreUnavailable(_) | ExplorerError::UpstreamUnavailable { .. }
        )
    }

    /// Returns true if the request itself was at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExplorerError::InvalidLookup(_) | ExplorerError::UnknownKind(_)
        )
    }

    /// Returns true for the recognized empty-result condition.
    pub fn is_no_data(&self) -> bool {
        matches!(self, ExplorerError::NoData { .. })
    }
}
