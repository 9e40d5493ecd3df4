//! # Explorer Core
//!
//! Core types, errors, and traits for the Explorer location data aggregator.
//!
//! This crate provides the foundational building blocks used by all other Explorer crates:
//!
//! - **Types**: Resource kinds, lookup keys and normalized records
//! - **Errors**: The shared error taxonomy
//! - **Expiry**: The per-kind freshness policy
//! - **Constants**: Expiry bounds, provider defaults and formats
//! - **Traits**: The store and fetcher seams the cache orchestrator is built on
//!
//! ## Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use explorer_core::{expiry, ResourceKind};
//!
//! let now = Utc::now();
//! assert!(expiry::is_stale(ResourceKind::Weather, now - Duration::seconds(16), now));
//! assert!(!expiry::is_stale(ResourceKind::Location, now - Duration::days(3650), now));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod clock;
pub mod constants;
pub mod error;
pub mod expiry;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use constants::*;
pub use error::{ExplorerError, Result};
pub use traits::*;
pub use types::*;
