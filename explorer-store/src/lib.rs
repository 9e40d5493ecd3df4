//! # Explorer Store
//!
//! Record group storage for the Explorer cache.
//!
//! This crate provides two backends behind [`RecordStore`]:
//!
//! - **Memory**: Fast in-memory storage for development and testing
//! - **Sql**: Durable libSQL storage (local file, `:memory:`, or Turso)
//!
//! Table layout is described once per resource kind by a static
//! [`TableSchema`]; all SQL is generated from it when the store opens.
//!
//! ## Example
//!
//! ```rust,ignore
//! use explorer_store::{SqlStore, StoreConfig, RecordStore};
//!
//! let store = SqlStore::open(&StoreConfig::local("explorer.db")).await?;
//! let group = store.read(ResourceKind::Weather, "42").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;
mod schema;
#[cfg(feature = "sql")]
mod codec;
#[cfg(feature = "sql")]
mod sql;

pub use memory::{MemoryStore, MemoryStoreStats};
pub use schema::{schema_for, validate_schemas, Column, ColumnType, TableSchema, SCHEMAS};
#[cfg(feature = "sql")]
pub use sql::{SqlStore, StoreConfig};

// Re-export the trait from core
pub use explorer_core::traits::RecordStore;
