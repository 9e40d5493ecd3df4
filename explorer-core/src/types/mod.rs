//! Domain types for Explorer.
//!
//! - [`ResourceKind`]: The fixed categories of upstream data
//! - [`LookupKey`]: Free-text search or a reference to a resolved location
//! - [`Record`]: One normalized, timestamped unit of upstream data

mod kind;
mod lookup;
mod record;

pub use kind::*;
pub use lookup::*;
pub use record::*;
