//! # Explorer Upstream
//!
//! Provider clients behind the [`Fetcher`] trait: one request and one
//! normalization per resource kind.
//!
//! | kind | provider |
//! |---|---|
//! | location | Google Geocoding |
//! | weather | Dark Sky |
//! | event | Eventbrite |
//! | movie | TMDB |
//! | yelp | Yelp Fusion |
//! | trail | Hiking Project |

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;
mod config;
pub mod providers;

pub use client::UpstreamClient;
pub use config::{provider_name, ProviderConfig, UpstreamConfig};

// Re-export the trait from core
pub use explorer_core::traits::Fetcher;
