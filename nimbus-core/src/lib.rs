//! # Nimbus Core
//!
//! Core types, errors, and traits for the Nimbus current-weather lookup service.
//!
//! This crate provides the foundational building blocks used by all other Nimbus crates:
//!
//! - **Types**: Location queries, cache keys, weather records, and lookup results
//! - **Errors**: The error taxonomy shared by the provider, cache, and lookup layers
//! - **Constants**: Key namespace, defaults, and provider settings
//! - **Traits**: The `CacheStore` and `WeatherProvider` seams
//!
//! ## Example
//!
//! ```rust
//! use nimbus_core::LocationQuery;
//!
//! let query = LocationQuery::new("Alexandria").with_state("VA");
//! assert_eq!(query.cache_key().as_str(), "weather:alexandria:va:us:metric");
//! assert_eq!(query.location_descriptor(), "Alexandria,VA,US");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{NimbusError, Result};
pub use traits::*;
pub use types::*;
