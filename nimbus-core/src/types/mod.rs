//! Domain types for Nimbus.
//!
//! This module provides the data structures that flow through the lookup path:
//!
//! - [`LocationQuery`]: What the caller asked for
//! - [`CacheKey`]: Normalized key a query is cached under
//! - [`WeatherRecord`]: Opaque provider payload
//! - [`LookupResult`]: Record plus provenance

mod location;
mod record;
mod lookup;

pub use location::*;
pub use record::*;
pub use lookup::*;
