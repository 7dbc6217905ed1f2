//! Upstream weather provider for Nimbus.
//!
//! Wraps the Visual Crossing Timeline API behind the
//! [`WeatherProvider`](nimbus_core::WeatherProvider) trait and classifies
//! every failure before it leaves the client.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod visual_crossing;

pub use visual_crossing::{ProviderConfig, VisualCrossingClient};
