//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They use only domain types.

pub mod sampling_endpoint;

pub use sampling_endpoint::{SamplingEndpoint, SamplingError};
