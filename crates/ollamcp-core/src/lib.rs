//! Core domain types and ports for ollamcp.
//!
//! This crate knows nothing about HTTP or MCP wire types. It defines the
//! protocol-neutral sampling model, the [`SamplingEndpoint`] port that
//! transports implement, and the [`EndpointRegistry`] that tracks which
//! endpoint is currently attached.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod registry;

pub use domain::{SampledContent, SamplingMessage, SamplingRequest, SamplingResult, SamplingRole};
pub use ports::{SamplingEndpoint, SamplingError};
pub use registry::EndpointRegistry;
