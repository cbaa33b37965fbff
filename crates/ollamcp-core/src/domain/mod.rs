//! Protocol-neutral domain types.

pub mod sampling;

pub use sampling::{SampledContent, SamplingMessage, SamplingRequest, SamplingResult, SamplingRole};
