//! Sampling endpoint port.
//!
//! An endpoint is one attached MCP host able to run a sampling call. The
//! proxy layer only ever sees this trait; the MCP adapter provides the
//! implementation backed by an `rmcp` peer.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::{SamplingRequest, SamplingResult};

/// Errors that can occur during a sampling call.
#[derive(Debug, Error)]
pub enum SamplingError {
    /// The host answered with an error, or the session failed mid-call.
    #[error("{0}")]
    Upstream(String),

    /// The inbound request went away before the host answered.
    #[error("request cancelled")]
    Cancelled,

    /// The session closed before the call could be sent.
    #[error("session closed")]
    Closed,
}

/// Port for performing sampling calls against an attached host.
#[async_trait]
pub trait SamplingEndpoint: Send + Sync + fmt::Debug {
    /// Opaque session identifier, unique among attached endpoints.
    fn id(&self) -> &str;

    /// Run one sampling call.
    ///
    /// `cancel` is tied to the inbound request: implementations must stop
    /// waiting and return [`SamplingError::Cancelled`] once it fires.
    /// No retries and no internal timeout.
    async fn sample(
        &self,
        request: SamplingRequest,
        cancel: CancellationToken,
    ) -> Result<SamplingResult, SamplingError>;
}
