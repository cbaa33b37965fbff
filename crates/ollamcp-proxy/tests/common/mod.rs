//! Shared fixtures for gateway integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use http_body_util::BodyExt;
use ollamcp_core::{
    EndpointRegistry, SampledContent, SamplingEndpoint, SamplingError, SamplingRequest, SamplingResult,
};
use ollamcp_proxy::{ProxyConfig, create_router};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// What the stub answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Text {
        text: String,
        stop_reason: Option<String>,
    },
    Fail(String),
    /// Never answers; only cancellation ends the call.
    Hang,
}

/// Endpoint that records every request and answers with a canned reply.
#[derive(Debug)]
pub struct RecordingEndpoint {
    id: String,
    reply: Reply,
    calls: AtomicUsize,
    requests: Mutex<Vec<SamplingRequest>>,
    tokens: Mutex<Vec<CancellationToken>>,
}

impl RecordingEndpoint {
    pub fn new(id: &str, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
        })
    }

    pub fn text(id: &str, text: &str, stop_reason: Option<&str>) -> Arc<Self> {
        Self::new(
            id,
            Reply::Text {
                text: text.to_string(),
                stop_reason: stop_reason.map(str::to_string),
            },
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Cancellation token handed to the most recent call.
    pub fn last_token(&self) -> Option<CancellationToken> {
        self.tokens.lock().unwrap().last().cloned()
    }

    pub fn last_request(&self) -> Option<SamplingRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SamplingEndpoint for RecordingEndpoint {
    fn id(&self) -> &str {
        &self.id
    }

    async fn sample(
        &self,
        request: SamplingRequest,
        cancel: CancellationToken,
    ) -> Result<SamplingResult, SamplingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        self.tokens.lock().unwrap().push(cancel.clone());
        match &self.reply {
            Reply::Text { text, stop_reason } => Ok(SamplingResult {
                content: Some(SampledContent::Text(text.clone())),
                stop_reason: stop_reason.clone(),
                model: Some("host-model".to_string()),
            }),
            Reply::Fail(message) => Err(SamplingError::Upstream(message.clone())),
            Reply::Hang => {
                cancel.cancelled().await;
                Err(SamplingError::Cancelled)
            }
        }
    }
}

/// Router with `endpoint` attached, or with an empty registry.
pub async fn router_with(endpoint: Option<Arc<RecordingEndpoint>>) -> (Router, Arc<EndpointRegistry>) {
    let registry = Arc::new(EndpointRegistry::new());
    if let Some(endpoint) = endpoint {
        registry.attach(endpoint).await;
    }
    let config = ProxyConfig {
        models: vec!["llama3".to_string(), "codellama".to_string()],
        ..ProxyConfig::default()
    };
    (create_router(Arc::clone(&registry), config), registry)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Split an NDJSON body into parsed frames.
pub async fn ndjson_frames(response: Response<Body>) -> Vec<serde_json::Value> {
    body_string(response)
        .await
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
