//! Mock Messages API for integration tests
//!
//! Answers every request with a fixed status and body and records what the
//! relay sent so tests can inspect headers and payload.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Router, routing};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

/// Canned Anthropic-style success body
pub const DEFAULT_RESPONSE: &str = r#"{"id":"msg_test_123","type":"message","role":"assistant","content":[{"type":"text","text":"Hello from mock upstream"}],"model":"claude-2.1","stop_reason":"end_turn","usage":{"input_tokens":10,"output_tokens":5}}"#;

/// One request as received by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl RecordedRequest {
    /// Header value as a string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Mock upstream that returns a predictable response
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    status: StatusCode,
    body: &'static str,
    delay: Option<Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockUpstream {
    /// Start a mock that answers 200 with [`DEFAULT_RESPONSE`]
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, DEFAULT_RESPONSE, None).await
    }

    /// Start a mock that answers with the given status and body
    pub async fn start_with(status: StatusCode, body: &'static str) -> anyhow::Result<Self> {
        Self::start_inner(status, body, None).await
    }

    /// Start a mock that waits `delay` before answering 200
    pub async fn start_slow(delay: Duration) -> anyhow::Result<Self> {
        Self::start_inner(StatusCode::OK, DEFAULT_RESPONSE, Some(delay)).await
    }

    async fn start_inner(status: StatusCode, body: &'static str, delay: Option<Duration>) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            status,
            body,
            delay,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/messages", routing::post(handle_messages))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Messages endpoint URL to configure as the relay's upstream
    pub fn url(&self) -> String {
        format!("http://{}/v1/messages", self.addr)
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Most recent request received
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.requests.lock().unwrap().last().cloned()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// URL on a local port with nothing listening
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1/messages")
}

async fn handle_messages(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state.requests.lock().unwrap().push(RecordedRequest { headers, body });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    (state.status, [(header::CONTENT_TYPE, "application/json")], state.body)
}
