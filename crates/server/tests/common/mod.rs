//! Common test utilities for API testing with a mocked generation service.
//!
//! This module provides a test fixture that creates an in-process router
//! backed by [`MockBriefingBackend`], so no network is involved.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use briefing_core::{
    testing::MockBriefingBackend, BriefOrchestrator, BriefingBackend, Config, RunSnapshot,
    WorkflowConfig, WorkflowHandle,
};
use briefing_server::state::AppState;

/// Re-export fixtures for test convenience
pub use briefing_core::testing::fixtures;

/// Test fixture for API testing with a mock generation service.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test(start_paused = true)]
/// async fn test_start_run() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/v1/briefs", json!({
///         "companyName": "GridFlex Energy"
///     })).await;
///
///     assert_eq!(response.status, 202);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock generation service - script status responses and documents
    pub backend: Arc<MockBriefingBackend>,
    /// Shared state, for waiting on runs
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub text: String,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default workflow settings.
    pub fn new() -> Self {
        Self::with_workflow_config(WorkflowConfig::default())
    }

    /// Create a test fixture with custom workflow settings.
    pub fn with_workflow_config(workflow: WorkflowConfig) -> Self {
        let backend = Arc::new(MockBriefingBackend::new());

        let config = Config {
            workflow: workflow.clone(),
            ..Default::default()
        };

        let orchestrator = BriefOrchestrator::new(
            Arc::clone(&backend) as Arc<dyn BriefingBackend>,
            workflow,
        );
        let state = Arc::new(AppState::new(config, WorkflowHandle::new(orchestrator)));
        let router = briefing_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            backend,
            state,
        }
    }

    /// Wait until `run_id` finishes; `None` if it was replaced.
    pub async fn wait_for_run(&self, run_id: Uuid) -> Option<RunSnapshot> {
        self.state.workflow().wait_until_finished(run_id).await
    }

    /// Start a run through the API and return its id.
    pub async fn start_run(&self, company_name: &str) -> Uuid {
        let response = self
            .post(
                "/api/v1/briefs",
                serde_json::json!({ "companyName": company_name }),
            )
            .await;
        assert_eq!(response.status, StatusCode::ACCEPTED, "{}", response.text);
        response.body["runId"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("runId in response")
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            content_type,
            text,
            body,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
