//! Mock generation service for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::{
    BackendError, BriefingBackend, IngestRequest, IngestResponse, OutputsResponse, TriggerAck,
};

use super::fixtures;

/// Session id handed out by a fresh mock.
pub const DEFAULT_SESSION_ID: &str = "mock-session-1";

/// The four service operations, for call counting and error injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Ingest,
    TriggerGeneration,
    FetchOutputs,
    FetchDocument,
}

/// A recorded call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Ingest(IngestRequest),
    TriggerGeneration { session_id: String },
    FetchOutputs { session_id: String },
    FetchDocument { url: String },
}

impl RecordedCall {
    pub fn operation(&self) -> MockOperation {
        match self {
            RecordedCall::Ingest(_) => MockOperation::Ingest,
            RecordedCall::TriggerGeneration { .. } => MockOperation::TriggerGeneration,
            RecordedCall::FetchOutputs { .. } => MockOperation::FetchOutputs,
            RecordedCall::FetchDocument { .. } => MockOperation::FetchDocument,
        }
    }
}

/// An injected failure. `call` is the 1-based call number of `operation`
/// to fail; `None` fails the next call.
struct InjectedError {
    operation: MockOperation,
    call: Option<usize>,
    error: BackendError,
}

/// Mock implementation of the [`BriefingBackend`] trait.
///
/// Provides controllable behavior for testing:
/// - Scripted status responses, consumed one per poll
/// - Documents served by URL
/// - Recorded calls for assertions
/// - Injected failures on any operation
///
/// Once the scripted status responses run out the last one keeps being
/// returned; with none scripted every poll answers `PENDING`.
pub struct MockBriefingBackend {
    ingest_response: Arc<RwLock<IngestResponse>>,
    trigger_ack: Arc<RwLock<TriggerAck>>,
    outputs: Arc<RwLock<VecDeque<OutputsResponse>>>,
    documents: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    errors: Arc<RwLock<Vec<InjectedError>>>,
    /// Simulated latency applied to every call.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl std::fmt::Debug for MockBriefingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBriefingBackend")
            .field("ingest_response", &"<ingest_response>")
            .field("outputs", &"<outputs>")
            .field("documents", &"<documents>")
            .field("calls", &"<calls>")
            .finish()
    }
}

impl Default for MockBriefingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBriefingBackend {
    /// Create a mock that hands out [`DEFAULT_SESSION_ID`] and accepts every trigger.
    pub fn new() -> Self {
        Self {
            ingest_response: Arc::new(RwLock::new(fixtures::ingest_response(DEFAULT_SESSION_ID))),
            trigger_ack: Arc::new(RwLock::new(TriggerAck { status: 200 })),
            outputs: Arc::new(RwLock::new(VecDeque::new())),
            documents: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            errors: Arc::new(RwLock::new(Vec::new())),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the session id returned by ingest. `None` omits it from the response.
    pub async fn set_session_id(&self, session_id: Option<String>) {
        *self.ingest_response.write().await = IngestResponse { session_id };
    }

    /// Set the acknowledgement returned by the generation trigger.
    pub async fn set_trigger_ack(&self, ack: TriggerAck) {
        *self.trigger_ack.write().await = ack;
    }

    /// Append a status response to the script.
    pub async fn push_outputs(&self, outputs: OutputsResponse) {
        self.outputs.write().await.push_back(outputs);
    }

    /// Serve `text` for `url`. Unknown URLs answer with the body of a 404
    /// page, `Not Found`, as the HTTP client would.
    pub async fn set_document(&self, url: &str, text: &str) {
        self.documents
            .write()
            .await
            .insert(url.to_string(), text.to_string());
    }

    /// Delay every call by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Fail the next call to `operation`.
    pub async fn fail_next(&self, operation: MockOperation, error: BackendError) {
        self.errors.write().await.push(InjectedError {
            operation,
            call: None,
            error,
        });
    }

    /// Fail the `call`-th (1-based) call to `operation`.
    pub async fn fail_nth(&self, operation: MockOperation, call: usize, error: BackendError) {
        self.errors.write().await.push(InjectedError {
            operation,
            call: Some(call),
            error,
        });
    }

    /// Get recorded calls in the order they were made.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls made to `operation`.
    pub async fn call_count(&self, operation: MockOperation) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// Record a call, apply the delay, then return an injected error if one matches.
    async fn record(&self, call: RecordedCall) -> Result<(), BackendError> {
        let operation = call.operation();
        let count = {
            let mut calls = self.calls.write().await;
            calls.push(call);
            calls.iter().filter(|c| c.operation() == operation).count()
        };

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut errors = self.errors.write().await;
        let position = errors
            .iter()
            .position(|e| e.operation == operation && e.call.map_or(true, |n| n == count));
        match position {
            Some(index) => Err(errors.remove(index).error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BriefingBackend for MockBriefingBackend {
    async fn ingest(&self, request: &IngestRequest) -> Result<IngestResponse, BackendError> {
        self.record(RecordedCall::Ingest(request.clone())).await?;
        Ok(self.ingest_response.read().await.clone())
    }

    async fn trigger_generation(&self, session_id: &str) -> Result<TriggerAck, BackendError> {
        self.record(RecordedCall::TriggerGeneration {
            session_id: session_id.to_string(),
        })
        .await?;
        Ok(*self.trigger_ack.read().await)
    }

    async fn fetch_outputs(&self, session_id: &str) -> Result<OutputsResponse, BackendError> {
        self.record(RecordedCall::FetchOutputs {
            session_id: session_id.to_string(),
        })
        .await?;

        let mut outputs = self.outputs.write().await;
        let next = if outputs.len() > 1 {
            outputs.pop_front()
        } else {
            outputs.front().cloned()
        };
        Ok(next.unwrap_or_else(fixtures::pending_outputs))
    }

    async fn fetch_document(&self, url: &str) -> Result<String, BackendError> {
        self.record(RecordedCall::FetchDocument {
            url: url.to_string(),
        })
        .await?;

        Ok(self
            .documents
            .read()
            .await
            .get(url)
            .cloned()
            .unwrap_or_else(|| "Not Found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::OutputStatus;

    #[tokio::test]
    async fn test_default_session_and_trigger() {
        let backend = MockBriefingBackend::new();
        let request = IngestRequest {
            company_name: "Acme".to_string(),
            interviewee_email: String::new(),
        };

        let response = backend.ingest(&request).await.unwrap();
        assert_eq!(response.session_id(), Some(DEFAULT_SESSION_ID));

        let ack = backend.trigger_generation(DEFAULT_SESSION_ID).await.unwrap();
        assert!(ack.is_success());

        assert_eq!(
            backend.recorded_calls().await,
            vec![
                RecordedCall::Ingest(request),
                RecordedCall::TriggerGeneration {
                    session_id: DEFAULT_SESSION_ID.to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_outputs_script_repeats_last() {
        let backend = MockBriefingBackend::new();
        assert_eq!(
            backend.fetch_outputs("s").await.unwrap().status,
            Some(OutputStatus::Pending)
        );

        backend.push_outputs(fixtures::pending_outputs()).await;
        backend.push_outputs(fixtures::failed_outputs()).await;

        assert!(!backend.fetch_outputs("s").await.unwrap().is_failed());
        assert!(backend.fetch_outputs("s").await.unwrap().is_failed());
        assert!(backend.fetch_outputs("s").await.unwrap().is_failed());
        assert_eq!(backend.call_count(MockOperation::FetchOutputs).await, 4);
    }

    #[tokio::test]
    async fn test_fail_nth_targets_one_call() {
        let backend = MockBriefingBackend::new();
        backend
            .fail_nth(
                MockOperation::FetchOutputs,
                2,
                BackendError::ParseError("boom".to_string()),
            )
            .await;

        assert!(backend.fetch_outputs("s").await.is_ok());
        assert!(backend.fetch_outputs("s").await.is_err());
        assert!(backend.fetch_outputs("s").await.is_ok());
    }

    #[tokio::test]
    async fn test_fail_next_only_matches_operation() {
        let backend = MockBriefingBackend::new();
        backend
            .fail_next(
                MockOperation::FetchDocument,
                BackendError::ParseError("boom".to_string()),
            )
            .await;

        assert!(backend.fetch_outputs("s").await.is_ok());
        assert!(backend.fetch_document("https://x/doc").await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_document_answers_not_found_body() {
        let backend = MockBriefingBackend::new();
        backend.set_document("https://x/brief", "hello").await;

        assert_eq!(backend.fetch_document("https://x/brief").await.unwrap(), "hello");
        assert_eq!(
            backend.fetch_document("https://x/other").await.unwrap(),
            "Not Found"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_applies_to_every_call() {
        let backend = MockBriefingBackend::new();
        backend.set_delay(Duration::from_secs(3)).await;

        let started = tokio::time::Instant::now();
        backend.fetch_outputs("s").await.unwrap();
        backend.fetch_document("https://x/brief").await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }
}
