//! Brief workflow orchestrator implementation.

use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join;
use tracing::{debug, info, warn};

use crate::backend::{BackendError, BriefingBackend, OutputsResponse};
use crate::metrics::{POLL_ATTEMPTS, RUNS_TOTAL, RUN_DURATION};

use super::config::WorkflowConfig;
use super::types::{
    DocumentBundle, SubmissionRequest, WorkflowError, WorkflowFailure, WorkflowState,
    WorkflowStep,
};
use super::{MAX_POLL_ATTEMPTS, POLL_INTERVAL};

/// Drives one submit -> trigger -> poll -> fetch run against the generation service.
pub struct BriefOrchestrator {
    backend: Arc<dyn BriefingBackend>,
    config: WorkflowConfig,
}

impl BriefOrchestrator {
    /// Create a new orchestrator.
    pub fn new(backend: Arc<dyn BriefingBackend>, config: WorkflowConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Execute a run, reporting every state change to `on_state`.
    ///
    /// The last reported state is terminal and is also returned.
    pub async fn run<F>(&self, request: SubmissionRequest, mut on_state: F) -> WorkflowState
    where
        F: FnMut(&WorkflowState) + Send,
    {
        let started = Instant::now();
        let mut polls = 0u32;

        info!("Starting brief run for '{}'", request.company_name());

        let result = self
            .execute(&request, &mut |step: WorkflowStep| {
                if let WorkflowStep::Polling { attempt } = step {
                    polls = attempt;
                }
                on_state(&WorkflowState::Submitting(step));
            })
            .await;

        let (state, outcome) = match result {
            Ok(bundle) => {
                info!(
                    "Brief run for '{}' succeeded (session {}, brief {} bytes, packet {} bytes)",
                    bundle.company_name,
                    bundle.session_id,
                    bundle.brief_text.len(),
                    bundle.packet_text.len()
                );
                (WorkflowState::Succeeded(bundle), "succeeded")
            }
            Err(e) => {
                warn!("Brief run for '{}' failed: {}", request.company_name(), e);
                let failure = WorkflowFailure::from_error(&e);
                let outcome = failure.kind.as_str();
                (WorkflowState::Failed(failure), outcome)
            }
        };

        RUNS_TOTAL.with_label_values(&[outcome]).inc();
        RUN_DURATION
            .with_label_values(&[outcome])
            .observe(started.elapsed().as_secs_f64());
        if polls > 0 {
            POLL_ATTEMPTS
                .with_label_values(&[outcome])
                .observe(polls as f64);
        }

        on_state(&state);
        state
    }

    /// The run itself; every step is attempted only if the previous succeeded.
    async fn execute(
        &self,
        request: &SubmissionRequest,
        progress: &mut (dyn FnMut(WorkflowStep) + Send),
    ) -> Result<DocumentBundle, WorkflowError> {
        progress(WorkflowStep::Ingesting {
            company_name: request.company_name().to_string(),
        });
        let ingest = self.backend.ingest(&request.to_ingest_request()).await?;
        let session_id = ingest
            .session_id()
            .ok_or(WorkflowError::MissingSessionId)?
            .to_string();
        debug!("Session {} created for '{}'", session_id, request.company_name());

        progress(WorkflowStep::Generating);
        let ack = self.backend.trigger_generation(&session_id).await?;
        if !ack.is_success() {
            if self.config.verify_trigger_status {
                return Err(WorkflowError::TriggerRejected { status: ack.status });
            }
            warn!(
                "Ignoring HTTP {} from generation trigger for session {}",
                ack.status, session_id
            );
        }

        let outputs = self.poll_until_ready(&session_id, progress).await?;

        progress(WorkflowStep::LoadingDocuments);
        let (brief_text, packet_text) = self.load_documents(&outputs).await?;

        Ok(DocumentBundle {
            session_id: outputs.session_id().unwrap_or(&session_id).to_string(),
            company_name: request.company_name().to_string(),
            interviewee_email: request.interviewee_email().to_string(),
            brief_text,
            packet_text,
        })
    }

    /// Poll the session status until it is terminal or the budget runs out.
    ///
    /// Each attempt waits one interval, then makes exactly one request; the
    /// next wait only starts after that request finished, so polls never overlap.
    async fn poll_until_ready(
        &self,
        session_id: &str,
        progress: &mut (dyn FnMut(WorkflowStep) + Send),
    ) -> Result<OutputsResponse, WorkflowError> {
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            progress(WorkflowStep::Polling { attempt });
            tokio::time::sleep(POLL_INTERVAL).await;

            let outputs = self.backend.fetch_outputs(session_id).await?;
            if outputs.is_success() {
                debug!(
                    "Session {} ready after {} poll(s) ({})",
                    session_id,
                    attempt,
                    outputs.status_label()
                );
                return Ok(outputs);
            }
            if outputs.is_failed() {
                return Err(WorkflowError::ServerReportedFailure);
            }
            debug!(
                "Session {} not ready (attempt {}/{}, status {})",
                session_id,
                attempt,
                MAX_POLL_ATTEMPTS,
                outputs.status_label()
            );
        }

        Err(WorkflowError::Timeout {
            attempts: MAX_POLL_ATTEMPTS,
        })
    }

    /// Fetch both documents; a missing URL yields an empty text.
    async fn load_documents(
        &self,
        outputs: &OutputsResponse,
    ) -> Result<(String, String), BackendError> {
        let brief = self.fetch_optional(outputs.interviewer_brief_url());
        let packet = self.fetch_optional(outputs.pre_interview_packet_url());

        if self.config.fetch_documents_concurrently {
            try_join(brief, packet).await
        } else {
            Ok((brief.await?, packet.await?))
        }
    }

    async fn fetch_optional(&self, url: Option<&str>) -> Result<String, BackendError> {
        match url {
            Some(url) => self.backend.fetch_document(url).await,
            None => Ok(String::new()),
        }
    }
}
