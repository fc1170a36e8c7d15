//! Types for the brief workflow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{BackendError, IngestRequest};

/// Errors that end a workflow run, plus the pre-flight validation error.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Company name was empty after trimming. No request is made.
    #[error("company name must not be empty")]
    EmptyCompanyName,

    /// `POST /ingest` answered without a session id.
    #[error("No sessionId returned from server")]
    MissingSessionId,

    /// Any network, status or parse failure talking to the service.
    #[error("{0}")]
    Transport(#[from] BackendError),

    /// `POST /generate` answered with a non-2xx status.
    #[error("Generation request was rejected by the server (HTTP {status})")]
    TriggerRejected { status: u16 },

    /// The service reported `FAILED` while polling.
    #[error("Brief generation failed on the server. Please try again.")]
    ServerReportedFailure,

    /// No terminal status after the full polling budget.
    #[error("Request timed out after 2 minutes. Please try again.")]
    Timeout { attempts: u32 },
}

impl WorkflowError {
    /// Failure category for a run-ending error; `None` for validation errors.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            WorkflowError::EmptyCompanyName => None,
            WorkflowError::MissingSessionId => Some(FailureKind::MissingSessionId),
            WorkflowError::Transport(_) => Some(FailureKind::TransportFailure),
            WorkflowError::TriggerRejected { .. } => Some(FailureKind::TriggerRejected),
            WorkflowError::ServerReportedFailure => Some(FailureKind::ServerReportedFailure),
            WorkflowError::Timeout { .. } => Some(FailureKind::Timeout),
        }
    }
}

/// Why a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingSessionId,
    TransportFailure,
    TriggerRejected,
    ServerReportedFailure,
    Timeout,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::MissingSessionId => "missing_session_id",
            FailureKind::TransportFailure => "transport_failure",
            FailureKind::TriggerRejected => "trigger_rejected",
            FailureKind::ServerReportedFailure => "server_reported_failure",
            FailureKind::Timeout => "timeout",
        }
    }
}

/// Observable form of a failed run: a category and the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl WorkflowFailure {
    /// Build from a run-ending error. Validation errors never reach a run,
    /// so they are reported as transport failures if they ever do.
    pub fn from_error(error: &WorkflowError) -> Self {
        Self {
            kind: error
                .failure_kind()
                .unwrap_or(FailureKind::TransportFailure),
            message: error.to_string(),
        }
    }
}

/// User input for one run. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    company_name: String,
    interviewee_email: String,
}

impl SubmissionRequest {
    /// Trim both fields; reject an empty company name.
    pub fn new(company_name: &str, interviewee_email: &str) -> Result<Self, WorkflowError> {
        let company_name = company_name.trim();
        if company_name.is_empty() {
            return Err(WorkflowError::EmptyCompanyName);
        }
        Ok(Self {
            company_name: company_name.to_string(),
            interviewee_email: interviewee_email.trim().to_string(),
        })
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn interviewee_email(&self) -> &str {
        &self.interviewee_email
    }

    pub fn to_ingest_request(&self) -> IngestRequest {
        IngestRequest {
            company_name: self.company_name.clone(),
            interviewee_email: self.interviewee_email.clone(),
        }
    }
}

/// The two generated documents of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBundle {
    pub session_id: String,
    pub company_name: String,
    pub interviewee_email: String,
    /// Empty when the service returned no brief URL.
    pub brief_text: String,
    /// Empty when the service returned no packet URL.
    pub packet_text: String,
}

impl DocumentBundle {
    pub fn document(&self, tab: DocumentTab) -> &str {
        match tab {
            DocumentTab::Brief => &self.brief_text,
            DocumentTab::Packet => &self.packet_text,
        }
    }
}

/// Which document of a bundle to display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentTab {
    #[default]
    Brief,
    Packet,
}

impl FromStr for DocumentTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brief" => Ok(DocumentTab::Brief),
            "packet" => Ok(DocumentTab::Packet),
            other => Err(format!("unknown document tab '{}'", other)),
        }
    }
}

/// In-flight step of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WorkflowStep {
    /// Submitting the company to `POST /ingest`.
    Ingesting { company_name: String },
    /// Calling `POST /generate`.
    Generating,
    /// Waiting for status poll `attempt` (1-based).
    ///
    /// `attempt` is extra detail for observers; the description stays the
    /// same for every attempt.
    Polling { attempt: u32 },
    /// Downloading the generated documents.
    LoadingDocuments,
}

impl WorkflowStep {
    pub fn description(&self) -> String {
        match self {
            WorkflowStep::Ingesting { company_name } => {
                format!("Collecting data about {}...", company_name)
            }
            WorkflowStep::Generating => "Generating interview brief...".to_string(),
            WorkflowStep::Polling { .. } => "Waiting for brief to be ready...".to_string(),
            WorkflowStep::LoadingDocuments => "Loading documents...".to_string(),
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// State of a run as seen by observers.
///
/// Within a run transitions only move forward:
/// `Idle -> Submitting(..)* -> Succeeded | Failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Idle,
    Submitting(WorkflowStep),
    Succeeded(DocumentBundle),
    Failed(WorkflowFailure),
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Succeeded(_) | WorkflowState::Failed(_))
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, WorkflowState::Submitting(_))
    }

    pub fn bundle(&self) -> Option<&DocumentBundle> {
        match self {
            WorkflowState::Succeeded(bundle) => Some(bundle),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&WorkflowFailure> {
        match self {
            WorkflowState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Short name for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Submitting(_) => "submitting",
            WorkflowState::Succeeded(_) => "succeeded",
            WorkflowState::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> DocumentBundle {
        DocumentBundle {
            session_id: "s-1".to_string(),
            company_name: "GridFlex Energy".to_string(),
            interviewee_email: String::new(),
            brief_text: "brief".to_string(),
            packet_text: "packet".to_string(),
        }
    }

    #[test]
    fn test_submission_request_trims() {
        let request = SubmissionRequest::new("  GridFlex Energy ", " john@gridflex.com\n").unwrap();
        assert_eq!(request.company_name(), "GridFlex Energy");
        assert_eq!(request.interviewee_email(), "john@gridflex.com");

        let ingest = request.to_ingest_request();
        assert_eq!(ingest.company_name, "GridFlex Energy");
        assert_eq!(ingest.interviewee_email, "john@gridflex.com");
    }

    #[test]
    fn test_submission_request_rejects_blank_company() {
        assert!(matches!(
            SubmissionRequest::new("", "a@b.c"),
            Err(WorkflowError::EmptyCompanyName)
        ));
        assert!(matches!(
            SubmissionRequest::new("   \t", ""),
            Err(WorkflowError::EmptyCompanyName)
        ));
    }

    #[test]
    fn test_submission_request_allows_empty_email() {
        let request = SubmissionRequest::new("Acme", "").unwrap();
        assert_eq!(request.interviewee_email(), "");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            WorkflowError::MissingSessionId.to_string(),
            "No sessionId returned from server"
        );
        assert_eq!(
            WorkflowError::ServerReportedFailure.to_string(),
            "Brief generation failed on the server. Please try again."
        );
        assert_eq!(
            WorkflowError::Timeout { attempts: 24 }.to_string(),
            "Request timed out after 2 minutes. Please try again."
        );

        let err = WorkflowError::from(BackendError::ParseError("bad json".to_string()));
        assert_eq!(err.to_string(), "Failed to parse response: bad json");
    }

    #[test]
    fn test_failure_from_error() {
        let failure = WorkflowFailure::from_error(&WorkflowError::TriggerRejected { status: 503 });
        assert_eq!(failure.kind, FailureKind::TriggerRejected);
        assert!(failure.message.contains("503"));

        assert_eq!(WorkflowError::EmptyCompanyName.failure_kind(), None);
    }

    #[test]
    fn test_document_tab_selection() {
        let bundle = bundle();
        assert_eq!(bundle.document(DocumentTab::Brief), "brief");
        assert_eq!(bundle.document(DocumentTab::Packet), "packet");
        assert_eq!(DocumentTab::default(), DocumentTab::Brief);
    }

    #[test]
    fn test_document_tab_from_str() {
        assert_eq!("brief".parse::<DocumentTab>(), Ok(DocumentTab::Brief));
        assert_eq!("packet".parse::<DocumentTab>(), Ok(DocumentTab::Packet));
        assert!("summary".parse::<DocumentTab>().is_err());
    }

    #[test]
    fn test_step_descriptions() {
        let step = WorkflowStep::Ingesting {
            company_name: "Acme".to_string(),
        };
        assert_eq!(step.description(), "Collecting data about Acme...");
        assert_eq!(
            WorkflowStep::Polling { attempt: 7 }.to_string(),
            "Waiting for brief to be ready..."
        );
    }

    #[test]
    fn test_state_serialization_shape() {
        let json = serde_json::to_value(WorkflowState::Idle).unwrap();
        assert_eq!(json["state"], "idle");

        let json =
            serde_json::to_value(WorkflowState::Submitting(WorkflowStep::Polling { attempt: 3 }))
                .unwrap();
        assert_eq!(json["state"], "submitting");
        assert_eq!(json["detail"]["step"], "polling");
        assert_eq!(json["detail"]["attempt"], 3);

        let json = serde_json::to_value(WorkflowState::Succeeded(bundle())).unwrap();
        assert_eq!(json["detail"]["briefText"], "brief");

        let json = serde_json::to_value(WorkflowState::Failed(WorkflowFailure {
            kind: FailureKind::Timeout,
            message: "late".to_string(),
        }))
        .unwrap();
        assert_eq!(json["detail"]["kind"], "timeout");
    }

    #[test]
    fn test_state_predicates() {
        assert!(!WorkflowState::Idle.is_terminal());
        assert!(WorkflowState::Submitting(WorkflowStep::Generating).is_in_progress());
        assert!(WorkflowState::Succeeded(bundle()).is_terminal());
        assert_eq!(WorkflowState::Succeeded(bundle()).bundle().unwrap().session_id, "s-1");
        assert!(WorkflowState::Idle.failure().is_none());
    }
}
