//! Testing utilities and a scripted generation service.
//!
//! [`MockBriefingBackend`] stands in for the HTTP client so workflow and API
//! tests run without a network.
//!
//! # Example
//!
//! ```rust,ignore
//! use briefing_core::testing::{fixtures, MockBriefingBackend};
//!
//! let backend = MockBriefingBackend::new();
//! backend.push_outputs(fixtures::pending_outputs()).await;
//! backend
//!     .push_outputs(fixtures::ready_outputs("s-1", Some("https://docs/brief"), None))
//!     .await;
//! backend.set_document("https://docs/brief", "Brief body").await;
//! ```

mod mock_backend;

pub use mock_backend::{MockBriefingBackend, MockOperation, RecordedCall};

/// Canned service responses.
pub mod fixtures {
    use crate::backend::{IngestResponse, OutputStatus, OutputsResponse};

    /// Ingest response carrying `session_id`.
    pub fn ingest_response(session_id: &str) -> IngestResponse {
        IngestResponse {
            session_id: Some(session_id.to_string()),
        }
    }

    /// Status payload for a session still being generated.
    pub fn pending_outputs() -> OutputsResponse {
        OutputsResponse {
            status: Some(OutputStatus::Pending),
            ..Default::default()
        }
    }

    /// Status payload for a session the service gave up on.
    pub fn failed_outputs() -> OutputsResponse {
        OutputsResponse {
            status: Some(OutputStatus::Failed),
            ..Default::default()
        }
    }

    /// `COMPLETE` payload with optional document URLs.
    pub fn ready_outputs(
        session_id: &str,
        brief_url: Option<&str>,
        packet_url: Option<&str>,
    ) -> OutputsResponse {
        OutputsResponse {
            status: Some(OutputStatus::Complete),
            session_id: Some(session_id.to_string()),
            interviewer_brief_url: brief_url.map(str::to_string),
            pre_interview_packet_url: packet_url.map(str::to_string),
        }
    }
}
