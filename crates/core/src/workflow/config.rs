//! Workflow configuration.

use serde::{Deserialize, Serialize};

/// Configuration for brief workflow runs.
///
/// Poll interval and attempt budget are fixed (see [`super::POLL_INTERVAL`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Fail the run when `POST /generate` answers with a non-2xx status.
    /// When disabled, any HTTP response counts as an accepted trigger.
    #[serde(default = "default_verify_trigger")]
    pub verify_trigger_status: bool,

    /// Download the brief and the packet concurrently instead of one after
    /// the other.
    #[serde(default)]
    pub fetch_documents_concurrently: bool,
}

fn default_verify_trigger() -> bool {
    true
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            verify_trigger_status: default_verify_trigger(),
            fetch_documents_concurrently: false,
        }
    }
}
