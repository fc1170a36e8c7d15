//! Ownership of the single active run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use super::runner::BriefOrchestrator;
use super::types::{SubmissionRequest, WorkflowError, WorkflowState};

/// The observed state, tagged with the run that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    /// `None` until the first run starts.
    pub run_id: Option<Uuid>,
    pub state: WorkflowState,
    pub updated_at: DateTime<Utc>,
}

impl RunSnapshot {
    fn new(run_id: Option<Uuid>, state: WorkflowState) -> Self {
        Self {
            run_id,
            state,
            updated_at: Utc::now(),
        }
    }
}

impl Default for RunSnapshot {
    fn default() -> Self {
        Self::new(None, WorkflowState::Idle)
    }
}

struct ActiveRun {
    run_id: Uuid,
    task: JoinHandle<()>,
}

/// Starts runs and publishes their state.
///
/// At most one run is active. Starting a new run aborts the previous one,
/// and every publication is checked against the current run id, so a stale
/// run can never change what observers see.
pub struct WorkflowHandle {
    orchestrator: Arc<BriefOrchestrator>,
    snapshot_tx: Arc<watch::Sender<RunSnapshot>>,
    active: Mutex<Option<ActiveRun>>,
}

impl WorkflowHandle {
    pub fn new(orchestrator: BriefOrchestrator) -> Self {
        let (snapshot_tx, _) = watch::channel(RunSnapshot::default());
        Self {
            orchestrator: Arc::new(orchestrator),
            snapshot_tx: Arc::new(snapshot_tx),
            active: Mutex::new(None),
        }
    }

    /// Validate the input and start a run, replacing any active one.
    pub async fn start(
        &self,
        company_name: &str,
        interviewee_email: &str,
    ) -> Result<Uuid, WorkflowError> {
        let request = SubmissionRequest::new(company_name, interviewee_email)?;
        let run_id = Uuid::new_v4();

        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            if !previous.task.is_finished() {
                info!("Run {} replaced by run {}", previous.run_id, run_id);
            }
            previous.task.abort();
        }

        // Switch ownership before the new task can publish anything.
        self.snapshot_tx
            .send_replace(RunSnapshot::new(Some(run_id), WorkflowState::Idle));

        let orchestrator = Arc::clone(&self.orchestrator);
        let snapshot_tx = Arc::clone(&self.snapshot_tx);
        let task = tokio::spawn(async move {
            orchestrator
                .run(request, |state| publish(&snapshot_tx, run_id, state))
                .await;
        });

        *active = Some(ActiveRun { run_id, task });
        Ok(run_id)
    }

    /// Latest snapshot.
    pub fn current(&self) -> RunSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RunSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Wait for `run_id` to reach a terminal state.
    ///
    /// Returns `None` if another run replaced it first.
    pub async fn wait_until_finished(&self, run_id: Uuid) -> Option<RunSnapshot> {
        let mut rx = self.subscribe();
        let snapshot = rx
            .wait_for(|s| s.run_id != Some(run_id) || s.state.is_terminal())
            .await
            .ok()?
            .clone();

        (snapshot.run_id == Some(run_id)).then_some(snapshot)
    }
}

impl Drop for WorkflowHandle {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().take() {
            active.task.abort();
        }
    }
}

/// Publish `state` only while `run_id` still owns the snapshot.
fn publish(tx: &watch::Sender<RunSnapshot>, run_id: Uuid, state: &WorkflowState) {
    tx.send_if_modified(|snapshot| {
        if snapshot.run_id != Some(run_id) {
            return false;
        }
        *snapshot = RunSnapshot::new(Some(run_id), state.clone());
        true
    });
}
