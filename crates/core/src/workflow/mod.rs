//! Brief generation workflow.
//!
//! A run drives the generation service through four steps:
//! - **Submit**: register the company and obtain a session id
//! - **Trigger**: start generation for the session
//! - **Poll**: check the session status every [`POLL_INTERVAL`], at most
//!   [`MAX_POLL_ATTEMPTS`] times
//! - **Fetch**: download the interviewer brief and the pre-interview packet
//!
//! [`BriefOrchestrator`] executes a single run. [`WorkflowHandle`] owns the one
//! active run and publishes its [`WorkflowState`] to observers.

mod config;
mod handle;
mod runner;
mod types;

use std::time::Duration;

pub use config::WorkflowConfig;
pub use handle::{RunSnapshot, WorkflowHandle};
pub use runner::BriefOrchestrator;
pub use types::{
    DocumentBundle, DocumentTab, FailureKind, SubmissionRequest, WorkflowError, WorkflowFailure,
    WorkflowState, WorkflowStep,
};

/// Delay before each status poll.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Status polls made before a run times out (24 x 5s = 2 minutes).
pub const MAX_POLL_ATTEMPTS: u32 = 24;
