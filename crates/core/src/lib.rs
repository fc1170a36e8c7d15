pub mod backend;
pub mod config;
pub mod metrics;
pub mod testing;
pub mod workflow;

pub use backend::{BackendError, BriefingBackend, HttpBriefingBackend};
pub use config::{
    load_config, load_config_from_str, validate_config, BackendConfig, Config, ConfigError,
    ServerConfig,
};
pub use workflow::{
    BriefOrchestrator, DocumentBundle, DocumentTab, FailureKind, RunSnapshot, SubmissionRequest,
    WorkflowConfig, WorkflowError, WorkflowFailure, WorkflowHandle, WorkflowState, WorkflowStep,
};
