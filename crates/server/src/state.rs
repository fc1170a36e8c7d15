use briefing_core::{Config, WorkflowHandle};

/// Shared application state
pub struct AppState {
    config: Config,
    workflow: WorkflowHandle,
}

impl AppState {
    pub fn new(config: Config, workflow: WorkflowHandle) -> Self {
        Self { config, workflow }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn workflow(&self) -> &WorkflowHandle {
        &self.workflow
    }
}
