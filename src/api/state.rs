//! Application state for the timesheet API.

use std::sync::Arc;

use crate::workflow::WorkflowService;

/// Shared application state.
///
/// Holds the workflow service every handler delegates to.
#[derive(Clone)]
pub struct AppState {
    service: Arc<WorkflowService>,
}

impl AppState {
    /// Creates a new application state around the workflow service.
    pub fn new(service: WorkflowService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns the workflow service.
    pub fn service(&self) -> &WorkflowService {
        &self.service
    }
}
