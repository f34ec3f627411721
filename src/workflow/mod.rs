//! The approval workflow.
//!
//! This module contains the validation layer, the authorization gate, the
//! approval state machine, the audit log and the [`WorkflowService`] that
//! runs them in order.

mod audit;
mod authorization;
mod service;
mod state_machine;
mod validation;

pub use audit::AuditLog;
pub use authorization::{AuthorizationGate, Decision};
pub use service::{ActionOutcome, TimesheetView, WorkflowService};
pub use state_machine::{
    TRANSITIONS, Transition, applicable_actions, is_applicable, next_status, transition_for,
};
pub use validation::{TimesheetValidator, day_name};
