//! HTTP API for the timesheet approval workflow.
//!
//! This module provides the REST endpoints for quoting, creating and
//! approving timesheets and reading their audit history.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ACTOR_ID_HEADER, ACTOR_ROLE_HEADER, Actor, ApprovalRequest, CreateTimesheetRequest,
    FINANCIAL_FIELDS, QuoteRequest,
};
pub use response::{ApiError, ApiErrorResponse, ApprovalResponse, ConfigResponse, TimesheetResponse};
pub use state::AppState;
