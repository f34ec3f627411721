//! Response types for the timesheet API.
//!
//! This module defines the JSON response bodies, the error response structure
//! and the mapping from [`EngineError`] to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ConfigLoader;
use crate::error::EngineError;
use crate::models::{
    ApprovalAction, ApprovalStatus, Qualification, Role, TaskType, Timesheet,
};
use crate::workflow::{ActionOutcome, TimesheetView};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// When the error was produced, for audit correlation.
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_FAILED", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates the error returned when a caller supplies server-derived fields.
    pub fn financial_fields_supplied(fields: &[&str]) -> Self {
        Self::with_details(
            "VALIDATION_FAILED",
            format!(
                "Financial fields are calculated by the server and must not be supplied: {}",
                fields.join(", ")
            ),
            "Send instructional fields only; rates, hours and amounts are derived by the EA rate engine",
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status =
            StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = error.code();

        let error = match &error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => {
                ApiError::with_details(code, "Configuration error", error.to_string())
            }
            EngineError::RateNotFound { .. } => ApiError::with_details(
                code,
                error.to_string(),
                "No EA rate table covers the requested combination on the session date",
            ),
            EngineError::StorageUnavailable { .. } => ApiError::with_details(
                code,
                "Service temporarily unavailable",
                error.to_string(),
            ),
            _ => ApiError::new(code, error.to_string()),
        };

        ApiErrorResponse { status, error }
    }
}

/// A timesheet as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetResponse {
    /// The timesheet fields, flattened.
    #[serde(flatten)]
    pub timesheet: Timesheet,
    /// Actions the caller may apply now; omitted on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_actions: Option<Vec<ApprovalAction>>,
}

impl From<Timesheet> for TimesheetResponse {
    fn from(timesheet: Timesheet) -> Self {
        Self {
            timesheet,
            available_actions: None,
        }
    }
}

impl From<TimesheetView> for TimesheetResponse {
    fn from(view: TimesheetView) -> Self {
        Self {
            timesheet: view.timesheet,
            available_actions: Some(view.available_actions),
        }
    }
}

/// Response body for an approval action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResponse {
    /// The timesheet acted on.
    pub timesheet_id: u64,
    /// The action applied.
    pub action: ApprovalAction,
    /// Status before the action.
    pub previous_status: ApprovalStatus,
    /// Status after the action.
    pub new_status: ApprovalStatus,
    /// Who acted.
    pub approver_id: u64,
    /// The role they acted in.
    pub approver_role: Role,
    /// Reviewer comment, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// When the transition was committed.
    pub timestamp: DateTime<Utc>,
    /// Guidance for the new status.
    pub next_steps: Vec<&'static str>,
}

impl From<ActionOutcome> for ApprovalResponse {
    fn from(outcome: ActionOutcome) -> Self {
        let record = outcome.record;
        Self {
            timesheet_id: record.timesheet_id,
            action: record.action,
            previous_status: record.previous_status,
            new_status: record.new_status,
            approver_id: record.actor_id,
            approver_role: record.actor_role,
            comment: record.comment,
            timestamp: record.timestamp,
            next_steps: record.new_status.next_steps(),
        }
    }
}

/// Inclusive delivery hour bounds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursBoundsResponse {
    /// Smallest accepted value.
    pub min: Decimal,
    /// Largest accepted value.
    pub max: Decimal,
}

/// Response body for `GET /api/timesheets/config`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    /// Agreement code.
    pub agreement_code: String,
    /// Agreement name.
    pub agreement_name: String,
    /// Accepted delivery hours.
    pub delivery_hours: HoursBoundsResponse,
    /// Longest accepted description.
    pub description_max_length: usize,
    /// Supported task types.
    pub task_types: Vec<TaskType>,
    /// Supported qualifications.
    pub qualifications: Vec<Qualification>,
    /// Loaded rate table versions, oldest first.
    pub rate_versions: Vec<String>,
}

impl From<&ConfigLoader> for ConfigResponse {
    fn from(config: &ConfigLoader) -> Self {
        let bounds = config.validation().delivery_hours;
        Self {
            agreement_code: config.agreement().code.clone(),
            agreement_name: config.agreement().name.clone(),
            delivery_hours: HoursBoundsResponse {
                min: bounds.min,
                max: bounds.max,
            },
            description_max_length: config.validation().description_max_length,
            task_types: TaskType::ALL.to_vec(),
            qualifications: Qualification::ALL.to_vec(),
            rate_versions: config
                .rate_versions()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}
