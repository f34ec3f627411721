//! Error types for the timesheet engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the rate engine and the approval workflow can report.
//! Each variant carries a machine-stable code and an HTTP status class so the
//! API layer never has to guess how to present it.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ApprovalAction, ApprovalStatus, Qualification, TaskType};

/// The main error type for the timesheet engine.
///
/// # Example
///
/// ```
/// use timesheet_engine::error::EngineError;
///
/// let error = EngineError::TimesheetNotFound { id: 42 };
/// assert_eq!(error.to_string(), "Timesheet not found: 42");
/// assert_eq!(error.code(), "RESOURCE_NOT_FOUND");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but is internally inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the inconsistency.
        message: String,
    },

    /// No rate table or rule covers the requested combination.
    #[error(
        "No EA rate found for {task_type} (qualification={qualification}, repeat={repeat}) on {date}"
    )]
    RateNotFound {
        /// The task type being quoted.
        task_type: TaskType,
        /// The tutor qualification being quoted.
        qualification: Qualification,
        /// Whether the delivery was a repeat.
        repeat: bool,
        /// The session date used for rate table selection.
        date: NaiveDate,
    },

    /// Input was malformed or violated a business rule.
    #[error("{message}")]
    ValidationFailed {
        /// Names the violated rule and the offending value.
        message: String,
    },

    /// The action can never be applied to the timesheet in its current status.
    #[error("Cannot perform {action} on timesheet with status {status}")]
    InvalidTransition {
        /// The requested action.
        action: ApprovalAction,
        /// The status the timesheet is in.
        status: ApprovalStatus,
    },

    /// The actor's role or scope does not permit the operation.
    #[error("Access denied: {message}")]
    AccessDenied {
        /// Why access was denied.
        message: String,
    },

    /// The action is valid for the workflow but its prerequisite step has not happened yet.
    #[error("{message}")]
    WorkflowConflict {
        /// Names the missing prerequisite.
        message: String,
    },

    /// Another writer changed the timesheet between load and commit.
    #[error(
        "Timesheet {timesheet_id} was modified concurrently (expected version {expected_version}, found {actual_version})"
    )]
    ConcurrentModification {
        /// The contested timesheet.
        timesheet_id: u64,
        /// The version read before evaluating the transition.
        expected_version: u64,
        /// The version found at commit time.
        actual_version: u64,
    },

    /// No timesheet exists with the given id.
    #[error("Timesheet not found: {id}")]
    TimesheetNotFound {
        /// The unknown id.
        id: u64,
    },

    /// The request carried no usable identity.
    #[error("Authentication required: {message}")]
    Unauthenticated {
        /// What was missing or malformed.
        message: String,
    },

    /// The backing store could not complete the operation.
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        /// A description of the storage failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::ValidationFailed`].
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::ValidationFailed {
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::AccessDenied`].
    pub fn access_denied(message: impl Into<String>) -> Self {
        EngineError::AccessDenied {
            message: message.into(),
        }
    }

    /// The uniqueness violation for a (tutor, course, week) triple.
    pub fn duplicate_timesheet(tutor_id: u64, course_id: u64, week_start_date: NaiveDate) -> Self {
        EngineError::validation(format!(
            "Timesheet already exists for this tutor, course, and week. Tutor ID: {}, Course ID: {}, Week: {}",
            tutor_id, course_id, week_start_date
        ))
    }

    /// Returns the machine-stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => "CONFIG_ERROR",
            EngineError::RateNotFound { .. } => "RATE_NOT_FOUND",
            EngineError::ValidationFailed { .. } | EngineError::InvalidTransition { .. } => {
                "VALIDATION_FAILED"
            }
            EngineError::AccessDenied { .. } => "ACCESS_DENIED",
            EngineError::WorkflowConflict { .. } | EngineError::ConcurrentModification { .. } => {
                "RESOURCE_CONFLICT"
            }
            EngineError::TimesheetNotFound { .. } => "RESOURCE_NOT_FOUND",
            EngineError::Unauthenticated { .. } => "AUTH_FAILED",
            EngineError::StorageUnavailable { .. } => "SERVICE_UNAVAILABLE",
        }
    }

    /// Returns the HTTP status code this error surfaces as.
    pub fn http_status(&self) -> u16 {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => 500,
            EngineError::RateNotFound { .. }
            | EngineError::ValidationFailed { .. }
            | EngineError::InvalidTransition { .. } => 400,
            EngineError::Unauthenticated { .. } => 401,
            EngineError::AccessDenied { .. } => 403,
            EngineError::TimesheetNotFound { .. } => 404,
            EngineError::WorkflowConflict { .. } | EngineError::ConcurrentModification { .. } => 409,
            EngineError::StorageUnavailable { .. } => 503,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/agreement.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/agreement.yaml"
        );
        assert_eq!(error.http_status(), 500);
    }

    #[test]
    fn test_invalid_transition_names_action_and_status() {
        let error = EngineError::InvalidTransition {
            action: ApprovalAction::LecturerConfirm,
            status: ApprovalStatus::FinalConfirmed,
        };
        assert_eq!(
            error.to_string(),
            "Cannot perform LECTURER_CONFIRM on timesheet with status FINAL_CONFIRMED"
        );
        assert_eq!(error.code(), "VALIDATION_FAILED");
        assert_eq!(error.http_status(), 400);
    }

    #[test]
    fn test_rate_not_found_displays_combination() {
        let error = EngineError::RateNotFound {
            task_type: TaskType::Tutorial,
            qualification: Qualification::Phd,
            repeat: true,
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "No EA rate found for TUTORIAL (qualification=PHD, repeat=true) on 2020-01-01"
        );
    }

    #[test]
    fn test_conflicts_share_a_code() {
        let ordering = EngineError::WorkflowConflict {
            message: "Admin approval requires prior Lecturer approval".to_string(),
        };
        let concurrent = EngineError::ConcurrentModification {
            timesheet_id: 7,
            expected_version: 2,
            actual_version: 3,
        };
        assert_eq!(ordering.code(), "RESOURCE_CONFLICT");
        assert_eq!(concurrent.code(), "RESOURCE_CONFLICT");
        assert_eq!(ordering.http_status(), 409);
        assert_eq!(concurrent.http_status(), 409);
        assert!(concurrent.to_string().contains("expected version 2, found 3"));
    }

    #[test]
    fn test_status_mapping_covers_taxonomy() {
        assert_eq!(EngineError::validation("x").http_status(), 400);
        assert_eq!(EngineError::access_denied("x").http_status(), 403);
        assert_eq!(EngineError::TimesheetNotFound { id: 1 }.http_status(), 404);
        assert_eq!(
            EngineError::Unauthenticated {
                message: "x".to_string()
            }
            .http_status(),
            401
        );
        assert_eq!(
            EngineError::StorageUnavailable {
                message: "x".to_string()
            }
            .http_status(),
            503
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::TimesheetNotFound { id: 9 })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
