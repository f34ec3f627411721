//! Request types for the timesheet API.
//!
//! Quote and create bodies carry instructional fields only and reject
//! unknown fields. The caller's identity comes from the `X-Actor-Id` and
//! `X-Actor-Role` headers set by the identity service in front of this API.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;
use crate::models::{
    ApprovalAction, NewTimesheet, Principal, Qualification, QuoteInput, Role, TaskType,
};

use super::response::ApiErrorResponse;

/// Header carrying the authenticated user id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Header carrying the authenticated user's role.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Field names the server derives and never accepts from a caller.
pub const FINANCIAL_FIELDS: [&str; 8] = [
    "hourlyRate",
    "amount",
    "rateCode",
    "associatedHours",
    "payableHours",
    "rateVersion",
    "formula",
    "clauseReference",
];

/// Returns the financial field names present in a JSON object body.
pub fn financial_fields_in(body: &Value) -> Vec<&'static str> {
    match body.as_object() {
        Some(object) => FINANCIAL_FIELDS
            .into_iter()
            .filter(|field| object.contains_key(*field))
            .collect(),
        None => Vec::new(),
    }
}

/// The authenticated caller, extracted from request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub Principal);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiErrorResponse> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            EngineError::Unauthenticated {
                message: format!("missing {} header", name),
            }
            .into()
        })
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, ACTOR_ID_HEADER)?
            .parse::<u64>()
            .map_err(|_| EngineError::Unauthenticated {
                message: format!("{} must be a numeric user id", ACTOR_ID_HEADER),
            })?;

        let role = header(parts, ACTOR_ROLE_HEADER)?
            .parse::<Role>()
            .map_err(|message| EngineError::Unauthenticated { message })?;

        Ok(Actor(Principal::new(id, role)))
    }
}

/// Request body for `POST /api/timesheets/quote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuoteRequest {
    /// The tutor the quote is for; informational.
    #[serde(default)]
    pub tutor_id: Option<u64>,
    /// The course the quote is for; informational.
    #[serde(default)]
    pub course_id: Option<u64>,
    /// The kind of work.
    pub task_type: TaskType,
    /// The tutor's qualification band.
    #[serde(default)]
    pub qualification: Qualification,
    /// Whether this is a repeat delivery.
    #[serde(default)]
    pub repeat: bool,
    /// Contact hours delivered.
    pub delivery_hours: Decimal,
    /// Date of the session.
    pub session_date: NaiveDate,
}

impl From<QuoteRequest> for QuoteInput {
    fn from(request: QuoteRequest) -> Self {
        QuoteInput {
            task_type: request.task_type,
            qualification: request.qualification,
            delivery_hours: request.delivery_hours,
            repeat: request.repeat,
            session_date: request.session_date,
        }
    }
}

/// Request body for `POST /api/timesheets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTimesheetRequest {
    /// The tutor being paid.
    pub tutor_id: u64,
    /// The course.
    pub course_id: u64,
    /// The kind of work.
    pub task_type: TaskType,
    /// The tutor's qualification band.
    #[serde(default)]
    pub qualification: Qualification,
    /// Monday of the work week.
    pub week_start_date: NaiveDate,
    /// Date of the session; defaults to the week start.
    #[serde(default)]
    pub session_date: Option<NaiveDate>,
    /// Contact hours delivered.
    pub delivery_hours: Decimal,
    /// Whether this is a repeat delivery.
    #[serde(default)]
    pub repeat: bool,
    /// Description of the work.
    pub description: String,
}

impl CreateTimesheetRequest {
    /// Converts into a domain create request on behalf of `created_by`.
    pub fn into_new_timesheet(self, created_by: u64) -> NewTimesheet {
        NewTimesheet {
            tutor_id: self.tutor_id,
            course_id: self.course_id,
            created_by,
            task_type: self.task_type,
            qualification: self.qualification,
            week_start_date: self.week_start_date,
            session_date: self.session_date.unwrap_or(self.week_start_date),
            delivery_hours: self.delivery_hours,
            repeat: self.repeat,
            description: self.description,
        }
    }
}

/// Request body for `POST /api/approvals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApprovalRequest {
    /// The timesheet to act on.
    pub timesheet_id: u64,
    /// The action to apply.
    pub action: ApprovalAction,
    /// Reviewer comment; required for REJECT and REQUEST_MODIFICATION.
    #[serde(default)]
    pub comment: Option<String>,
}
