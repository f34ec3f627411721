//! HTTP request handlers for the timesheet API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::QuoteInput;

use super::request::{
    Actor, ApprovalRequest, CreateTimesheetRequest, QuoteRequest, financial_fields_in,
};
use super::response::{
    ApiError, ApiErrorResponse, ApprovalResponse, ConfigResponse, TimesheetResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/timesheets", post(create_timesheet_handler))
        .route("/api/timesheets/quote", post(quote_handler))
        .route("/api/timesheets/config", get(config_handler))
        .route("/api/timesheets/:id", get(get_timesheet_handler))
        .route("/api/approvals", post(approval_handler))
        .route("/api/approvals/pending", get(pending_handler))
        .route("/api/approvals/history/:timesheet_id", get(history_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: &Uuid, error: impl Into<ApiErrorResponse>) -> Response {
    let api_error: ApiErrorResponse = error.into();
    warn!(
        correlation_id = %correlation_id,
        status = api_error.status.as_u16(),
        code = %api_error.error.code,
        message = %api_error.error.message,
        "Request failed"
    );
    json_response(api_error.status, api_error.error)
}

/// Parses a JSON body, optionally refusing server-derived financial fields.
fn parse_body<T: DeserializeOwned>(
    correlation_id: &Uuid,
    payload: Result<Json<Value>, JsonRejection>,
    reject_financial_fields: bool,
) -> Result<T, ApiErrorResponse> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                other => ApiError::malformed_json(other.body_text()),
            };
            return Err(ApiErrorResponse::bad_request(error));
        }
    };

    if reject_financial_fields {
        let supplied = financial_fields_in(&body);
        if !supplied.is_empty() {
            warn!(
                correlation_id = %correlation_id,
                fields = ?supplied,
                "Rejected client-supplied financial fields"
            );
            return Err(ApiErrorResponse::bad_request(
                ApiError::financial_fields_supplied(&supplied),
            ));
        }
    }

    serde_json::from_value(body).map_err(|err| {
        ApiErrorResponse::bad_request(ApiError::validation_error(format!(
            "Invalid request body: {}",
            err
        )))
    })
}

fn parse_id(path: Result<Path<u64>, PathRejection>) -> Result<u64, ApiErrorResponse> {
    path.map(|Path(id)| id).map_err(|rejection| {
        ApiErrorResponse::bad_request(ApiError::validation_error(format!(
            "Invalid timesheet id: {}",
            rejection.body_text()
        )))
    })
}

/// Handler for POST /api/timesheets/quote.
///
/// Previews the financial fields for a delivery without storing anything.
async fn quote_handler(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, actor_id = actor.id, "Processing quote request");

    let request: QuoteRequest = match parse_body(&correlation_id, payload, true) {
        Ok(request) => request,
        Err(err) => return error_response(&correlation_id, err),
    };
    let tutor_id = request.tutor_id;
    let course_id = request.course_id;

    match state.service().quote(&QuoteInput::from(request)) {
        Ok(quote) => {
            info!(
                correlation_id = %correlation_id,
                tutor_id = ?tutor_id,
                course_id = ?course_id,
                rate_code = %quote.rate_code,
                amount = %quote.amount,
                "Quote calculated"
            );
            json_response(StatusCode::OK, quote)
        }
        Err(err) => error_response(&correlation_id, err),
    }
}

/// Handler for POST /api/timesheets.
///
/// Responds with the DRAFT as created; the automatic submit that follows is
/// visible only through a later read or the history.
async fn create_timesheet_handler(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        actor_id = actor.id,
        actor_role = %actor.role,
        "Processing create timesheet request"
    );

    let request: CreateTimesheetRequest = match parse_body(&correlation_id, payload, true) {
        Ok(request) => request,
        Err(err) => return error_response(&correlation_id, err),
    };

    match state
        .service()
        .create(&actor, request.into_new_timesheet(actor.id))
    {
        Ok(draft) => {
            info!(
                correlation_id = %correlation_id,
                timesheet_id = draft.id(),
                "Timesheet created"
            );
            json_response(StatusCode::CREATED, TimesheetResponse::from(draft))
        }
        Err(err) => error_response(&correlation_id, err),
    }
}

/// Handler for GET /api/timesheets/config.
async fn config_handler(State(state): State<AppState>, Actor(_actor): Actor) -> Response {
    json_response(
        StatusCode::OK,
        ConfigResponse::from(state.service().config()),
    )
}

/// Handler for GET /api/timesheets/:id.
async fn get_timesheet_handler(
    State(state): State<AppState>,
    Actor(actor): Actor,
    path: Result<Path<u64>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = match parse_id(path) {
        Ok(id) => id,
        Err(err) => return error_response(&correlation_id, err),
    };

    match state.service().get(&actor, id) {
        Ok(view) => json_response(StatusCode::OK, TimesheetResponse::from(view)),
        Err(err) => error_response(&correlation_id, err),
    }
}

/// Handler for POST /api/approvals.
async fn approval_handler(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request: ApprovalRequest = match parse_body(&correlation_id, payload, false) {
        Ok(request) => request,
        Err(err) => return error_response(&correlation_id, err),
    };

    info!(
        correlation_id = %correlation_id,
        actor_id = actor.id,
        actor_role = %actor.role,
        timesheet_id = request.timesheet_id,
        action = %request.action,
        "Processing approval action"
    );

    match state.service().act(
        &actor,
        request.timesheet_id,
        request.action,
        request.comment,
    ) {
        Ok(outcome) => json_response(StatusCode::OK, ApprovalResponse::from(outcome)),
        Err(err) => error_response(&correlation_id, err),
    }
}

/// Handler for GET /api/approvals/history/:timesheet_id.
async fn history_handler(
    State(state): State<AppState>,
    Actor(actor): Actor,
    path: Result<Path<u64>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let id = match parse_id(path) {
        Ok(id) => id,
        Err(err) => return error_response(&correlation_id, err),
    };

    match state.service().history(&actor, id) {
        Ok(records) => json_response(StatusCode::OK, records),
        Err(err) => error_response(&correlation_id, err),
    }
}

/// Handler for GET /api/approvals/pending.
async fn pending_handler(State(state): State<AppState>, Actor(actor): Actor) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.service().pending(&actor) {
        Ok(views) => {
            let body: Vec<TimesheetResponse> = views.into_iter().map(Into::into).collect();
            json_response(StatusCode::OK, body)
        }
        Err(err) => error_response(&correlation_id, err),
    }
}
