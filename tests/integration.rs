//! Integration tests for the timesheet approval API.
//!
//! This test suite drives the HTTP surface end to end:
//! - Quotes for the EA Schedule 1 rate codes
//! - Rejection of client-supplied financial fields
//! - Creation, validation and automatic submission
//! - The approval lifecycle and its guards
//! - Authorization scoping and audit history

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use timesheet_engine::api::{AppState, create_router};
use timesheet_engine::clock::FixedClock;
use timesheet_engine::config::ConfigLoader;
use timesheet_engine::error::{EngineError, EngineResult};
use timesheet_engine::models::{
    ApprovalRecord, CourseAssignment, NewTimesheet, PayQuote, Timesheet,
};
use timesheet_engine::store::{
    InMemoryCourseDirectory, InMemoryStore, TimesheetStore, TransitionCommit,
};
use timesheet_engine::workflow::WorkflowService;

// =============================================================================
// Test Helpers
// =============================================================================

const ADMIN: (u64, &str) = (1, "ADMIN");
const LECTURER: (u64, &str) = (2, "LECTURER");
const TUTOR: (u64, &str) = (3, "TUTOR");
const OTHER_TUTOR: (u64, &str) = (4, "TUTOR");
const OTHER_LECTURER: (u64, &str) = (5, "LECTURER");

const COURSE: u64 = 10;
const OTHER_COURSE: u64 = 20;

/// A store whose transitions always fail, for exercising auto-submit failure.
struct FailingTransitions(InMemoryStore);

impl TimesheetStore for FailingTransitions {
    fn insert(
        &self,
        new: NewTimesheet,
        pay: PayQuote,
        now: DateTime<Utc>,
    ) -> EngineResult<Timesheet> {
        self.0.insert(new, pay, now)
    }

    fn get(&self, id: u64) -> EngineResult<Option<Timesheet>> {
        self.0.get(id)
    }

    fn find_by_week(
        &self,
        tutor_id: u64,
        course_id: u64,
        week_start_date: NaiveDate,
    ) -> EngineResult<Option<Timesheet>> {
        self.0.find_by_week(tutor_id, course_id, week_start_date)
    }

    fn list(&self) -> EngineResult<Vec<Timesheet>> {
        self.0.list()
    }

    fn commit_transition(
        &self,
        _commit: TransitionCommit,
    ) -> EngineResult<(Timesheet, ApprovalRecord)> {
        Err(EngineError::StorageUnavailable {
            message: "approval records are read-only".to_string(),
        })
    }

    fn history(&self, timesheet_id: u64) -> EngineResult<Vec<ApprovalRecord>> {
        self.0.history(timesheet_id)
    }
}

fn router_with_store(store: Arc<dyn TimesheetStore>) -> Router {
    let config = ConfigLoader::load("./config/ea_schedule1").expect("Failed to load config");
    let directory = InMemoryCourseDirectory::new([
        CourseAssignment {
            lecturer_id: LECTURER.0,
            course_id: COURSE,
        },
        CourseAssignment {
            lecturer_id: OTHER_LECTURER.0,
            course_id: OTHER_COURSE,
        },
    ]);
    // Wednesday 2025-11-12, so the week of 2025-11-03 is in the past.
    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 11, 12).unwrap());

    let service = WorkflowService::new(
        Arc::new(config),
        store,
        Arc::new(directory),
        Arc::new(clock),
    );
    create_router(AppState::new(service))
}

fn create_router_for_test() -> Router {
    router_with_store(Arc::new(InMemoryStore::new()))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Reads a decimal field that may be serialized as a string or a number.
fn decimal_field(body: &Value, field: &str) -> Decimal {
    match &body[field] {
        Value::String(s) => decimal(s),
        Value::Number(n) => decimal(&n.to_string()),
        other => panic!("{} is not a decimal: {:?}", field, other),
    }
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    actor: Option<(u64, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((id, role)) = actor {
        builder = builder
            .header("X-Actor-Id", id.to_string())
            .header("X-Actor-Role", role);
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn post_quote(router: &Router, body: Value) -> (StatusCode, Value) {
    send(router, "POST", "/api/timesheets/quote", Some(TUTOR), Some(body)).await
}

async fn post_create(router: &Router, actor: (u64, &str), body: Value) -> (StatusCode, Value) {
    send(router, "POST", "/api/timesheets", Some(actor), Some(body)).await
}

async fn post_action(
    router: &Router,
    actor: (u64, &str),
    timesheet_id: u64,
    action: &str,
    comment: Option<&str>,
) -> (StatusCode, Value) {
    let mut body = json!({ "timesheetId": timesheet_id, "action": action });
    if let Some(comment) = comment {
        body["comment"] = json!(comment);
    }
    send(router, "POST", "/api/approvals", Some(actor), Some(body)).await
}

async fn get_timesheet(router: &Router, actor: (u64, &str), id: u64) -> (StatusCode, Value) {
    send(router, "GET", &format!("/api/timesheets/{}", id), Some(actor), None).await
}

async fn get_history(router: &Router, actor: (u64, &str), id: u64) -> (StatusCode, Value) {
    send(
        router,
        "GET",
        &format!("/api/approvals/history/{}", id),
        Some(actor),
        None,
    )
    .await
}

fn quote_request(task_type: &str, qualification: &str, hours: &str, repeat: bool) -> Value {
    json!({
        "taskType": task_type,
        "qualification": qualification,
        "deliveryHours": hours,
        "repeat": repeat,
        "sessionDate": "2025-11-04"
    })
}

fn create_request(tutor_id: u64, course_id: u64, week_start_date: &str) -> Value {
    json!({
        "tutorId": tutor_id,
        "courseId": course_id,
        "taskType": "TUTORIAL",
        "qualification": "STANDARD",
        "weekStartDate": week_start_date,
        "deliveryHours": "1.0",
        "repeat": false,
        "description": "Week 10 tutorial, COMP2017"
    })
}

/// Creates the standard tutorial timesheet and returns its id.
async fn create_tutorial(router: &Router) -> u64 {
    let (status, body) =
        post_create(router, LECTURER, create_request(TUTOR.0, COURSE, "2025-11-03")).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["id"].as_u64().unwrap()
}

/// Drives a fresh timesheet to `TUTOR_CONFIRMED`.
async fn tutor_confirmed(router: &Router) -> u64 {
    let id = create_tutorial(router).await;
    let (status, _) = post_action(router, TUTOR, id, "TUTOR_CONFIRM", None).await;
    assert_eq!(status, StatusCode::OK);
    id
}

/// Drives a fresh timesheet to `FINAL_CONFIRMED`.
async fn final_confirmed(router: &Router) -> u64 {
    let id = tutor_confirmed(router).await;
    let (status, _) = post_action(router, LECTURER, id, "LECTURER_CONFIRM", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post_action(router, ADMIN, id, "HR_CONFIRM", None).await;
    assert_eq!(status, StatusCode::OK);
    id
}

// =============================================================================
// Quote
// =============================================================================

#[tokio::test]
async fn test_quote_phd_tutorial_is_tu1() {
    let router = create_router_for_test();
    let (status, body) = post_quote(&router, quote_request("TUTORIAL", "PHD", "1.0", false)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rateCode"], "TU1");
    assert_eq!(decimal_field(&body, "associatedHours"), decimal("2.0"));
    assert_eq!(decimal_field(&body, "payableHours"), decimal("3.0"));
    assert_eq!(decimal_field(&body, "amount"), decimal("210.18"));
    assert_eq!(body["rateVersion"], "EA2023-S1-2024.07");
}

#[tokio::test]
async fn test_quote_standard_tutorial_is_tu2() {
    let router = create_router_for_test();
    let (status, body) =
        post_quote(&router, quote_request("TUTORIAL", "STANDARD", "1.0", false)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rateCode"], "TU2");
    assert_eq!(decimal_field(&body, "associatedHours"), decimal("2.0"));
    assert_eq!(decimal_field(&body, "payableHours"), decimal("3.0"));
    assert_eq!(decimal_field(&body, "hourlyRate"), decimal("58.65"));
    assert_eq!(decimal_field(&body, "amount"), decimal("175.95"));
    assert_eq!(body["clauseReference"], "Schedule 1 Clause 2.1");
}

#[tokio::test]
async fn test_quote_repeat_tutorial_is_tu4() {
    let router = create_router_for_test();
    let (status, body) =
        post_quote(&router, quote_request("TUTORIAL", "STANDARD", "1.0", true)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rateCode"], "TU4");
    assert_eq!(decimal_field(&body, "associatedHours"), decimal("1.0"));
    assert_eq!(decimal_field(&body, "payableHours"), decimal("2.0"));
    assert_eq!(decimal_field(&body, "amount"), decimal("117.30"));
}

#[tokio::test]
async fn test_quote_marking_is_m05_for_every_qualification() {
    let router = create_router_for_test();
    for qualification in ["STANDARD", "PHD", "COORDINATOR"] {
        let (status, body) =
            post_quote(&router, quote_request("MARKING", qualification, "5.5", false)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rateCode"], "M05", "qualification {}", qualification);
        assert_eq!(decimal_field(&body, "associatedHours"), Decimal::ZERO);
        assert_eq!(decimal_field(&body, "payableHours"), decimal("5.5"));
    }
}

#[tokio::test]
async fn test_quote_lecture_bands() {
    let router = create_router_for_test();

    let (status, body) =
        post_quote(&router, quote_request("LECTURE", "STANDARD", "2.0", false)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rateCode"], "P02");
    assert_eq!(decimal_field(&body, "associatedHours"), decimal("6.0"));

    let (_, body) = post_quote(&router, quote_request("LECTURE", "STANDARD", "1.0", false)).await;
    assert_eq!(body["rateCode"], "P03");
    assert_eq!(decimal_field(&body, "associatedHours"), decimal("2.0"));

    let (_, body) =
        post_quote(&router, quote_request("LECTURE", "COORDINATOR", "1.0", false)).await;
    assert_eq!(body["rateCode"], "P02");
}

#[tokio::test]
async fn test_quote_rejects_financial_fields() {
    let router = create_router_for_test();
    let mut request = quote_request("TUTORIAL", "STANDARD", "1.0", false);
    request["hourlyRate"] = json!("999.99");
    request["amount"] = json!("1.00");

    let (status, body) = post_quote(&router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("hourlyRate"), "{}", message);
    assert!(message.contains("amount"), "{}", message);
}

#[tokio::test]
async fn test_quote_rejects_unknown_fields() {
    let router = create_router_for_test();
    let mut request = quote_request("TUTORIAL", "STANDARD", "1.0", false);
    request["discount"] = json!(true);

    let (status, body) = post_quote(&router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_quote_hours_out_of_bounds() {
    let router = create_router_for_test();
    let (status, body) =
        post_quote(&router, quote_request("TUTORIAL", "STANDARD", "40.5", false)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Delivery hours must be between 0.1 and 40.0")
    );
}

#[tokio::test]
async fn test_quote_before_first_rate_table() {
    let router = create_router_for_test();
    let mut request = quote_request("TUTORIAL", "STANDARD", "1.0", false);
    request["sessionDate"] = json!("2023-01-09");

    let (status, body) = post_quote(&router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "RATE_NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_json() {
    let router = create_router_for_test();
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/timesheets/quote")
                .header("Content-Type", "application/json")
                .header("X-Actor-Id", "3")
                .header("X-Actor-Role", "TUTOR")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_identity_is_unauthenticated() {
    let router = create_router_for_test();
    let (status, body) = send(
        &router,
        "POST",
        "/api/timesheets/quote",
        None,
        Some(quote_request("TUTORIAL", "STANDARD", "1.0", false)),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTH_FAILED");
}

#[tokio::test]
async fn test_unknown_role_is_unauthenticated() {
    let router = create_router_for_test();
    let (status, _) = send(&router, "GET", "/api/approvals/pending", Some((9, "DEAN")), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_returns_draft_then_auto_submits() {
    let router = create_router_for_test();
    let (status, body) =
        post_create(&router, LECTURER, create_request(TUTOR.0, COURSE, "2025-11-03")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "DRAFT");
    assert_eq!(body["rateCode"], "TU2");
    assert_eq!(decimal_field(&body, "amount"), decimal("175.95"));
    assert_eq!(body["createdBy"], LECTURER.0);

    let id = body["id"].as_u64().unwrap();
    let (status, body) = get_timesheet(&router, TUTOR, id).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING_TUTOR_CONFIRMATION");
    let actions: Vec<&str> = body["availableActions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a.as_str().unwrap())
        .collect();
    assert!(actions.contains(&"TUTOR_CONFIRM"));
}

#[tokio::test]
async fn test_create_on_wednesday_is_rejected() {
    let router = create_router_for_test();
    let (status, body) =
        post_create(&router, LECTURER, create_request(TUTOR.0, COURSE, "2025-11-05")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("WEDNESDAY"));
}

#[tokio::test]
async fn test_create_future_week_is_rejected() {
    let router = create_router_for_test();
    let (status, body) =
        post_create(&router, LECTURER, create_request(TUTOR.0, COURSE, "2025-11-17")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_create_duplicate_week_is_rejected() {
    let router = create_router_for_test();
    create_tutorial(&router).await;

    let (status, body) =
        post_create(&router, LECTURER, create_request(TUTOR.0, COURSE, "2025-11-03")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_create_rejects_financial_fields() {
    let router = create_router_for_test();
    let mut request = create_request(TUTOR.0, COURSE, "2025-11-03");
    request["payableHours"] = json!("10.0");

    let (status, _) = post_create(&router, LECTURER, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tutor_cannot_create() {
    let router = create_router_for_test();
    let (status, body) =
        post_create(&router, TUTOR, create_request(TUTOR.0, COURSE, "2025-11-03")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "ACCESS_DENIED");
}

#[tokio::test]
async fn test_lecturer_cannot_create_outside_course() {
    let router = create_router_for_test();
    let (status, _) =
        post_create(&router, LECTURER, create_request(TUTOR.0, OTHER_COURSE, "2025-11-03")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_auto_submit_failure_leaves_draft() {
    let router = router_with_store(Arc::new(FailingTransitions(InMemoryStore::new())));
    let (status, body) =
        post_create(&router, LECTURER, create_request(TUTOR.0, COURSE, "2025-11-03")).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_u64().unwrap();

    let (status, body) = get_timesheet(&router, ADMIN, id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "DRAFT");

    let (_, history) = get_history(&router, ADMIN, id).await;
    assert_eq!(history.as_array().unwrap().len(), 0);
}

// =============================================================================
// Approval workflow
// =============================================================================

#[tokio::test]
async fn test_full_lifecycle() {
    let router = create_router_for_test();
    let id = create_tutorial(&router).await;

    let (status, body) = post_action(&router, TUTOR, id, "TUTOR_CONFIRM", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["previousStatus"], "PENDING_TUTOR_CONFIRMATION");
    assert_eq!(body["newStatus"], "TUTOR_CONFIRMED");
    assert_eq!(body["approverId"], TUTOR.0);

    let (status, body) = post_action(&router, LECTURER, id, "LECTURER_CONFIRM", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newStatus"], "LECTURER_CONFIRMED");

    let (status, body) = post_action(&router, ADMIN, id, "HR_CONFIRM", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newStatus"], "FINAL_CONFIRMED");
    assert_eq!(body["approverRole"], "ADMIN");

    let (_, body) = get_timesheet(&router, ADMIN, id).await;
    assert_eq!(body["status"], "FINAL_CONFIRMED");
    assert_eq!(body["availableActions"], json!([]));
}

#[tokio::test]
async fn test_hr_confirm_before_lecturer_is_conflict() {
    let router = create_router_for_test();
    let id = tutor_confirmed(&router).await;

    let (status, body) = post_action(&router, ADMIN, id, "HR_CONFIRM", None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "RESOURCE_CONFLICT");
    assert!(body["message"].as_str().unwrap().contains("Lecturer approval"));
}

#[tokio::test]
async fn test_terminal_status_rejects_actions() {
    let router = create_router_for_test();
    let id = final_confirmed(&router).await;

    let (status, body) = post_action(&router, LECTURER, id, "LECTURER_CONFIRM", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Cannot perform LECTURER_CONFIRM on timesheet with status FINAL_CONFIRMED"
    );
}

#[tokio::test]
async fn test_owning_tutor_gets_bad_request_on_terminal_timesheet() {
    let router = create_router_for_test();
    let id = final_confirmed(&router).await;

    for (action, comment) in [
        ("REJECT", Some("Hours are wrong")),
        ("SUBMIT_FOR_APPROVAL", None),
        ("TUTOR_CONFIRM", None),
    ] {
        let (status, body) = post_action(&router, TUTOR, id, action, comment).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}: {}", action, body);
        assert_eq!(
            body["message"],
            format!(
                "Cannot perform {} on timesheet with status FINAL_CONFIRMED",
                action
            )
        );
    }

    let (status, _) = post_action(&router, OTHER_TUTOR, id, "REJECT", Some("Not mine")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reject_requires_comment() {
    let router = create_router_for_test();
    let id = tutor_confirmed(&router).await;

    let (status, body) = post_action(&router, LECTURER, id, "REJECT", Some("   ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("comment is required"));

    let (status, body) =
        post_action(&router, LECTURER, id, "REJECT", Some("Wrong week")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newStatus"], "REJECTED");
    assert_eq!(body["comment"], "Wrong week");
}

#[tokio::test]
async fn test_modification_request_and_resubmit() {
    let router = create_router_for_test();
    let id = tutor_confirmed(&router).await;

    let (status, body) = post_action(
        &router,
        LECTURER,
        id,
        "REQUEST_MODIFICATION",
        Some("Please split the two sessions"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newStatus"], "MODIFICATION_REQUESTED");

    let (status, body) = post_action(&router, TUTOR, id, "SUBMIT_FOR_APPROVAL", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newStatus"], "PENDING_TUTOR_CONFIRMATION");
}

#[tokio::test]
async fn test_unknown_timesheet_is_not_found() {
    let router = create_router_for_test();
    let (status, body) = post_action(&router, ADMIN, 999, "HR_CONFIRM", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");

    let (status, _) = get_timesheet(&router, ADMIN, 999).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_tutor_is_forbidden() {
    let router = create_router_for_test();
    let id = create_tutorial(&router).await;

    let (status, _) = post_action(&router, OTHER_TUTOR, id, "TUTOR_CONFIRM", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get_timesheet(&router, OTHER_TUTOR, id).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unassigned_lecturer_is_forbidden() {
    let router = create_router_for_test();
    let id = tutor_confirmed(&router).await;

    let (status, body) =
        post_action(&router, OTHER_LECTURER, id, "LECTURER_CONFIRM", None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].as_str().unwrap().contains("not assigned"));
}

#[tokio::test]
async fn test_tutor_cannot_lecturer_confirm() {
    let router = create_router_for_test();
    let id = tutor_confirmed(&router).await;

    let (status, _) = post_action(&router, TUTOR, id, "LECTURER_CONFIRM", None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_action_is_bad_request() {
    let router = create_router_for_test();
    let id = create_tutorial(&router).await;

    let (status, _) = post_action(&router, ADMIN, id, "APPROVE_EVERYTHING", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// History, pending and config
// =============================================================================

#[tokio::test]
async fn test_history_is_chronological() {
    let router = create_router_for_test();
    let id = final_confirmed(&router).await;

    let (status, body) = get_history(&router, TUTOR, id).await;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().unwrap();
    let actions: Vec<&str> = records
        .iter()
        .map(|r| r["action"].as_str().unwrap())
        .collect();
    assert_eq!(
        actions,
        vec![
            "SUBMIT_FOR_APPROVAL",
            "TUTOR_CONFIRM",
            "LECTURER_CONFIRM",
            "HR_CONFIRM"
        ]
    );
    assert_eq!(records[0]["actorId"], LECTURER.0);
    assert_eq!(records[0]["previousStatus"], "DRAFT");
    assert_eq!(records[3]["newStatus"], "FINAL_CONFIRMED");

    for pair in records.windows(2) {
        assert_eq!(pair[0]["newStatus"], pair[1]["previousStatus"]);
        assert!(pair[0]["id"].as_u64().unwrap() < pair[1]["id"].as_u64().unwrap());
    }
}

#[tokio::test]
async fn test_history_is_scoped() {
    let router = create_router_for_test();
    let id = create_tutorial(&router).await;

    let (status, _) = get_history(&router, OTHER_TUTOR, id).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get_history(&router, OTHER_LECTURER, id).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get_history(&router, ADMIN, 999).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pending_lists_actionable_timesheets() {
    let router = create_router_for_test();
    let id = create_tutorial(&router).await;

    let (status, body) = send(&router, "GET", "/api/approvals/pending", Some(TUTOR), None).await;
    assert_eq!(status, StatusCode::OK);
    let pending = body.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], id);

    let (_, body) = send(&router, "GET", "/api/approvals/pending", Some(OTHER_TUTOR), None).await;
    assert_eq!(body, json!([]));

    let (_, body) =
        send(&router, "GET", "/api/approvals/pending", Some(OTHER_LECTURER), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_config_endpoint() {
    let router = create_router_for_test();
    let (status, body) = send(&router, "GET", "/api/timesheets/config", Some(TUTOR), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agreementCode"], "USYD-EA-2023");
    assert_eq!(decimal_field(&body["deliveryHours"], "min"), decimal("0.1"));
    assert_eq!(decimal_field(&body["deliveryHours"], "max"), decimal("40.0"));
    assert_eq!(body["descriptionMaxLength"], 1000);
    assert_eq!(body["rateVersions"], json!(["EA2023-S1-2024.07"]));
    assert_eq!(body["taskTypes"].as_array().unwrap().len(), 6);
}
