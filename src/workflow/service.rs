//! The workflow service: quote, create, act, read.
//!
//! Every approval action runs as one short unit:
//! load, authorize, guard, check comment, commit. The commit re-checks the
//! version observed at load time, so two racing actions cannot both win.

use std::sync::Arc;

use tracing::{info, warn};

use crate::calculation::RateEngine;
use crate::clock::Clock;
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ApprovalAction, ApprovalRecord, NewTimesheet, PayQuote, Principal, QuoteInput, Timesheet,
};
use crate::store::{CourseDirectory, TimesheetStore, TransitionCommit};

use super::audit::AuditLog;
use super::authorization::AuthorizationGate;
use super::state_machine::{is_applicable, next_status};
use super::validation::TimesheetValidator;

/// The result of a committed approval action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// The timesheet after the transition.
    pub timesheet: Timesheet,
    /// The audit record written with it.
    pub record: ApprovalRecord,
}

/// A timesheet together with what the reader may do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimesheetView {
    /// The timesheet.
    pub timesheet: Timesheet,
    /// Actions the reader is permitted to apply right now.
    pub available_actions: Vec<ApprovalAction>,
}

/// Orchestrates validation, rating, authorization and the state machine.
#[derive(Clone)]
pub struct WorkflowService {
    engine: RateEngine,
    validator: TimesheetValidator,
    gate: AuthorizationGate,
    audit: AuditLog,
    store: Arc<dyn TimesheetStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for WorkflowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowService")
            .field("engine", &self.engine)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl WorkflowService {
    /// Wires the service from its collaborators.
    pub fn new(
        config: Arc<ConfigLoader>,
        store: Arc<dyn TimesheetStore>,
        directory: Arc<dyn CourseDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let validator = TimesheetValidator::new(config.validation().clone());
        let gate = AuthorizationGate::new(directory);
        let audit = AuditLog::new(Arc::clone(&store), gate.clone());
        Self {
            engine: RateEngine::new(config),
            validator,
            gate,
            audit,
            store,
            clock,
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigLoader {
        self.engine.config()
    }

    /// Previews the financial fields for a delivery. Nothing is stored.
    pub fn quote(&self, input: &QuoteInput) -> EngineResult<PayQuote> {
        self.validator.validate_quote(input)?;
        self.engine.quote(input)
    }

    /// Creates a timesheet in DRAFT, then tries to submit it.
    ///
    /// The returned timesheet is always the DRAFT as created. A failed
    /// auto-submit is logged and leaves the DRAFT in place for a later
    /// explicit submit.
    ///
    /// # Errors
    ///
    /// - `AccessDenied` for tutors, and lecturers outside the course
    /// - `ValidationFailed` for any violated business rule
    /// - `RateNotFound` if no rate covers the session
    pub fn create(&self, actor: &Principal, new: NewTimesheet) -> EngineResult<Timesheet> {
        self.gate
            .authorize_create(actor, new.course_id)
            .into_result()?;

        let new = NewTimesheet {
            created_by: actor.id,
            ..new
        };

        self.validator.validate_new(&new, self.clock.today())?;
        if self
            .store
            .find_by_week(new.tutor_id, new.course_id, new.week_start_date)?
            .is_some()
        {
            return Err(EngineError::duplicate_timesheet(
                new.tutor_id,
                new.course_id,
                new.week_start_date,
            ));
        }

        let pay = self.engine.quote(&new.quote_input())?;
        let draft = self.store.insert(new, pay, self.clock.now())?;

        info!(
            timesheet_id = draft.id(),
            actor_id = actor.id,
            tutor_id = draft.tutor_id(),
            course_id = draft.course_id(),
            rate_code = %draft.pay().rate_code,
            amount = %draft.pay().amount,
            "Timesheet created"
        );

        if let Err(err) = self.act(actor, draft.id(), ApprovalAction::SubmitForApproval, None) {
            warn!(
                timesheet_id = draft.id(),
                actor_id = actor.id,
                error = %err,
                "Auto-submit failed; timesheet left in DRAFT"
            );
        }

        Ok(draft)
    }

    /// Applies an approval action.
    ///
    /// Checks run in a fixed order: unknown id (404), permission (403),
    /// state guard (400 or 409), comment requirement (400), then the commit
    /// (409 if another writer got there first).
    pub fn act(
        &self,
        actor: &Principal,
        timesheet_id: u64,
        action: ApprovalAction,
        comment: Option<String>,
    ) -> EngineResult<ActionOutcome> {
        let timesheet = self.load(timesheet_id)?;

        self.gate
            .authorize(actor, action, &timesheet)
            .into_result()?;

        let new_status = next_status(action, timesheet.status())?;

        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if action.requires_comment() && comment.is_none() {
            return Err(EngineError::validation(format!(
                "A comment is required when performing {}",
                action
            )));
        }

        let (timesheet, record) = self.audit.append(TransitionCommit {
            timesheet_id,
            expected_version: timesheet.version(),
            previous_status: timesheet.status(),
            new_status,
            actor: *actor,
            action,
            comment,
            timestamp: self.clock.now(),
        })?;

        Ok(ActionOutcome { timesheet, record })
    }

    /// Approval history, in commit order.
    pub fn history(
        &self,
        actor: &Principal,
        timesheet_id: u64,
    ) -> EngineResult<Vec<ApprovalRecord>> {
        self.audit.history(timesheet_id, actor)
    }

    /// Reads a timesheet with the actions `actor` may apply to it.
    pub fn get(&self, actor: &Principal, timesheet_id: u64) -> EngineResult<TimesheetView> {
        let timesheet = self.load(timesheet_id)?;
        self.gate.authorize_view(actor, &timesheet).into_result()?;

        let available_actions = self.available_actions(actor, &timesheet);
        Ok(TimesheetView {
            timesheet,
            available_actions,
        })
    }

    /// Actions `actor` is both permitted and able to apply to `timesheet` now.
    pub fn available_actions(
        &self,
        actor: &Principal,
        timesheet: &Timesheet,
    ) -> Vec<ApprovalAction> {
        ApprovalAction::ALL
            .into_iter()
            .filter(|action| is_applicable(*action, timesheet.status()))
            .filter(|action| self.gate.authorize(actor, *action, timesheet).is_allowed())
            .collect()
    }

    /// Timesheets on which `actor` has at least one available action.
    pub fn pending(&self, actor: &Principal) -> EngineResult<Vec<TimesheetView>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .filter_map(|timesheet| {
                let available_actions = self.available_actions(actor, &timesheet);
                (!available_actions.is_empty()).then_some(TimesheetView {
                    timesheet,
                    available_actions,
                })
            })
            .collect())
    }

    fn load(&self, timesheet_id: u64) -> EngineResult<Timesheet> {
        self.store
            .get(timesheet_id)?
            .ok_or(EngineError::TimesheetNotFound { id: timesheet_id })
    }
}
