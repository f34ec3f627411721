//! Approval audit log.
//!
//! Records are appended only through [`AuditLog::append`], which the workflow
//! service calls once per approved transition; the store writes the status
//! change and the record together. Reads are gated to the timesheet's tutor,
//! its course lecturers and admins.

use std::sync::Arc;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalRecord, Principal, Timesheet};
use crate::store::{TimesheetStore, TransitionCommit};

use super::authorization::AuthorizationGate;

/// The audit trail of approval transitions.
#[derive(Clone)]
pub struct AuditLog {
    store: Arc<dyn TimesheetStore>,
    gate: AuthorizationGate,
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog").finish_non_exhaustive()
    }
}

impl AuditLog {
    /// Creates an audit log over `store`.
    pub fn new(store: Arc<dyn TimesheetStore>, gate: AuthorizationGate) -> Self {
        Self { store, gate }
    }

    /// Commits a transition together with its record.
    pub(crate) fn append(&self, commit: TransitionCommit) -> EngineResult<(Timesheet, ApprovalRecord)> {
        let (timesheet, record) = self.store.commit_transition(commit)?;

        info!(
            record_id = record.id,
            timesheet_id = record.timesheet_id,
            actor_id = record.actor_id,
            actor_role = %record.actor_role,
            action = %record.action,
            previous_status = %record.previous_status,
            new_status = %record.new_status,
            "Approval transition recorded"
        );

        Ok((timesheet, record))
    }

    /// Returns the history of a timesheet in commit order.
    ///
    /// Record ids are assigned at commit, so they order the history even
    /// when the wall clock steps backwards between transitions.
    ///
    /// # Errors
    ///
    /// - `TimesheetNotFound` if the id is unknown
    /// - `AccessDenied` if `requester` has no relation to the timesheet
    pub fn history(
        &self,
        timesheet_id: u64,
        requester: &Principal,
    ) -> EngineResult<Vec<ApprovalRecord>> {
        let timesheet = self
            .store
            .get(timesheet_id)?
            .ok_or(EngineError::TimesheetNotFound { id: timesheet_id })?;

        self.gate.authorize_view(requester, &timesheet).into_result()?;

        let mut records = self.store.history(timesheet_id)?;
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}
