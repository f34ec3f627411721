//! Persistence seams for timesheets, their audit trail and the
//! lecturer-course directory.
//!
//! [`TimesheetStore::commit_transition`] is the only way a timesheet's
//! status changes. It checks the version read by the caller, applies the new
//! status and appends the audit record as one unit.

mod directory;
mod memory;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::EngineResult;
use crate::models::{
    ApprovalAction, ApprovalRecord, ApprovalStatus, NewTimesheet, PayQuote, Principal, Timesheet,
};

pub use directory::{CourseDirectory, InMemoryCourseDirectory};
pub use memory::InMemoryStore;

/// A transition the state machine has approved, ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionCommit {
    /// The timesheet being moved.
    pub timesheet_id: u64,
    /// Version observed when the transition was evaluated.
    pub expected_version: u64,
    /// Status observed when the transition was evaluated.
    pub previous_status: ApprovalStatus,
    /// Status to move to.
    pub new_status: ApprovalStatus,
    /// Who is acting.
    pub actor: Principal,
    /// The action applied.
    pub action: ApprovalAction,
    /// Reviewer comment, if any.
    pub comment: Option<String>,
    /// Commit timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Storage for timesheets and their approval records.
pub trait TimesheetStore: Send + Sync {
    /// Persists a new draft, assigning its id.
    ///
    /// Fails with `ValidationFailed` if a timesheet already exists for the
    /// same tutor, course and week; the check and the insert are atomic.
    fn insert(
        &self,
        new: NewTimesheet,
        pay: PayQuote,
        now: DateTime<Utc>,
    ) -> EngineResult<Timesheet>;

    /// Loads a timesheet by id.
    fn get(&self, id: u64) -> EngineResult<Option<Timesheet>>;

    /// Finds the timesheet for a tutor, course and week, if one exists.
    fn find_by_week(
        &self,
        tutor_id: u64,
        course_id: u64,
        week_start_date: NaiveDate,
    ) -> EngineResult<Option<Timesheet>>;

    /// Every timesheet, ordered by id.
    fn list(&self) -> EngineResult<Vec<Timesheet>>;

    /// Applies a transition and appends its audit record atomically.
    ///
    /// Fails with `ConcurrentModification` if the timesheet's version or
    /// status no longer matches what the caller observed.
    fn commit_transition(
        &self,
        commit: TransitionCommit,
    ) -> EngineResult<(Timesheet, ApprovalRecord)>;

    /// Approval records for a timesheet, in commit order.
    fn history(&self, timesheet_id: u64) -> EngineResult<Vec<ApprovalRecord>>;
}
