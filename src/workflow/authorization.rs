//! Authorization gate.
//!
//! Decides whether a principal may perform an action, create a timesheet or
//! read one. The gate runs before the state-machine guard, so a caller
//! without permission is denied before anything about the workflow state is
//! revealed. Every rule is a match over the closed [`Role`] and
//! [`ApprovalAction`] enums.
//!
//! Stage-dependent rules only apply to live statuses. A terminal timesheet
//! is left to the state machine, which refuses every action with 400.

use std::sync::Arc;

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalAction, ApprovalStatus, Principal, Role, Timesheet};
use crate::store::CourseDirectory;

/// The outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The principal may proceed.
    Allow,
    /// The principal may not proceed, with the reason.
    Deny(String),
}

impl Decision {
    /// Returns true for [`Decision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Converts a denial into `AccessDenied`.
    pub fn into_result(self) -> EngineResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(EngineError::access_denied(reason)),
        }
    }
}

/// Role and scope checks for every workflow operation.
#[derive(Clone)]
pub struct AuthorizationGate {
    directory: Arc<dyn CourseDirectory>,
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate").finish_non_exhaustive()
    }
}

impl AuthorizationGate {
    /// Creates a gate that resolves lecturer scope through `directory`.
    pub fn new(directory: Arc<dyn CourseDirectory>) -> Self {
        Self { directory }
    }

    /// Decides whether `actor` may apply `action` to `timesheet`.
    pub fn authorize(
        &self,
        actor: &Principal,
        action: ApprovalAction,
        timesheet: &Timesheet,
    ) -> Decision {
        match actor.role {
            Role::Admin => Decision::Allow,
            Role::Tutor => Self::authorize_tutor(actor, action, timesheet),
            Role::Lecturer => self.authorize_lecturer(actor, action, timesheet),
        }
    }

    fn authorize_tutor(
        actor: &Principal,
        action: ApprovalAction,
        timesheet: &Timesheet,
    ) -> Decision {
        if timesheet.tutor_id() != actor.id {
            return Decision::Deny(format!(
                "Tutor {} may only act on their own timesheets",
                actor.id
            ));
        }

        match action {
            ApprovalAction::TutorConfirm => Decision::Allow,
            ApprovalAction::SubmitForApproval => {
                let status = timesheet.status();
                if status.is_terminal() || status == ApprovalStatus::ModificationRequested {
                    Decision::Allow
                } else {
                    Decision::Deny(
                        "Tutors may only resubmit timesheets returned for modification"
                            .to_string(),
                    )
                }
            }
            ApprovalAction::Reject => {
                let status = timesheet.status();
                if status.is_terminal() || status == ApprovalStatus::PendingTutorConfirmation {
                    Decision::Allow
                } else {
                    Decision::Deny(
                        "Tutors may only reject timesheets awaiting their confirmation"
                            .to_string(),
                    )
                }
            }
            ApprovalAction::LecturerConfirm
            | ApprovalAction::HrConfirm
            | ApprovalAction::RequestModification => {
                Decision::Deny(format!("Role TUTOR cannot perform {}", action))
            }
        }
    }

    fn authorize_lecturer(
        &self,
        actor: &Principal,
        action: ApprovalAction,
        timesheet: &Timesheet,
    ) -> Decision {
        if !self.directory.is_assigned(actor.id, timesheet.course_id()) {
            return Decision::Deny(format!(
                "Lecturer {} is not assigned to course {}",
                actor.id,
                timesheet.course_id()
            ));
        }

        match action {
            ApprovalAction::SubmitForApproval
            | ApprovalAction::LecturerConfirm
            | ApprovalAction::RequestModification => Decision::Allow,
            ApprovalAction::Reject => {
                if timesheet.status() == ApprovalStatus::LecturerConfirmed {
                    Decision::Deny(
                        "Only HR may reject a timesheet after lecturer confirmation".to_string(),
                    )
                } else {
                    Decision::Allow
                }
            }
            ApprovalAction::TutorConfirm => {
                Decision::Deny("Only the assigned tutor may perform TUTOR_CONFIRM".to_string())
            }
            ApprovalAction::HrConfirm => {
                Decision::Deny("Only HR may perform HR_CONFIRM".to_string())
            }
        }
    }

    /// Decides whether `actor` may create a timesheet for `course_id`.
    pub fn authorize_create(&self, actor: &Principal, course_id: u64) -> Decision {
        match actor.role {
            Role::Admin => Decision::Allow,
            Role::Lecturer => {
                if self.directory.is_assigned(actor.id, course_id) {
                    Decision::Allow
                } else {
                    Decision::Deny(format!(
                        "Lecturer {} is not assigned to course {}",
                        actor.id, course_id
                    ))
                }
            }
            Role::Tutor => Decision::Deny("Tutors cannot create timesheets".to_string()),
        }
    }

    /// Decides whether `actor` may read `timesheet` and its history.
    pub fn authorize_view(&self, actor: &Principal, timesheet: &Timesheet) -> Decision {
        let related = match actor.role {
            Role::Admin => true,
            Role::Tutor => timesheet.tutor_id() == actor.id,
            Role::Lecturer => self.directory.is_assigned(actor.id, timesheet.course_id()),
        };

        if related {
            Decision::Allow
        } else {
            Decision::Deny(format!(
                "User {} has no relation to timesheet {}",
                actor.id,
                timesheet.id()
            ))
        }
    }
}
