//! Approval state machine.
//!
//! Transitions are data: each action has a fixed set of source statuses and a
//! single target. The guard is two-tiered:
//!
//! - From a terminal status nothing is accepted (`InvalidTransition`, 400).
//! - From a live status that is not a source, the action is an ordering
//!   violation if a source is still reachable (`WorkflowConflict`, 409).

use std::collections::{HashSet, VecDeque};

use crate::error::{EngineError, EngineResult};
use crate::models::{ApprovalAction, ApprovalStatus};

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The action.
    pub action: ApprovalAction,
    /// Statuses the action may be applied from.
    pub from: &'static [ApprovalStatus],
    /// Status after the action.
    pub to: ApprovalStatus,
}

const LIVE_STATUSES: &[ApprovalStatus] = &[
    ApprovalStatus::Draft,
    ApprovalStatus::PendingTutorConfirmation,
    ApprovalStatus::TutorConfirmed,
    ApprovalStatus::LecturerConfirmed,
    ApprovalStatus::ModificationRequested,
];

/// The complete transition table.
pub const TRANSITIONS: [Transition; 6] = [
    Transition {
        action: ApprovalAction::SubmitForApproval,
        from: &[ApprovalStatus::Draft, ApprovalStatus::ModificationRequested],
        to: ApprovalStatus::PendingTutorConfirmation,
    },
    Transition {
        action: ApprovalAction::TutorConfirm,
        from: &[ApprovalStatus::PendingTutorConfirmation],
        to: ApprovalStatus::TutorConfirmed,
    },
    Transition {
        action: ApprovalAction::LecturerConfirm,
        from: &[ApprovalStatus::TutorConfirmed],
        to: ApprovalStatus::LecturerConfirmed,
    },
    Transition {
        action: ApprovalAction::HrConfirm,
        from: &[ApprovalStatus::LecturerConfirmed],
        to: ApprovalStatus::FinalConfirmed,
    },
    Transition {
        action: ApprovalAction::Reject,
        from: LIVE_STATUSES,
        to: ApprovalStatus::Rejected,
    },
    Transition {
        action: ApprovalAction::RequestModification,
        from: &[ApprovalStatus::TutorConfirmed, ApprovalStatus::LecturerConfirmed],
        to: ApprovalStatus::ModificationRequested,
    },
];

/// Returns the table row for `action`.
pub fn transition_for(action: ApprovalAction) -> &'static Transition {
    match action {
        ApprovalAction::SubmitForApproval => &TRANSITIONS[0],
        ApprovalAction::TutorConfirm => &TRANSITIONS[1],
        ApprovalAction::LecturerConfirm => &TRANSITIONS[2],
        ApprovalAction::HrConfirm => &TRANSITIONS[3],
        ApprovalAction::Reject => &TRANSITIONS[4],
        ApprovalAction::RequestModification => &TRANSITIONS[5],
    }
}

/// Returns true if `action` applies directly to `status`.
pub fn is_applicable(action: ApprovalAction, status: ApprovalStatus) -> bool {
    transition_for(action).from.contains(&status)
}

/// Actions that apply directly to `status`, ignoring who is asking.
pub fn applicable_actions(status: ApprovalStatus) -> Vec<ApprovalAction> {
    ApprovalAction::ALL
        .into_iter()
        .filter(|action| is_applicable(*action, status))
        .collect()
}

/// Evaluates the guard and returns the status `action` leads to.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::{ApprovalAction, ApprovalStatus};
/// use timesheet_engine::workflow::next_status;
///
/// let next = next_status(ApprovalAction::TutorConfirm, ApprovalStatus::PendingTutorConfirmation);
/// assert_eq!(next.unwrap(), ApprovalStatus::TutorConfirmed);
///
/// let err = next_status(ApprovalAction::HrConfirm, ApprovalStatus::TutorConfirmed).unwrap_err();
/// assert_eq!(err.http_status(), 409);
/// ```
pub fn next_status(
    action: ApprovalAction,
    current: ApprovalStatus,
) -> EngineResult<ApprovalStatus> {
    let transition = transition_for(action);

    if transition.from.contains(&current) {
        return Ok(transition.to);
    }

    if !current.is_terminal() && can_reach_any(current, transition.from) {
        return Err(EngineError::WorkflowConflict {
            message: prerequisite_message(action, current),
        });
    }

    Err(EngineError::InvalidTransition {
        action,
        status: current,
    })
}

/// Breadth-first search over the table from `start`.
fn can_reach_any(start: ApprovalStatus, targets: &[ApprovalStatus]) -> bool {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(status) = queue.pop_front() {
        if targets.contains(&status) {
            return true;
        }
        for transition in TRANSITIONS.iter().filter(|t| t.from.contains(&status)) {
            if seen.insert(transition.to) {
                queue.push_back(transition.to);
            }
        }
    }

    false
}

fn prerequisite_message(action: ApprovalAction, current: ApprovalStatus) -> String {
    let requirement = match action {
        ApprovalAction::SubmitForApproval => {
            "Submission requires a draft or a timesheet returned for modification"
        }
        ApprovalAction::TutorConfirm => {
            "Tutor confirmation requires the timesheet to be submitted for approval"
        }
        ApprovalAction::LecturerConfirm => "Lecturer approval requires prior Tutor confirmation",
        ApprovalAction::HrConfirm => "Admin approval requires prior Lecturer approval",
        ApprovalAction::Reject => "Rejection requires a timesheet that is still in review",
        ApprovalAction::RequestModification => {
            "Requesting modification requires prior Tutor confirmation"
        }
    };
    format!("{} (current status: {})", requirement, current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut status = ApprovalStatus::Draft;
        for action in [
            ApprovalAction::SubmitForApproval,
            ApprovalAction::TutorConfirm,
            ApprovalAction::LecturerConfirm,
            ApprovalAction::HrConfirm,
        ] {
            status = next_status(action, status).unwrap();
        }
        assert_eq!(status, ApprovalStatus::FinalConfirmed);
    }

    #[test]
    fn test_hr_confirm_before_lecturer_is_conflict() {
        let err = next_status(ApprovalAction::HrConfirm, ApprovalStatus::TutorConfirmed)
            .unwrap_err();

        assert_eq!(err.http_status(), 409);
        assert_eq!(
            err.to_string(),
            "Admin approval requires prior Lecturer approval (current status: TUTOR_CONFIRMED)"
        );
    }

    #[test]
    fn test_lecturer_confirm_on_final_is_invalid() {
        let err = next_status(ApprovalAction::LecturerConfirm, ApprovalStatus::FinalConfirmed)
            .unwrap_err();

        assert_eq!(err.http_status(), 400);
        assert_eq!(
            err.to_string(),
            "Cannot perform LECTURER_CONFIRM on timesheet with status FINAL_CONFIRMED"
        );
    }

    #[test]
    fn test_terminal_statuses_accept_nothing() {
        for status in [ApprovalStatus::FinalConfirmed, ApprovalStatus::Rejected] {
            for action in ApprovalAction::ALL {
                let err = next_status(action, status).unwrap_err();
                assert!(
                    matches!(err, EngineError::InvalidTransition { .. }),
                    "{} from {} gave {:?}",
                    action,
                    status,
                    err
                );
            }
            assert!(applicable_actions(status).is_empty());
        }
    }

    #[test]
    fn test_live_mismatches_are_conflicts() {
        for status in LIVE_STATUSES {
            for action in ApprovalAction::ALL {
                if let Err(err) = next_status(action, *status) {
                    assert_eq!(err.http_status(), 409, "{} from {}", action, status);
                }
            }
        }
    }

    #[test]
    fn test_reject_from_every_live_status() {
        for status in LIVE_STATUSES {
            assert_eq!(
                next_status(ApprovalAction::Reject, *status).unwrap(),
                ApprovalStatus::Rejected
            );
        }
    }

    #[test]
    fn test_modification_loop() {
        let status = next_status(
            ApprovalAction::RequestModification,
            ApprovalStatus::LecturerConfirmed,
        )
        .unwrap();
        assert_eq!(status, ApprovalStatus::ModificationRequested);

        let status = next_status(ApprovalAction::SubmitForApproval, status).unwrap();
        assert_eq!(status, ApprovalStatus::PendingTutorConfirmation);
    }

    #[test]
    fn test_request_modification_not_from_pending() {
        let err = next_status(
            ApprovalAction::RequestModification,
            ApprovalStatus::PendingTutorConfirmation,
        )
        .unwrap_err();
        assert!(err.to_string().contains("requires prior Tutor confirmation"));
    }

    #[test]
    fn test_table_rows_match_lookup() {
        for action in ApprovalAction::ALL {
            assert_eq!(transition_for(action).action, action);
        }
    }

    #[test]
    fn test_applicable_actions_for_draft() {
        assert_eq!(
            applicable_actions(ApprovalStatus::Draft),
            vec![ApprovalAction::SubmitForApproval, ApprovalAction::Reject]
        );
    }
}
