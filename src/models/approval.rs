//! Approval workflow vocabulary and the audit record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// Lifecycle status of a timesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    /// Created, not yet submitted.
    Draft,
    /// Submitted, awaiting the tutor's confirmation.
    PendingTutorConfirmation,
    /// Tutor confirmed, awaiting the course lecturer.
    TutorConfirmed,
    /// Lecturer confirmed, awaiting HR (admin).
    LecturerConfirmed,
    /// HR confirmed; ready for payroll. Terminal.
    FinalConfirmed,
    /// Rejected. Terminal.
    Rejected,
    /// Returned for corrections; may be resubmitted.
    ModificationRequested,
}

impl ApprovalStatus {
    /// Every status, in declaration order.
    pub const ALL: [ApprovalStatus; 7] = [
        ApprovalStatus::Draft,
        ApprovalStatus::PendingTutorConfirmation,
        ApprovalStatus::TutorConfirmed,
        ApprovalStatus::LecturerConfirmed,
        ApprovalStatus::FinalConfirmed,
        ApprovalStatus::Rejected,
        ApprovalStatus::ModificationRequested,
    ];

    /// Returns true when no further transition is ever accepted.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ApprovalStatus::FinalConfirmed | ApprovalStatus::Rejected
        )
    }

    /// Workflow guidance shown to the actor after reaching this status.
    pub fn next_steps(self) -> Vec<&'static str> {
        match self {
            ApprovalStatus::Draft => vec![
                "Timesheet is in draft status",
                "Submit for approval when ready",
            ],
            ApprovalStatus::PendingTutorConfirmation => vec![
                "Timesheet is awaiting tutor confirmation",
                "Tutor can confirm or reject from their dashboard",
            ],
            ApprovalStatus::TutorConfirmed => vec![
                "Timesheet has been confirmed by the tutor",
                "Course lecturer should now review and confirm",
            ],
            ApprovalStatus::LecturerConfirmed => vec![
                "Timesheet has been confirmed by the lecturer",
                "HR will perform the final confirmation",
            ],
            ApprovalStatus::FinalConfirmed => vec![
                "Timesheet has been fully approved",
                "Ready for payroll processing",
                "No further approvals required",
            ],
            ApprovalStatus::Rejected => vec![
                "Timesheet has been rejected",
                "Review the rejection reason; no further actions are accepted",
            ],
            ApprovalStatus::ModificationRequested => vec![
                "Modifications have been requested",
                "Review the feedback and resubmit after making the changes",
            ],
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApprovalStatus::Draft => "DRAFT",
            ApprovalStatus::PendingTutorConfirmation => "PENDING_TUTOR_CONFIRMATION",
            ApprovalStatus::TutorConfirmed => "TUTOR_CONFIRMED",
            ApprovalStatus::LecturerConfirmed => "LECTURER_CONFIRMED",
            ApprovalStatus::FinalConfirmed => "FINAL_CONFIRMED",
            ApprovalStatus::Rejected => "REJECTED",
            ApprovalStatus::ModificationRequested => "MODIFICATION_REQUESTED",
        };
        f.write_str(name)
    }
}

/// An action an actor can request against a timesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalAction {
    /// Send a draft (or a returned timesheet) to the tutor.
    SubmitForApproval,
    /// Tutor confirms the hours are accurate.
    TutorConfirm,
    /// Course lecturer confirms.
    LecturerConfirm,
    /// HR final confirmation.
    HrConfirm,
    /// Reject outright.
    Reject,
    /// Return for corrections.
    RequestModification,
}

impl ApprovalAction {
    /// Every action, in declaration order.
    pub const ALL: [ApprovalAction; 6] = [
        ApprovalAction::SubmitForApproval,
        ApprovalAction::TutorConfirm,
        ApprovalAction::LecturerConfirm,
        ApprovalAction::HrConfirm,
        ApprovalAction::Reject,
        ApprovalAction::RequestModification,
    ];

    /// Returns true when the action must carry a non-blank comment.
    pub fn requires_comment(self) -> bool {
        matches!(
            self,
            ApprovalAction::Reject | ApprovalAction::RequestModification
        )
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApprovalAction::SubmitForApproval => "SUBMIT_FOR_APPROVAL",
            ApprovalAction::TutorConfirm => "TUTOR_CONFIRM",
            ApprovalAction::LecturerConfirm => "LECTURER_CONFIRM",
            ApprovalAction::HrConfirm => "HR_CONFIRM",
            ApprovalAction::Reject => "REJECT",
            ApprovalAction::RequestModification => "REQUEST_MODIFICATION",
        };
        f.write_str(name)
    }
}

impl FromStr for ApprovalAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApprovalAction::ALL
            .into_iter()
            .find(|action| action.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown approval action: {}", s))
    }
}

/// One row of the audit trail. Written once per committed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRecord {
    /// Ledger sequence number; strictly increasing in commit order.
    pub id: u64,
    /// The timesheet this record belongs to.
    pub timesheet_id: u64,
    /// Who performed the action.
    pub actor_id: u64,
    /// The role they acted in.
    pub actor_role: Role,
    /// The action applied.
    pub action: ApprovalAction,
    /// Status before the transition.
    pub previous_status: ApprovalStatus,
    /// Status after the transition.
    pub new_status: ApprovalStatus,
    /// Reviewer comment; always present for REJECT and REQUEST_MODIFICATION.
    pub comment: Option<String>,
    /// When the transition was committed.
    pub timestamp: DateTime<Utc>,
}
