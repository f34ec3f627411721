//! Timesheet aggregate and its instructional enums.
//!
//! A [`Timesheet`] is created in [`ApprovalStatus::Draft`] from a validated
//! [`NewTimesheet`] and a server-computed [`PayQuote`]. Its status and version
//! are private: they only move when the store commits a transition produced
//! by the approval state machine.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ApprovalStatus, PayQuote, QuoteInput};

/// EA Schedule 1 task families a casual academic can be paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    /// Lecture delivery.
    Lecture,
    /// Tutorial delivery.
    Tutorial,
    /// Other required academic activity.
    Oraa,
    /// Practical demonstration.
    Demo,
    /// Marking.
    Marking,
    /// Miscellaneous academic work, paid at the ORAA rate.
    Other,
}

impl TaskType {
    /// Every task type, in declaration order.
    pub const ALL: [TaskType; 6] = [
        TaskType::Lecture,
        TaskType::Tutorial,
        TaskType::Oraa,
        TaskType::Demo,
        TaskType::Marking,
        TaskType::Other,
    ];
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskType::Lecture => "LECTURE",
            TaskType::Tutorial => "TUTORIAL",
            TaskType::Oraa => "ORAA",
            TaskType::Demo => "DEMO",
            TaskType::Marking => "MARKING",
            TaskType::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// Tutor qualification band used for rate selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Qualification {
    /// No doctorate and no coordination duties.
    #[default]
    Standard,
    /// Holds a doctorate.
    Phd,
    /// Unit of study coordinator.
    Coordinator,
}

impl Qualification {
    /// Every qualification, in declaration order.
    pub const ALL: [Qualification; 3] = [
        Qualification::Standard,
        Qualification::Phd,
        Qualification::Coordinator,
    ];
}

impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Qualification::Standard => "STANDARD",
            Qualification::Phd => "PHD",
            Qualification::Coordinator => "COORDINATOR",
        };
        f.write_str(name)
    }
}

/// A validated request to create a timesheet.
///
/// Carries instructional fields only; every financial field is derived by the
/// rate engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimesheet {
    /// The tutor being paid.
    pub tutor_id: u64,
    /// The course the work was done for.
    pub course_id: u64,
    /// The lecturer or admin creating the timesheet.
    pub created_by: u64,
    /// The kind of work delivered.
    pub task_type: TaskType,
    /// The tutor's qualification band.
    pub qualification: Qualification,
    /// Monday of the week the work was done in.
    pub week_start_date: NaiveDate,
    /// Date of the session, used to select the rate table.
    pub session_date: NaiveDate,
    /// Contact hours delivered.
    pub delivery_hours: Decimal,
    /// Whether this is a repeat delivery within the EA lookback window.
    pub repeat: bool,
    /// Free-text description of the work.
    pub description: String,
}

impl NewTimesheet {
    /// The rate engine input for this timesheet.
    pub fn quote_input(&self) -> QuoteInput {
        QuoteInput {
            task_type: self.task_type,
            qualification: self.qualification,
            delivery_hours: self.delivery_hours,
            repeat: self.repeat,
            session_date: self.session_date,
        }
    }
}

/// The persisted timesheet aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    id: u64,
    tutor_id: u64,
    course_id: u64,
    created_by: u64,
    task_type: TaskType,
    qualification: Qualification,
    week_start_date: NaiveDate,
    session_date: NaiveDate,
    repeat: bool,
    description: String,
    #[serde(flatten)]
    pay: PayQuote,
    status: ApprovalStatus,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Timesheet {
    /// Builds a new draft. Only the store assigns ids, so this stays crate-private.
    pub(crate) fn draft(id: u64, new: NewTimesheet, pay: PayQuote, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tutor_id: new.tutor_id,
            course_id: new.course_id,
            created_by: new.created_by,
            task_type: new.task_type,
            qualification: new.qualification,
            week_start_date: new.week_start_date,
            session_date: new.session_date,
            repeat: new.repeat,
            description: new.description,
            pay,
            status: ApprovalStatus::Draft,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the aggregate to `status` and bumps the optimistic version.
    pub(crate) fn apply_status(&mut self, status: ApprovalStatus, now: DateTime<Utc>) {
        self.status = status;
        self.version += 1;
        self.updated_at = now;
    }

    /// The timesheet id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The tutor being paid.
    pub fn tutor_id(&self) -> u64 {
        self.tutor_id
    }

    /// The course the work belongs to.
    pub fn course_id(&self) -> u64 {
        self.course_id
    }

    /// Who created the timesheet.
    pub fn created_by(&self) -> u64 {
        self.created_by
    }

    /// The task type.
    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// The qualification band quoted against.
    pub fn qualification(&self) -> Qualification {
        self.qualification
    }

    /// Monday of the work week.
    pub fn week_start_date(&self) -> NaiveDate {
        self.week_start_date
    }

    /// Date of the session.
    pub fn session_date(&self) -> NaiveDate {
        self.session_date
    }

    /// Whether the delivery was a repeat.
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// The description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Delivery hours after normalisation by the rate engine.
    pub fn delivery_hours(&self) -> Decimal {
        self.pay.delivery_hours
    }

    /// The server-derived financial fields.
    pub fn pay(&self) -> &PayQuote {
        &self.pay
    }

    /// The current workflow status.
    pub fn status(&self) -> ApprovalStatus {
        self.status
    }

    /// Optimistic concurrency version, incremented on every transition.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last transition.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
