//! Core data models for the timesheet engine.
//!
//! This module contains the domain models shared by the rate engine, the
//! approval workflow, the store and the HTTP API.

mod actor;
mod approval;
mod quote;
mod timesheet;

pub use actor::{CourseAssignment, Principal, Role};
pub use approval::{ApprovalAction, ApprovalRecord, ApprovalStatus};
pub use quote::{PayQuote, QuoteInput};
pub use timesheet::{NewTimesheet, Qualification, TaskType, Timesheet};
