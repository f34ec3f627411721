//! Casual academic timesheet engine.
//!
//! This crate prices casual academic work against the Enterprise Agreement
//! Schedule 1 rate tables and runs the timesheet approval workflow: tutor
//! confirmation, lecturer confirmation and final HR confirmation, with every
//! transition recorded in an audit trail.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod workflow;
