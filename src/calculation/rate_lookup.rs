//! Rate rule lookup.
//!
//! Selects the rate table in force on the session date and the single rule
//! within it that covers the task type, qualification, repeat flag and
//! normalised delivery hours.

use super::associated_hours::normalise_delivery_hours;
use crate::config::{EngineConfig, RateRule};
use crate::error::{EngineError, EngineResult};
use crate::models::QuoteInput;

/// The rule chosen for a quote, together with the version of its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLookupResult {
    /// Version of the rate table the rule came from.
    pub rate_version: String,
    /// The matching rule.
    pub rule: RateRule,
}

/// Finds the EA rate rule for a quote input.
///
/// The table used is the most recent one whose effective date is on or
/// before `input.session_date`, so a timesheet for an earlier week keeps
/// the rates that applied at the time.
///
/// # Errors
///
/// Returns `RateNotFound` when no table is in force on the date or the table
/// has no rule for the combination.
pub fn lookup_rate(config: &EngineConfig, input: &QuoteInput) -> EngineResult<RateLookupResult> {
    let not_found = || EngineError::RateNotFound {
        task_type: input.task_type,
        qualification: input.qualification,
        repeat: input.repeat,
        date: input.session_date,
    };

    let table = config
        .rate_table_for(input.session_date)
        .ok_or_else(not_found)?;

    let rule = table
        .rule_for(
            input.task_type,
            input.qualification,
            input.repeat,
            normalise_delivery_hours(input.delivery_hours),
        )
        .ok_or_else(not_found)?;

    Ok(RateLookupResult {
        rate_version: table.version.clone(),
        rule: rule.clone(),
    })
}
