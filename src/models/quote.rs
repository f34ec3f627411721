//! Rate engine input and output models.
//!
//! [`QuoteInput`] carries instructional fields only. [`PayQuote`] carries every
//! financial field a timesheet stores; it is produced exclusively by
//! [`crate::calculation::RateEngine::quote`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Qualification, TaskType};

/// Instructional inputs to a rate calculation.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::{QuoteInput, Qualification, TaskType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let input = QuoteInput {
///     task_type: TaskType::Tutorial,
///     qualification: Qualification::Phd,
///     delivery_hours: Decimal::new(10, 1),
///     repeat: false,
///     session_date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
/// };
/// assert_eq!(input.delivery_hours.to_string(), "1.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    /// The kind of work delivered.
    pub task_type: TaskType,
    /// The tutor's qualification band.
    pub qualification: Qualification,
    /// Contact hours delivered.
    pub delivery_hours: Decimal,
    /// Whether this is a repeat delivery.
    pub repeat: bool,
    /// Session date; selects the rate table in force.
    pub session_date: NaiveDate,
}

/// Every server-derived financial field of a timesheet.
///
/// Invariants: `payable_hours == delivery_hours + associated_hours` and
/// `amount == round(hourly_rate * payable_hours, 2, HALF_UP)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayQuote {
    /// EA rate code, e.g. `TU2`.
    pub rate_code: String,
    /// Version of the rate table that produced this quote.
    pub rate_version: String,
    /// Hourly rate in AUD.
    pub hourly_rate: Decimal,
    /// Delivery hours after normalisation to one decimal place.
    pub delivery_hours: Decimal,
    /// Preparation/marking hours bundled with the delivery.
    pub associated_hours: Decimal,
    /// Delivery plus associated hours.
    pub payable_hours: Decimal,
    /// Amount payable in AUD.
    pub amount: Decimal,
    /// Human-readable derivation.
    pub formula: String,
    /// EA clause the rate comes from.
    pub clause_reference: String,
}
