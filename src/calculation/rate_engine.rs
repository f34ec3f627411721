//! The EA rate engine.
//!
//! [`RateEngine::quote`] is the only producer of [`PayQuote`] values. It is a
//! pure function of its input and the loaded configuration, so it is safe to
//! call for a preview and again at creation time.

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayQuote, QuoteInput};

use super::associated_hours::{calculate_associated_hours, normalise_delivery_hours};
use super::rate_lookup::lookup_rate;

/// Rounds a money amount to cents, half away from zero.
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(175950, 4)).to_string(), "17.60");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Derives every financial field of a timesheet from instructional inputs.
#[derive(Debug, Clone)]
pub struct RateEngine {
    config: Arc<ConfigLoader>,
}

impl RateEngine {
    /// Creates an engine over the loaded configuration.
    pub fn new(config: Arc<ConfigLoader>) -> Self {
        Self { config }
    }

    /// The configuration this engine quotes against.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Quotes a delivery.
    ///
    /// Delivery hours are normalised to one decimal place before derivation.
    /// The result always satisfies `payable_hours == delivery_hours +
    /// associated_hours` and `amount == round(hourly_rate × payable_hours, 2)`.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the normalised delivery hours are not positive
    /// - `RateNotFound` if no rate table or rule covers the input
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use timesheet_engine::calculation::RateEngine;
    /// use timesheet_engine::config::ConfigLoader;
    /// use timesheet_engine::models::{QuoteInput, Qualification, TaskType};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let config = Arc::new(ConfigLoader::load("./config/ea_schedule1").unwrap());
    /// let engine = RateEngine::new(config);
    /// let quote = engine.quote(&QuoteInput {
    ///     task_type: TaskType::Tutorial,
    ///     qualification: Qualification::Standard,
    ///     delivery_hours: Decimal::new(10, 1),
    ///     repeat: false,
    ///     session_date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
    /// }).unwrap();
    /// assert_eq!(quote.rate_code, "TU2");
    /// ```
    pub fn quote(&self, input: &QuoteInput) -> EngineResult<PayQuote> {
        let delivery_hours = normalise_delivery_hours(input.delivery_hours);
        if delivery_hours <= Decimal::ZERO {
            return Err(EngineError::validation(format!(
                "Delivery hours must be greater than zero. Provided: {}",
                input.delivery_hours
            )));
        }

        let lookup = lookup_rate(self.config.config(), input)?;
        let rule = lookup.rule;

        let associated = calculate_associated_hours(&rule, delivery_hours);
        let payable_hours = delivery_hours + associated.hours;
        let amount = round_money(rule.hourly_rate * payable_hours);

        let formula = format!(
            "{}h delivery + {}h associated = {}h payable at ${}/h (EA {})",
            delivery_hours, associated.hours, payable_hours, rule.hourly_rate, rule.rate_code
        );

        debug!(
            rate_code = %rule.rate_code,
            rate_version = %lookup.rate_version,
            task_type = %input.task_type,
            qualification = %input.qualification,
            repeat = input.repeat,
            payable_hours = %payable_hours,
            amount = %amount,
            associated_capped = associated.capped,
            "Quoted delivery"
        );

        Ok(PayQuote {
            rate_code: rule.rate_code,
            rate_version: lookup.rate_version,
            hourly_rate: rule.hourly_rate,
            delivery_hours,
            associated_hours: associated.hours,
            payable_hours,
            amount,
            formula,
            clause_reference: rule.clause,
        })
    }
}
