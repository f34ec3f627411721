//! Business-rule validation applied before a timesheet is created or quoted.
//!
//! Every check returns `ValidationFailed` with a message naming the rule and
//! the offending value. Uniqueness needs the store and is checked by the
//! workflow service; everything else here is pure.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::config::ValidationConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{NewTimesheet, QuoteInput};

/// Upper-case English day name, as used in validation messages.
pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

/// Validates instructional inputs against the configured bounds.
#[derive(Debug, Clone)]
pub struct TimesheetValidator {
    config: ValidationConfig,
}

impl TimesheetValidator {
    /// Creates a validator using the given bounds.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Checks that the week starts on a Monday.
    ///
    /// # Example
    ///
    /// ```
    /// use timesheet_engine::config::ValidationConfig;
    /// use timesheet_engine::workflow::TimesheetValidator;
    /// use chrono::NaiveDate;
    ///
    /// let validator = TimesheetValidator::new(ValidationConfig::default());
    /// let wednesday = NaiveDate::from_ymd_opt(2025, 11, 5).unwrap();
    /// let err = validator.validate_week_start(wednesday).unwrap_err();
    /// assert!(err.to_string().contains("(WEDNESDAY)"));
    /// ```
    pub fn validate_week_start(&self, week_start_date: NaiveDate) -> EngineResult<()> {
        let weekday = week_start_date.weekday();
        if weekday == Weekday::Mon {
            return Ok(());
        }
        Err(EngineError::validation(format!(
            "Week start date must be a Monday. Provided date: {} ({})",
            week_start_date,
            day_name(weekday)
        )))
    }

    /// Checks that the week has started.
    pub fn validate_not_future(
        &self,
        week_start_date: NaiveDate,
        today: NaiveDate,
    ) -> EngineResult<()> {
        if week_start_date > today {
            return Err(EngineError::validation(format!(
                "Week start date cannot be in the future. Provided date: {}, today: {}",
                week_start_date, today
            )));
        }
        Ok(())
    }

    /// Checks delivery hours against the configured bounds.
    pub fn validate_delivery_hours(&self, delivery_hours: Decimal) -> EngineResult<()> {
        let bounds = self.config.delivery_hours;
        if delivery_hours < bounds.min || delivery_hours > bounds.max {
            return Err(EngineError::validation(format!(
                "Delivery hours must be between {} and {}. Provided: {}",
                bounds.min, bounds.max, delivery_hours
            )));
        }
        Ok(())
    }

    /// Checks that the session falls within the week.
    pub fn validate_session_date(
        &self,
        week_start_date: NaiveDate,
        session_date: NaiveDate,
    ) -> EngineResult<()> {
        let week_end = week_start_date + Duration::days(6);
        if session_date < week_start_date || session_date > week_end {
            return Err(EngineError::validation(format!(
                "Session date must fall within the week starting {}. Provided date: {}",
                week_start_date, session_date
            )));
        }
        Ok(())
    }

    /// Checks the description is present and not too long.
    pub fn validate_description(&self, description: &str) -> EngineResult<()> {
        if description.trim().is_empty() {
            return Err(EngineError::validation("Description must not be empty"));
        }
        let length = description.chars().count();
        let max = self.config.description_max_length;
        if length > max {
            return Err(EngineError::validation(format!(
                "Description must be at most {} characters. Provided length: {}",
                max, length
            )));
        }
        Ok(())
    }

    /// Runs every create-time check that does not need the store.
    pub fn validate_new(&self, new: &NewTimesheet, today: NaiveDate) -> EngineResult<()> {
        self.validate_week_start(new.week_start_date)?;
        self.validate_not_future(new.week_start_date, today)?;
        self.validate_delivery_hours(new.delivery_hours)?;
        self.validate_session_date(new.week_start_date, new.session_date)?;
        self.validate_description(&new.description)
    }

    /// Checks a quote preview.
    pub fn validate_quote(&self, input: &QuoteInput) -> EngineResult<()> {
        self.validate_delivery_hours(input.delivery_hours)
    }
}
