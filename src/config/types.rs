//! Configuration types for the EA rate tables and workflow validation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Qualification, TaskType};

/// Metadata about the enterprise agreement the rates come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementMetadata {
    /// Short agreement code.
    pub code: String,
    /// The human-readable name of the agreement.
    pub name: String,
    /// The schedule the rate tables implement.
    pub schedule: String,
    /// URL to the official agreement text.
    pub source_url: String,
}

/// One row of a rate table: which inputs it covers and how it pays.
///
/// An empty `qualifications` list matches every qualification; a missing
/// `repeat` matches both first and repeat deliveries. The optional delivery
/// hour bounds are compared against normalised hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRule {
    /// EA rate code, e.g. `TU2`.
    pub rate_code: String,
    /// The task type this rule prices.
    pub task_type: TaskType,
    /// Qualifications covered; empty means all.
    #[serde(default)]
    pub qualifications: Vec<Qualification>,
    /// Repeat flag covered; `None` means either.
    #[serde(default)]
    pub repeat: Option<bool>,
    /// Matches only deliveries strictly longer than this many hours.
    #[serde(default)]
    pub delivery_hours_over: Option<Decimal>,
    /// Matches only deliveries of at most this many hours.
    #[serde(default)]
    pub delivery_hours_up_to: Option<Decimal>,
    /// Hourly rate in AUD.
    pub hourly_rate: Decimal,
    /// Associated hours granted per delivered hour.
    #[serde(default)]
    pub associated_hours_per_delivery_hour: Decimal,
    /// Upper bound on associated hours for a single timesheet, if any.
    #[serde(default)]
    pub associated_hours_cap: Option<Decimal>,
    /// EA clause citation.
    pub clause: String,
}

impl RateRule {
    /// Returns true if this rule prices the given combination.
    pub fn matches(
        &self,
        task_type: TaskType,
        qualification: Qualification,
        repeat: bool,
        delivery_hours: Decimal,
    ) -> bool {
        self.task_type == task_type
            && (self.qualifications.is_empty() || self.qualifications.contains(&qualification))
            && self.repeat.is_none_or(|r| r == repeat)
            && self.delivery_hours_over.is_none_or(|over| delivery_hours > over)
            && self.delivery_hours_up_to.is_none_or(|up_to| delivery_hours <= up_to)
    }

    fn hour_thresholds(&self) -> impl Iterator<Item = Decimal> {
        self.delivery_hours_over
            .into_iter()
            .chain(self.delivery_hours_up_to)
    }
}

/// A versioned rate table effective from a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Identifier recorded on every quote as `rateVersion`.
    pub version: String,
    /// The first session date this table applies to.
    pub effective_date: NaiveDate,
    /// Rate rules; each input combination must match exactly one.
    pub rules: Vec<RateRule>,
}

impl RateTable {
    /// Finds the single rule covering the combination.
    pub fn rule_for(
        &self,
        task_type: TaskType,
        qualification: Qualification,
        repeat: bool,
        delivery_hours: Decimal,
    ) -> Option<&RateRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(task_type, qualification, repeat, delivery_hours))
    }

    /// Delivery hours that between them hit every hour band the rules define.
    ///
    /// Hours are normalised to one decimal place, so each threshold and the
    /// next tenth above it cover both sides of every boundary.
    fn sample_delivery_hours(&self) -> Vec<Decimal> {
        let tenth = Decimal::new(1, 1);
        let mut samples = vec![tenth];
        for threshold in self.rules.iter().flat_map(RateRule::hour_thresholds) {
            samples.push(threshold);
            samples.push(threshold + tenth);
        }
        samples.retain(|hours| *hours > Decimal::ZERO);
        samples.sort();
        samples.dedup();
        samples
    }

    /// Checks that every task type, qualification, repeat and delivery hour
    /// combination resolves to exactly one rule, and that rates are sane.
    ///
    /// Returns a description of every problem found.
    pub fn coverage_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for rule in &self.rules {
            if rule.hourly_rate <= Decimal::ZERO {
                problems.push(format!(
                    "{}: rate {} has non-positive hourly rate {}",
                    self.version, rule.rate_code, rule.hourly_rate
                ));
            }
            if rule.associated_hours_per_delivery_hour < Decimal::ZERO {
                problems.push(format!(
                    "{}: rate {} has negative associated hours multiplier",
                    self.version, rule.rate_code
                ));
            }
            if let (Some(over), Some(up_to)) = (rule.delivery_hours_over, rule.delivery_hours_up_to) {
                if over >= up_to {
                    problems.push(format!(
                        "{}: rate {} has empty delivery hour band ({}, {}]",
                        self.version, rule.rate_code, over, up_to
                    ));
                }
            }
        }

        let samples = self.sample_delivery_hours();
        for task_type in TaskType::ALL {
            for qualification in Qualification::ALL {
                for repeat in [false, true] {
                    for &hours in &samples {
                        let matching: Vec<&str> = self
                            .rules
                            .iter()
                            .filter(|rule| rule.matches(task_type, qualification, repeat, hours))
                            .map(|rule| rule.rate_code.as_str())
                            .collect();
                        match matching.len() {
                            1 => {}
                            0 => problems.push(format!(
                                "{}: no rate for {} / {} / repeat={} at {}h",
                                self.version, task_type, qualification, repeat, hours
                            )),
                            _ => problems.push(format!(
                                "{}: ambiguous rates {:?} for {} / {} / repeat={} at {}h",
                                self.version, matching, task_type, qualification, repeat, hours
                            )),
                        }
                    }
                }
            }
        }

        problems
    }
}

/// Inclusive bounds on delivery hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBounds {
    /// Smallest accepted value.
    pub min: Decimal,
    /// Largest accepted value.
    pub max: Decimal,
}

/// Validation configuration from validation.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Accepted delivery hours per timesheet.
    pub delivery_hours: HoursBounds,
    /// Longest accepted description, in characters.
    pub description_max_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            delivery_hours: HoursBounds {
                min: Decimal::new(1, 1),
                max: Decimal::new(400, 1),
            },
            description_max_length: 1000,
        }
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Agreement metadata.
    metadata: AgreementMetadata,
    /// Rate tables by effective date (sorted oldest first).
    rate_tables: Vec<RateTable>,
    /// Validation bounds.
    validation: ValidationConfig,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        metadata: AgreementMetadata,
        rate_tables: Vec<RateTable>,
        validation: ValidationConfig,
    ) -> Self {
        let mut sorted_tables = rate_tables;
        sorted_tables.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            rate_tables: sorted_tables,
            validation,
        }
    }

    /// Returns the agreement metadata.
    pub fn agreement(&self) -> &AgreementMetadata {
        &self.metadata
    }

    /// Returns all rate tables, oldest first.
    pub fn rate_tables(&self) -> &[RateTable] {
        &self.rate_tables
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    /// Returns the most recent rate table effective on or before `date`.
    pub fn rate_table_for(&self, date: NaiveDate) -> Option<&RateTable> {
        self.rate_tables
            .iter()
            .rfind(|table| table.effective_date <= date)
    }
}
