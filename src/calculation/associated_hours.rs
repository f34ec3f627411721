//! Delivery hour normalisation and associated hours derivation.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::RateRule;

/// Rounds delivery hours to one decimal place, half away from zero.
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::normalise_delivery_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(normalise_delivery_hours(Decimal::new(125, 2)).to_string(), "1.3");
/// assert_eq!(normalise_delivery_hours(Decimal::new(2, 0)).to_string(), "2.0");
/// ```
pub fn normalise_delivery_hours(hours: Decimal) -> Decimal {
    let mut normalised = hours.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    normalised.rescale(1);
    normalised
}

/// The associated hours granted for a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociatedHoursResult {
    /// Associated hours, one decimal place.
    pub hours: Decimal,
    /// True when the rule's cap reduced the figure.
    pub capped: bool,
}

/// Derives associated hours as `delivery_hours × multiplier`, bounded by the
/// rule's cap when it has one.
///
/// `delivery_hours` is expected to be normalised already.
pub fn calculate_associated_hours(rule: &RateRule, delivery_hours: Decimal) -> AssociatedHoursResult {
    let uncapped = delivery_hours * rule.associated_hours_per_delivery_hour;

    let (hours, capped) = match rule.associated_hours_cap {
        Some(cap) if uncapped > cap => (cap, true),
        _ => (uncapped, false),
    };

    let mut hours = hours.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    hours.rescale(1);

    AssociatedHoursResult { hours, capped }
}
