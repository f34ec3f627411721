//! EA Schedule 1 rate calculation.
//!
//! This module selects the rate rule in force for a session, derives
//! associated and payable hours, and computes the amount payable.

mod associated_hours;
mod rate_engine;
mod rate_lookup;

pub use associated_hours::{
    AssociatedHoursResult, calculate_associated_hours, normalise_delivery_hours,
};
pub use rate_engine::{RateEngine, round_money};
pub use rate_lookup::{RateLookupResult, lookup_rate};
