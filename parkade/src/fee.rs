//! Parking fees.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Amount charged on exit, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fee(u64);

impl Fee {
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    pub const fn amount(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Fee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flat fee for the first `base_hours`, then `hourly_rate` per extra hour.
///
/// The default schedule charges 10 for up to two hours and `hours * 10 - 10`
/// beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub base_fee: u64,
    pub base_hours: u64,
    pub hourly_rate: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_fee: 10,
            base_hours: 2,
            hourly_rate: 10,
        }
    }
}

impl FeeSchedule {
    pub fn fee_for_hours(&self, hours: u64) -> Fee {
        if hours <= self.base_hours {
            return Fee(self.base_fee);
        }
        let extra = (hours - self.base_hours).saturating_mul(self.hourly_rate);
        Fee(self.base_fee.saturating_add(extra))
    }
}

/// Whole hours billed for a stay. Measured in minutes, any partial hour
/// counts as a full one. Negative durations (clock skew) bill as zero.
pub fn billable_hours(stay: TimeDelta) -> u64 {
    let minutes = stay.num_minutes().max(0) as u64;
    minutes.div_ceil(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_fee_up_to_two_hours() {
        let schedule = FeeSchedule::default();
        for hours in 0..=2 {
            assert_eq!(schedule.fee_for_hours(hours), Fee::new(10));
        }
    }

    #[test]
    fn ten_per_hour_beyond_two() {
        let schedule = FeeSchedule::default();
        assert_eq!(schedule.fee_for_hours(3), Fee::new(20));
        assert_eq!(schedule.fee_for_hours(4), Fee::new(30));
        for hours in 3..48 {
            assert_eq!(schedule.fee_for_hours(hours).amount(), hours * 10 - 10);
        }
    }

    #[test]
    fn custom_schedule() {
        let schedule = FeeSchedule {
            base_fee: 5,
            base_hours: 1,
            hourly_rate: 3,
        };
        assert_eq!(schedule.fee_for_hours(1), Fee::new(5));
        assert_eq!(schedule.fee_for_hours(4), Fee::new(14));
    }

    #[test]
    fn partial_hours_round_up() {
        assert_eq!(billable_hours(TimeDelta::zero()), 0);
        assert_eq!(billable_hours(TimeDelta::seconds(59)), 0);
        assert_eq!(billable_hours(TimeDelta::minutes(1)), 1);
        assert_eq!(billable_hours(TimeDelta::minutes(60)), 1);
        assert_eq!(billable_hours(TimeDelta::minutes(61)), 2);
        assert_eq!(billable_hours(TimeDelta::minutes(121)), 3);
    }

    #[test]
    fn negative_stay_bills_zero_hours() {
        assert_eq!(billable_hours(TimeDelta::minutes(-30)), 0);
    }
}
