use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Timelike, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::{
    core::{calendar::Month, error::BillingError},
    quantity::{Quantity, cost::Kroner, energy::KilowattHours, rate::KronerPerKilowattHour},
};

/// Monthly grid fixed fee («fastledd») step.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct FixedFeeTier {
    pub name: &'static str,

    /// Exclusive, except for the very first tier.
    pub min: KilowattHours,

    /// Inclusive.
    pub max: KilowattHours,

    /// Per month.
    pub cost: Kroner,
}

/// Sorted by `max`, contiguous, and the last one is unbounded.
pub const FIXED_FEE_TIERS: [FixedFeeTier; 10] = [
    FixedFeeTier::new("Trinn 1", 0.0, 2.0, 125.0),
    FixedFeeTier::new("Trinn 2", 2.0, 5.0, 200.0),
    FixedFeeTier::new("Trinn 3", 5.0, 10.0, 325.0),
    FixedFeeTier::new("Trinn 4", 10.0, 15.0, 450.0),
    FixedFeeTier::new("Trinn 5", 15.0, 20.0, 575.0),
    FixedFeeTier::new("Trinn 6", 20.0, 25.0, 700.0),
    FixedFeeTier::new("Trinn 7", 25.0, 50.0, 1325.0),
    FixedFeeTier::new("Trinn 8", 50.0, 75.0, 1950.0),
    FixedFeeTier::new("Trinn 9", 75.0, 100.0, 2575.0),
    FixedFeeTier::new("Trinn 10", 100.0, f64::INFINITY, 5150.0),
];

impl FixedFeeTier {
    const fn new(name: &'static str, min: f64, max: f64, cost: f64) -> Self {
        Self { name, min: Quantity(min), max: Quantity(max), cost: Quantity(cost) }
    }
}

/// Government electricity subsidy («strømstøtte») parameters for a month.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct SubsidyConfig {
    /// Share of the price above the threshold that is covered, `0.0..=1.0`.
    pub percentage: f64,

    /// VAT excluded.
    pub threshold: KronerPerKilowattHour,

    /// Monthly consumption beyond this is not covered.
    pub max_eligible: KilowattHours,
}

impl SubsidyConfig {
    /// No subsidy at all.
    pub const NONE: Self = Self::new(0.0, 0.0, 0.0);

    const fn new(percentage: f64, threshold: f64, max_eligible: f64) -> Self {
        Self { percentage, threshold: Quantity(threshold), max_eligible: Quantity(max_eligible) }
    }

    /// Subsidy for the eligible consumption, paid out with VAT on top.
    pub fn allowance(
        self,
        spot_price_without_vat: KronerPerKilowattHour,
        eligible: KilowattHours,
        vat_multiplier: f64,
    ) -> Kroner {
        let covered_rate =
            (spot_price_without_vat - self.threshold).max(KronerPerKilowattHour::ZERO);
        eligible * (covered_rate * self.percentage) * vat_multiplier
    }
}

/// Subsidy scheme in force for an inclusive range of `(year, month number)`.
#[derive(Copy, Clone, Debug)]
pub struct SubsidyPeriod {
    pub first: (i32, u32),
    pub last: (i32, u32),
    pub config: SubsidyConfig,
}

impl SubsidyPeriod {
    const fn new(first: (i32, u32), last: (i32, u32), config: SubsidyConfig) -> Self {
        Self { first, last, config }
    }

    const fn months(self) -> RangeInclusive<(i32, u32)> {
        self.first..=self.last
    }
}

pub const SUBSIDY_SCHEDULE: [SubsidyPeriod; 7] = [
    SubsidyPeriod::new((2021, 12), (2021, 12), SubsidyConfig::new(0.55, 0.70, 5000.0)),
    SubsidyPeriod::new((2022, 1), (2022, 8), SubsidyConfig::new(0.80, 0.70, 5000.0)),
    SubsidyPeriod::new((2022, 9), (2023, 3), SubsidyConfig::new(0.90, 0.70, 5000.0)),
    SubsidyPeriod::new((2023, 4), (2023, 8), SubsidyConfig::new(0.80, 0.70, 5000.0)),
    SubsidyPeriod::new((2023, 9), (2023, 12), SubsidyConfig::new(0.90, 0.70, 5000.0)),
    SubsidyPeriod::new((2024, 1), (2024, 12), SubsidyConfig::new(0.90, 0.73, 5000.0)),
    SubsidyPeriod::new((2025, 1), (2025, 12), SubsidyConfig::new(0.90, 0.75, 5000.0)),
];

/// Immutable price list of the grid operator and the supplier.
#[derive(Copy, Clone, Debug)]
pub struct Tariff {
    /// Grid energy fee («energiledd») on weekdays within the day hours.
    pub day_rate: KronerPerKilowattHour,

    /// Grid energy fee for the rest of the week.
    pub night_rate: KronerPerKilowattHour,

    /// Inclusive.
    pub day_start_hour: u32,

    /// Exclusive.
    pub day_end_hour: u32,

    /// Supplier surcharge included into the hourly unit price.
    pub markup: KronerPerKilowattHour,

    /// Supplier monthly subscription.
    pub supplier_fee: Kroner,

    pub vat_multiplier: f64,

    pub fixed_fee_tiers: &'static [FixedFeeTier],

    pub subsidy_schedule: &'static [SubsidyPeriod],
}

impl Tariff {
    pub const NORWAY: Self = Self {
        day_rate: KronerPerKilowattHour::from_oere(43.10),
        night_rate: KronerPerKilowattHour::from_oere(36.85),
        day_start_hour: 6,
        day_end_hour: 22,
        markup: KronerPerKilowattHour::from_oere(1.0),
        supplier_fee: Quantity(39.0),
        vat_multiplier: 1.25,
        fixed_fee_tiers: &FIXED_FEE_TIERS,
        subsidy_schedule: &SUBSIDY_SCHEDULE,
    };

    /// First tier whose upper bound reaches the peak usage.
    pub fn fixed_fee_tier(&self, peak_usage: KilowattHours) -> Result<FixedFeeTier, BillingError> {
        self.fixed_fee_tiers
            .iter()
            .find(|tier| tier.max >= peak_usage)
            .copied()
            .ok_or(BillingError::NoMatchingTier(peak_usage))
    }

    /// Subsidy in force for the month, [`SubsidyConfig::NONE`] if there was none.
    #[must_use]
    pub fn subsidy_config(&self, month: Month, year: i32) -> SubsidyConfig {
        self.subsidy_schedule
            .iter()
            .find(|period| period.months().contains(&(year, month.number())))
            .map_or(SubsidyConfig::NONE, |period| period.config)
    }

    /// Whether the hour starting at the local time is billed with the day rate.
    #[must_use]
    pub fn is_day_rate(&self, start: &DateTime<Tz>) -> bool {
        !matches!(start.weekday(), Weekday::Sat | Weekday::Sun)
            && (self.day_start_hour..self.day_end_hour).contains(&start.hour())
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self::NORWAY
    }
}
