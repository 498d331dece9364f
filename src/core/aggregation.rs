use std::collections::BTreeMap;

use average::Mean;
use chrono::NaiveDate;
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::{
    core::{
        error::BillingError,
        measurement::Measurement,
        tariff::{FixedFeeTier, Tariff},
    },
    quantity::{cost::Kroner, energy::KilowattHours, rate::KronerPerKilowattHour},
};

/// Number of the highest hours averaged into the peak usage.
const N_PEAK_HOURS: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Totals {
    pub consumption: KilowattHours,
    pub cost: Kroner,

    /// Plain mean over the hours, markup and VAT included.
    pub average_unit_price: KronerPerKilowattHour,

    /// Plain mean of the VAT component.
    pub average_unit_price_vat: KronerPerKilowattHour,

    /// What the consumption actually cost per kilowatt-hour.
    pub weighted_unit_price: KronerPerKilowattHour,

    /// Consumption-weighted VAT component.
    pub weighted_unit_price_vat: KronerPerKilowattHour,
}

pub fn aggregate_totals(measurements: &[Measurement]) -> Result<Totals, BillingError> {
    if measurements.is_empty() {
        return Err(BillingError::EmptyMeasurementSet);
    }

    let consumption: KilowattHours = measurements.iter().map(|it| it.consumption).sum();
    let cost: Kroner = measurements.iter().map(|it| it.cost).sum();
    let vat: Kroner = measurements.iter().map(|it| it.consumption * it.unit_price_vat).sum();
    let (weighted_unit_price, weighted_unit_price_vat) = if consumption > KilowattHours::ZERO {
        (cost / consumption, vat / consumption)
    } else {
        (KronerPerKilowattHour::ZERO, KronerPerKilowattHour::ZERO)
    };

    let unit_price: Mean = measurements.iter().map(|it| it.unit_price.0).collect();
    let unit_price_vat: Mean = measurements.iter().map(|it| it.unit_price_vat.0).collect();

    Ok(Totals {
        consumption,
        cost,
        average_unit_price: unit_price.mean().into(),
        average_unit_price_vat: unit_price_vat.mean().into(),
        weighted_unit_price,
        weighted_unit_price_vat,
    })
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DayNight {
    pub day: KilowattHours,
    pub night: KilowattHours,
}

/// Split the consumption by the grid energy fee time rules.
pub fn split_day_night(measurements: &[Measurement], tariff: &Tariff) -> DayNight {
    measurements.iter().fold(DayNight::default(), |mut split, measurement| {
        if tariff.is_day_rate(&measurement.local_start()) {
            split.day += measurement.consumption;
        } else {
            split.night += measurement.consumption;
        }
        split
    })
}

/// Average of the highest hourly consumptions, missing hours count as zero.
pub fn peak_usage(measurements: &[Measurement]) -> KilowattHours {
    #[expect(clippy::cast_precision_loss)]
    let n_peak_hours = N_PEAK_HOURS as f64;

    measurements
        .iter()
        .map(|measurement| OrderedFloat(measurement.consumption.0))
        .k_largest(N_PEAK_HOURS)
        .map(|consumption| KilowattHours::from(consumption.0))
        .sum::<KilowattHours>()
        / n_peak_hours
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedFee {
    /// Average of the top hours.
    pub peak_usage: KilowattHours,

    pub tier: FixedFeeTier,
}

/// Resolve the grid fixed fee tier from the month's peak hours.
pub fn peak_usage_tier(
    measurements: &[Measurement],
    tariff: &Tariff,
) -> Result<FixedFee, BillingError> {
    let peak_usage = peak_usage(measurements);
    Ok(FixedFee { peak_usage, tier: tariff.fixed_fee_tier(peak_usage)? })
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub consumption: KilowattHours,
    pub cost: Kroner,
    pub vat: Kroner,
}

/// Sum the measurements per local calendar date, in ascending date order.
pub fn daily_usage(measurements: &[Measurement]) -> Vec<DailyUsage> {
    measurements
        .iter()
        .fold(BTreeMap::<NaiveDate, DailyUsage>::new(), |mut days, measurement| {
            let date = measurement.local_start().date_naive();
            let day = days.entry(date).or_insert(DailyUsage {
                date,
                consumption: KilowattHours::ZERO,
                cost: Kroner::ZERO,
                vat: Kroner::ZERO,
            });
            day.consumption += measurement.consumption;
            day.cost += measurement.cost;
            day.vat += measurement.consumption * measurement.unit_price_vat;
            days
        })
        .into_values()
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::measurement::fixtures;

    #[test]
    fn test_aggregate_totals() {
        let mut measurements = fixtures::hourly((2022, 12, 1), 4, |index| index as f64);
        measurements[3].unit_price = KronerPerKilowattHour::from(2.0);
        measurements[3].cost = Kroner::from(6.0);
        let totals = aggregate_totals(&measurements).unwrap();
        assert_abs_diff_eq!(totals.consumption.0, 6.0);
        assert_abs_diff_eq!(totals.cost.0, 9.0);
        assert_abs_diff_eq!(totals.average_unit_price.0, 1.25);
        assert_abs_diff_eq!(totals.average_unit_price_vat.0, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(totals.weighted_unit_price.0, 1.5);
        assert_abs_diff_eq!(totals.weighted_unit_price_vat.0, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_aggregate_totals_hourly_means() {
        let mut measurements = fixtures::hourly((2022, 12, 1), 3, |_| 1.0);
        for (index, measurement) in measurements.iter_mut().enumerate() {
            let price = (index + 1) as f64;
            measurement.unit_price = KronerPerKilowattHour::from(price);
            measurement.unit_price_vat = KronerPerKilowattHour::from(price * 0.2);
        }
        let totals = aggregate_totals(&measurements).unwrap();
        assert_abs_diff_eq!(totals.average_unit_price.0, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(totals.average_unit_price_vat.0, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_aggregate_totals_zero_consumption() {
        let measurements = fixtures::hourly((2022, 12, 1), 2, |_| 0.0);
        let totals = aggregate_totals(&measurements).unwrap();
        assert_eq!(totals.weighted_unit_price, KronerPerKilowattHour::ZERO);
        assert_abs_diff_eq!(totals.average_unit_price.0, 1.0);
    }

    #[test]
    fn test_aggregate_totals_empty() {
        assert_eq!(aggregate_totals(&[]), Err(BillingError::EmptyMeasurementSet));
    }

    #[test]
    fn test_split_day_night() {
        let measurements = [
            // Saturday:
            fixtures::at((2022, 12, 17), 10, 1.0),
            // Tuesday:
            fixtures::at((2022, 12, 20), 7, 2.0),
            fixtures::at((2022, 12, 20), 22, 4.0),
        ];
        let split = split_day_night(&measurements, &Tariff::NORWAY);
        assert_abs_diff_eq!(split.day.0, 2.0);
        assert_abs_diff_eq!(split.night.0, 5.0);
    }

    #[test]
    fn test_split_day_night_full_week() {
        // 2023-02-06 is a Monday:
        let measurements = fixtures::hourly((2023, 2, 6), 24 * 7, |_| 1.0);
        let split = split_day_night(&measurements, &Tariff::NORWAY);
        assert_abs_diff_eq!(split.day.0, 5.0 * 16.0);
        assert_abs_diff_eq!(split.night.0, 5.0 * 8.0 + 2.0 * 24.0);
    }

    #[test]
    fn test_peak_usage_tier() {
        let consumptions = [1.0, 10.0, 1.0, 6.0, 8.0, 1.0, 1.0];
        let measurements = fixtures::hourly((2022, 12, 1), consumptions.len(), |index| {
            consumptions[index]
        });
        let fixed_fee = peak_usage_tier(&measurements, &Tariff::NORWAY).unwrap();
        assert_abs_diff_eq!(fixed_fee.peak_usage.0, 8.0);
        assert_eq!(fixed_fee.tier.name, "Trinn 3");
        assert_abs_diff_eq!(fixed_fee.tier.cost.0, 325.0);
    }

    #[test]
    fn test_peak_usage_zero_padded() {
        let measurements = fixtures::hourly((2022, 12, 1), 1, |_| 3.0);
        assert_abs_diff_eq!(peak_usage(&measurements).0, 1.0);
        assert_abs_diff_eq!(peak_usage(&[]).0, 0.0);
        assert_eq!(peak_usage_tier(&[], &Tariff::NORWAY).unwrap().tier.name, "Trinn 1");
    }

    #[test]
    fn test_daily_usage() {
        let measurements = fixtures::hourly((2022, 12, 1), 48, |_| 0.5);
        let days = daily_usage(&measurements);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2022, 12, 1).unwrap());
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2022, 12, 2).unwrap());
        assert_abs_diff_eq!(days[0].consumption.0, 12.0);
        assert_abs_diff_eq!(days[1].cost.0, 12.0);
        assert_abs_diff_eq!(days[1].vat.0, 1.2, epsilon = 1e-12);
    }
}
