use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::{
    core::{
        aggregation::{aggregate_totals, daily_usage, peak_usage_tier, split_day_night},
        calendar::{Month, count_unique_calendar_days},
        error::BillingError,
        measurement::MonthContext,
        tariff::{FixedFeeTier, SubsidyConfig, Tariff},
        unit_value::UnitValue,
    },
    prelude::*,
    quantity::{cost::Kroner, energy::KilowattHours, rate::KronerPerKilowattHour},
};

/// Everything the monthly report shows. Built fresh for every request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct MonthlyBillingSummary {
    pub month: Month,
    pub year: i32,
    pub n_measurements: usize,

    /// End of the last measured hour.
    pub data_until: DateTime<FixedOffset>,

    /// Covering range of the measured days.
    pub days_counted: u32,

    pub consumption: UnitValue<KilowattHours>,

    /// Energy cost billed by the supplier, before the subsidy.
    pub cost: UnitValue<Kroner>,

    pub spot_price: VatSplit,

    /// Consumption-weighted price actually paid.
    pub used_price: VatSplit,

    pub subsidy_config: SubsidyConfig,
    pub subsidy: UnitValue<Kroner>,

    /// Supplier cost minus the subsidy.
    pub actual_energy_cost: UnitValue<Kroner>,

    pub grid: GridFee,
    pub supplier_fee: UnitValue<Kroner>,
    pub grand_total: UnitValue<Kroner>,
    pub average_daily_cost: UnitValue<Kroner>,

    /// Most recent day first.
    pub days: Vec<DailyBreakdown>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VatSplit {
    pub with_vat: UnitValue<KronerPerKilowattHour>,
    pub without_vat: UnitValue<KronerPerKilowattHour>,
}

/// Grid operator fees («nettleie»).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridFee {
    pub fixed_tier: FixedFeeTier,

    /// Average of the top hours that selected the tier.
    pub peak_usage: UnitValue<KilowattHours>,

    pub fixed_cost: UnitValue<Kroner>,
    pub day: EnergyFee,
    pub night: EnergyFee,
    pub total: UnitValue<Kroner>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnergyFee {
    pub consumption: UnitValue<KilowattHours>,
    pub cost: UnitValue<Kroner>,
}

/// Single day of the tabular view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyBreakdown {
    pub date: NaiveDate,
    pub cost: UnitValue<Kroner>,
    pub consumption: UnitValue<KilowattHours>,

    /// VAT included into the cost.
    pub vat: UnitValue<Kroner>,

    /// Absent when nothing was consumed.
    pub average_price: Option<UnitValue<KronerPerKilowattHour>>,

    /// Approximation: uses the spot price of the whole month, not the day's.
    pub estimated_allowance: UnitValue<Kroner>,

    pub net_cost: UnitValue<Kroner>,
}

/// Build the summary with the standard Norwegian tariff.
pub fn build_summary(context: &MonthContext) -> Result<MonthlyBillingSummary, BillingError> {
    MonthlyBillingSummary::try_build(context, &Tariff::NORWAY)
}

impl MonthlyBillingSummary {
    #[instrument(skip_all, fields(month = %context.month, year = context.year))]
    pub fn try_build(context: &MonthContext, tariff: &Tariff) -> Result<Self, BillingError> {
        let measurements = context.measurements.as_slice();
        let last = measurements.last().ok_or(BillingError::EmptyMeasurementSet)?;

        let totals = aggregate_totals(measurements)?;

        let day_night = split_day_night(measurements, tariff);
        let day_cost = day_night.day * tariff.day_rate;
        let night_cost = day_night.night * tariff.night_rate;

        let fixed_fee = peak_usage_tier(measurements, tariff)?;

        let spot_price_with_vat = totals.average_unit_price - tariff.markup;
        let spot_price_without_vat = spot_price_with_vat - totals.average_unit_price_vat;

        let subsidy_config = tariff.subsidy_config(context.month, context.year);
        let subsidy = subsidy_config.allowance(
            spot_price_without_vat,
            totals.consumption.min(subsidy_config.max_eligible),
            tariff.vat_multiplier,
        );

        let total_grid_fee = day_cost + night_cost + fixed_fee.tier.cost;
        let grand_total = tariff.supplier_fee + total_grid_fee + totals.cost - subsidy;

        let days_counted =
            count_unique_calendar_days(measurements.iter().map(|measurement| measurement.from));

        let days = daily_usage(measurements)
            .into_iter()
            .rev()
            .map(|day| {
                let estimated_allowance = subsidy_config.allowance(
                    spot_price_without_vat,
                    day.consumption,
                    tariff.vat_multiplier,
                );
                DailyBreakdown {
                    date: day.date,
                    cost: day.cost.into(),
                    consumption: day.consumption.into(),
                    vat: day.vat.into(),
                    average_price: (day.consumption > KilowattHours::ZERO)
                        .then(|| (day.cost / day.consumption).into()),
                    estimated_allowance: estimated_allowance.into(),
                    net_cost: (day.cost - estimated_allowance).into(),
                }
            })
            .collect();

        debug!(
            n_measurements = measurements.len(),
            ?grand_total,
            ?subsidy,
            tier = fixed_fee.tier.name,
            "built the summary",
        );

        Ok(Self {
            month: context.month,
            year: context.year,
            n_measurements: measurements.len(),
            data_until: last.to,
            days_counted,
            consumption: totals.consumption.into(),
            cost: totals.cost.into(),
            spot_price: VatSplit {
                with_vat: spot_price_with_vat.into(),
                without_vat: spot_price_without_vat.into(),
            },
            used_price: VatSplit {
                with_vat: totals.weighted_unit_price.into(),
                without_vat: (totals.weighted_unit_price - totals.weighted_unit_price_vat).into(),
            },
            subsidy_config,
            subsidy: subsidy.into(),
            actual_energy_cost: (totals.cost - subsidy).into(),
            grid: GridFee {
                fixed_tier: fixed_fee.tier,
                peak_usage: fixed_fee.peak_usage.into(),
                fixed_cost: fixed_fee.tier.cost.into(),
                day: EnergyFee { consumption: day_night.day.into(), cost: day_cost.into() },
                night: EnergyFee { consumption: day_night.night.into(), cost: night_cost.into() },
                total: total_grid_fee.into(),
            },
            supplier_fee: tariff.supplier_fee.into(),
            grand_total: grand_total.into(),
            average_daily_cost: (grand_total / f64::from(days_counted)).into(),
            days,
        })
    }
}
