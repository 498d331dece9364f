use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{
    core::calendar::{Month, TIME_ZONE},
    quantity::{cost::Kroner, energy::KilowattHours, rate::KronerPerKilowattHour},
};

/// Single hourly bucket as billed by the supplier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Inclusive.
    pub from: DateTime<FixedOffset>,

    /// Exclusive.
    pub to: DateTime<FixedOffset>,

    pub consumption: KilowattHours,

    /// Amount billed for the hour, markup and VAT included.
    pub cost: Kroner,

    /// Markup and VAT included.
    pub unit_price: KronerPerKilowattHour,

    /// VAT component of [`Measurement::unit_price`].
    #[serde(rename = "unitPriceVAT")]
    pub unit_price_vat: KronerPerKilowattHour,

    #[serde(default)]
    pub consumption_unit: ConsumptionUnit,
}

impl Measurement {
    /// Start of the hour in the billing time zone.
    #[must_use]
    pub fn local_start(&self) -> DateTime<Tz> {
        self.from.with_timezone(&TIME_ZONE)
    }

    /// End of the hour in the billing time zone.
    #[must_use]
    pub fn local_end(&self) -> DateTime<Tz> {
        self.to.with_timezone(&TIME_ZONE)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ConsumptionUnit {
    #[default]
    #[serde(rename = "kWh")]
    KilowattHour,
}

/// A month worth of measurements, as handed over by the fetching layer.
#[derive(Clone, Debug, bon::Builder)]
#[must_use]
pub struct MonthContext {
    pub month: Month,
    pub year: i32,

    /// Chronological.
    #[builder(default)]
    pub measurements: Vec<Measurement>,
}

impl MonthContext {
    #[must_use]
    pub const fn month_index(&self) -> u32 {
        self.month.index()
    }

    #[must_use]
    pub const fn month_name(&self) -> &'static str {
        self.month.name()
    }
}

#[cfg(test)]
pub mod fixtures {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    /// Build `n_hours` contiguous measurements starting at the local midnight of the given date.
    pub fn hourly(
        (year, month, day): (i32, u32, u32),
        n_hours: usize,
        consumption: impl Fn(usize) -> f64,
    ) -> Vec<Measurement> {
        let start = TIME_ZONE.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap();
        (0..n_hours)
            .map(|index| {
                let from = start + TimeDelta::hours(i64::try_from(index).unwrap());
                let consumption = consumption(index);
                Measurement {
                    from: from.fixed_offset(),
                    to: (from + TimeDelta::hours(1)).fixed_offset(),
                    consumption: KilowattHours::from(consumption),
                    cost: Kroner::from(consumption),
                    unit_price: KronerPerKilowattHour::from(1.0),
                    unit_price_vat: KronerPerKilowattHour::from(0.1),
                    consumption_unit: ConsumptionUnit::KilowattHour,
                }
            })
            .collect()
    }

    /// Single one-hour measurement starting at the given local time.
    pub fn at(
        (year, month, day): (i32, u32, u32),
        hour: u32,
        consumption: f64,
    ) -> Measurement {
        let from = TIME_ZONE.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap();
        Measurement {
            from: from.fixed_offset(),
            to: (from + TimeDelta::hours(1)).fixed_offset(),
            consumption: KilowattHours::from(consumption),
            cost: Kroner::from(consumption),
            unit_price: KronerPerKilowattHour::from(1.0),
            unit_price_vat: KronerPerKilowattHour::from(0.1),
            consumption_unit: ConsumptionUnit::KilowattHour,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_deserialize_tibber_node() -> Result {
        let measurement: Measurement = serde_json::from_str(
            r#"{
                "from": "2022-12-20T10:00:00.000+01:00",
                "to": "2022-12-20T11:00:00.000+01:00",
                "cost": 2.5,
                "unitPrice": 1.25,
                "unitPriceVAT": 0.25,
                "consumption": 2.0,
                "consumptionUnit": "kWh"
            }"#,
        )?;
        assert_eq!(measurement.consumption, KilowattHours::from(2.0));
        assert_eq!(measurement.unit_price_vat, KronerPerKilowattHour::from(0.25));
        assert_eq!(measurement.local_start().to_rfc3339(), "2022-12-20T10:00:00+01:00");
        Ok(())
    }

    #[test]
    fn test_month_context_builder() {
        let context = MonthContext::builder().month(Month::Oktober).year(2022).build();
        assert_eq!(context.month_index(), 9);
        assert_eq!(context.month_name(), "oktober");
        assert!(context.measurements.is_empty());
    }
}
