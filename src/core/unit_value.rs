use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::quantity::{cost::Kroner, energy::KilowattHours, rate::KronerPerKilowattHour};

/// Quantity that knows how it is presented to the user.
pub trait Unit: Copy {
    const SUFFIX: &'static str;

    /// Value in the presentation unit, before rounding.
    fn presentation_value(self) -> f64;
}

impl Unit for Kroner {
    const SUFFIX: &'static str = "kr";

    fn presentation_value(self) -> f64 {
        self.0
    }
}

impl Unit for KilowattHours {
    const SUFFIX: &'static str = "kWh";

    fn presentation_value(self) -> f64 {
        self.0
    }
}

impl Unit for KronerPerKilowattHour {
    const SUFFIX: &'static str = "øre/kWh";

    fn presentation_value(self) -> f64 {
        self.as_oere()
    }
}

/// Derived figure of the report with the rounding made explicit.
///
/// Calculations always continue from [`UnitValue::raw`]. The rounded value is for display only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnitValue<Q> {
    pub raw: Q,

    /// Whole presentation units, half away from zero.
    pub rounded: f64,

    pub visual: String,
}

impl<Q: Unit> From<Q> for UnitValue<Q> {
    fn from(raw: Q) -> Self {
        let rounded = round_half_away_from_zero(raw.presentation_value());
        Self { raw, rounded, visual: format!("{rounded} {}", Q::SUFFIX) }
    }
}

impl<Q> Display for UnitValue<Q> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.visual)
    }
}

fn round_half_away_from_zero(value: f64) -> f64 {
    // Adding zero turns `-0.0` into `0.0`:
    value.round() + 0.0
}
