use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Kroner per kilowatt-hour, presented in øre.
pub type KronerPerKilowattHour = Quantity<-1, 1>;

impl KronerPerKilowattHour {
    pub const fn from_oere(oere: f64) -> Self {
        Self(oere / 100.0)
    }

    pub const fn as_oere(self) -> f64 {
        self.0 * 100.0
    }
}

impl Display for KronerPerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} øre/kWh", self.as_oere())
    }
}

impl Debug for KronerPerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}øre/kWh", self.as_oere())
    }
}
