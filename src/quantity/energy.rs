use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, cost::Kroner, rate::KronerPerKilowattHour};

pub type KilowattHours = Quantity<1, 0>;

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}kWh", self.0)
    }
}

impl Mul<KronerPerKilowattHour> for KilowattHours {
    type Output = Kroner;

    fn mul(self, rhs: KronerPerKilowattHour) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
