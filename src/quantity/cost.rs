use std::{
    fmt::{Debug, Display, Formatter},
    ops::Div,
};

use crate::quantity::{Quantity, energy::KilowattHours, rate::KronerPerKilowattHour};

/// Norwegian kroner.
pub type Kroner = Quantity<0, 1>;

impl Display for Kroner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} kr", self.0)
    }
}

impl Debug for Kroner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}kr", self.0)
    }
}

impl Div<KilowattHours> for Kroner {
    type Output = KronerPerKilowattHour;

    fn div(self, rhs: KilowattHours) -> Self::Output {
        Quantity(self.0 / rhs.0)
    }
}
