use crate::quantity::energy::KilowattHours;

/// Local, synchronous failures of the billing engine. None of them is retried.
#[derive(Clone, Debug, PartialEq, derive_more::Display, derive_more::Error)]
pub enum BillingError {
    #[display("`{_0}` is not a month name")]
    InvalidMonth(#[error(not(source))] String),

    #[display("the measurement set is empty")]
    EmptyMeasurementSet,

    /// The top tier is unbounded, so this is a defect rather than bad input.
    #[display("no fixed fee tier covers the peak usage of {_0}")]
    NoMatchingTier(#[error(not(source))] KilowattHours),
}
