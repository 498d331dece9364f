mod tibber;

use async_trait::async_trait;

pub use self::tibber::Api as Tibber;
use crate::{
    core::{calendar::Month, measurement::Measurement},
    prelude::*,
};

/// Upstream of the hourly measurements.
#[async_trait]
pub trait MeasurementSource: Sync {
    /// Fetch the whole month, in chronological order.
    async fn get_measurements(&self, month: Month, year: i32) -> Result<Vec<Measurement>>;
}
