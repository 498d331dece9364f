use chrono::{DateTime, Datelike, TimeZone};
use clap::Parser;

use crate::core::calendar::{Month, TIME_ZONE};

#[derive(Copy, Clone, Parser)]
pub struct PeriodArgs {
    /// Norwegian month name, for example `oktober`. Defaults to the current month.
    #[clap(long, env = "MONTH")]
    month: Option<Month>,

    /// Defaults to the current year.
    #[clap(long, env = "YEAR", value_parser = clap::value_parser!(i32).range(2000..=2100))]
    year: Option<i32>,
}

impl PeriodArgs {
    /// Fill in the missing parts from the local time of `now`.
    pub fn resolve<Z: TimeZone>(self, now: &DateTime<Z>) -> (Month, i32) {
        let now = now.with_timezone(&TIME_ZONE);
        (self.month.unwrap_or_else(|| Month::of(&now)), self.year.unwrap_or_else(|| now.year()))
    }
}
