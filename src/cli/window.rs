use chrono::{SecondsFormat, Utc};
use clap::Parser;

use crate::{cli::period::PeriodArgs, core::calendar::query_window, prelude::*};

#[derive(Parser)]
pub struct WindowArgs {
    #[clap(flatten)]
    period: PeriodArgs,
}

impl WindowArgs {
    pub fn run(self) {
        let (month, year) = self.period.resolve(&Utc::now());
        let window = query_window(month, year);
        info!(%month, year, n_days = window.n_days, "query window");
        println!(
            "after: {} ({})",
            window.after.to_rfc3339(),
            window.after.to_utc().to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        println!("first: {}", window.n_hours());
    }
}
