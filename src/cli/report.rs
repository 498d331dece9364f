use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;

use crate::{
    api::{MeasurementSource, Tibber},
    cache::FileCache,
    cli::period::PeriodArgs,
    core::{
        calendar::{Month, is_cache_fresh},
        measurement::{Measurement, MonthContext},
        summary::build_summary,
    },
    prelude::*,
    tables::{build_daily_table, build_summary_table},
};

#[derive(Parser)]
pub struct ReportArgs {
    #[clap(long = "tibber-access-key", env = "TIBBER_ACCESS_KEY", hide_env_values = true)]
    access_key: String,

    /// Directory with the fetched measurements.
    #[clap(long, env = "CACHE_DIR", default_value = ".cache")]
    cache_dir: PathBuf,

    /// Print the summary as JSON instead of the tables.
    #[clap(long)]
    json: bool,

    #[clap(flatten)]
    period: PeriodArgs,
}

impl ReportArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let now = Utc::now();
        let (month, year) = self.period.resolve(&now);
        let cache = FileCache::new(self.cache_dir);
        let source = Tibber::try_new(self.access_key)?;

        let measurements = load_measurements(&cache, &source, month, year, now).await?;
        if measurements.is_empty() {
            warn!(%month, year, "no measurements yet");
            return Ok(());
        }

        let context =
            MonthContext::builder().month(month).year(year).measurements(measurements).build();
        debug!(
            month = context.month_name(),
            month_index = context.month_index(),
            n_measurements = context.measurements.len(),
            "building the summary…",
        );
        let summary = build_summary(&context)?;
        info!(%month, year, grand_total = %summary.grand_total, "done");

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("{}", build_summary_table(&summary));
            println!("{}", build_daily_table(&summary.days));
        }
        Ok(())
    }
}

/// Serve the month from the cache while it is fresh, otherwise refetch and replace it.
#[instrument(skip(cache, source, now))]
async fn load_measurements(
    cache: &FileCache,
    source: &dyn MeasurementSource,
    month: Month,
    year: i32,
    now: DateTime<Utc>,
) -> Result<Vec<Measurement>> {
    let cached = cache.get(month, year).unwrap_or_else(|error| {
        error!("failed to read the cache: {error:#}");
        None
    });
    if let Some(cached) = cached
        && is_cache_fresh(month, year, &cached, now)
    {
        info!(n_measurements = cached.len(), root = %cache.root().display(), "using the cache");
        return Ok(cached);
    }

    let measurements = source.get_measurements(month, year).await?;
    cache.put(month, year, &measurements)?;
    Ok(measurements)
}
