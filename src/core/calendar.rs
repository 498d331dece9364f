use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::core::{error::BillingError, measurement::Measurement};

/// All «local time» decisions are made in this zone.
pub const TIME_ZONE: Tz = chrono_tz::Europe::Oslo;

/// Don't bother the provider again until the data had a chance to get published.
const GRACE_PERIOD: TimeDelta = TimeDelta::hours(2);

#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Januar,
    Februar,
    Mars,
    April,
    Mai,
    Juni,
    Juli,
    August,
    September,
    Oktober,
    November,
    Desember,
}

impl Month {
    pub const ALL: [Self; 12] = [
        Self::Januar,
        Self::Februar,
        Self::Mars,
        Self::April,
        Self::Mai,
        Self::Juni,
        Self::Juli,
        Self::August,
        Self::September,
        Self::Oktober,
        Self::November,
        Self::Desember,
    ];

    /// Month of the timestamp in the billing time zone.
    #[must_use]
    pub fn of<Z: TimeZone>(timestamp: &DateTime<Z>) -> Self {
        Self::ALL[timestamp.with_timezone(&TIME_ZONE).month0() as usize]
    }

    /// Zero-based.
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// One-based.
    #[must_use]
    pub const fn number(self) -> u32 {
        self as u32 + 1
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Januar => "januar",
            Self::Februar => "februar",
            Self::Mars => "mars",
            Self::April => "april",
            Self::Mai => "mai",
            Self::Juni => "juni",
            Self::Juli => "juli",
            Self::August => "august",
            Self::September => "september",
            Self::Oktober => "oktober",
            Self::November => "november",
            Self::Desember => "desember",
        }
    }

    /// Calendar month following this one, with the year it falls in.
    const fn next(self, year: i32) -> (i32, u32) {
        match self {
            Self::Desember => (year + 1, 1),
            _ => (year, self.number() + 1),
        }
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = BillingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|month| month.name() == name)
            .ok_or_else(|| BillingError::InvalidMonth(name.to_owned()))
    }
}

/// Number of days in the month, leap years included.
///
/// # Panics
///
/// When the year is out of the `chrono` range.
#[must_use]
pub fn days_in_month(year: i32, month: Month) -> u32 {
    // «Day zero» of the next month:
    let (next_year, next_month) = month.next(year);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|date| date.pred_opt())
        .expect("the year should be within the supported range")
        .day()
}

/// Upstream consumption query parameters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct QueryWindow {
    /// The provider returns hours strictly after this one, so it points one hour before the month starts.
    pub after: DateTime<Tz>,

    pub n_days: u32,
}

impl QueryWindow {
    /// Always `24` per day: the extra hour of the October DST switch is not requested.
    #[must_use]
    pub const fn n_hours(self) -> u32 {
        self.n_days * 24
    }
}

/// Query window covering the whole month.
///
/// # Panics
///
/// When the year is out of the `chrono` range.
#[must_use]
pub fn query_window(month: Month, year: i32) -> QueryWindow {
    let first_hour = NaiveDate::from_ymd_opt(year, month.number(), 1)
        .map(|date| date.and_time(NaiveTime::MIN))
        .and_then(|midnight| TIME_ZONE.from_local_datetime(&midnight).earliest())
        .expect("the year should be within the supported range");
    QueryWindow { after: first_hour - TimeDelta::hours(1), n_days: days_in_month(year, month) }
}

/// Number of days in the range covering the timestamps, both ends included.
///
/// Days without any timestamp inside the range still count.
#[must_use]
pub fn count_unique_calendar_days<Z: TimeZone>(
    timestamps: impl IntoIterator<Item = DateTime<Z>>,
) -> u32 {
    match timestamps
        .into_iter()
        .map(|timestamp| timestamp.with_timezone(&TIME_ZONE).date_naive())
        .minmax()
    {
        MinMaxResult::NoElements => 0,
        MinMaxResult::OneElement(_) => 1,
        MinMaxResult::MinMax(min, max) => {
            u32::try_from((max - min).num_days() + 1).unwrap_or(u32::MAX)
        }
    }
}

/// Decide whether the cached measurements are good enough to skip the provider.
#[must_use]
pub fn is_cache_fresh(
    month: Month,
    year: i32,
    cached: &[Measurement],
    now: DateTime<Utc>,
) -> bool {
    let Some(last) = cached.last() else {
        return false;
    };
    if cached.len() == days_in_month(year, month) as usize * 24 {
        return true;
    }
    if last.local_start().month() != last.local_end().month() {
        // The last hour closes the month, there is nothing more to fetch:
        return true;
    }
    now < (last.to + GRACE_PERIOD).to_utc()
}
