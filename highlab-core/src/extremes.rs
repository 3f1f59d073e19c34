//! Tally of the dates holding each security's range extremes.
//!
//! For every series, find the date of the maximum and the date of the
//! minimum adjusted close inside a date range, then count per date how many
//! securities peaked or bottomed there. Clustered counts show which
//! sessions set the tone for the whole market.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceSeries;

/// Inverted tally range.
#[derive(Debug, Error)]
#[error("range start {start} is after end {end}")]
pub struct InvalidRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// How many securities peaked (`max_count`) or bottomed (`min_count`) on a
/// date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeDateTally {
    pub date: NaiveDate,
    pub max_count: usize,
    pub min_count: usize,
}

/// Tallies extreme dates across `series` over `[start, end]` inclusive.
///
/// Ties go to the earliest date. A series with no observation inside the
/// range contributes nothing. Only dates holding at least one extreme come
/// back, in ascending order.
pub fn tally_extreme_dates<'a, I>(
    series: I,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ExtremeDateTally>, InvalidRange>
where
    I: IntoIterator<Item = &'a PriceSeries>,
{
    if start > end {
        return Err(InvalidRange { start, end });
    }

    let mut counts: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for s in series {
        let mut max: Option<(NaiveDate, f64)> = None;
        let mut min: Option<(NaiveDate, f64)> = None;
        for obs in s.observations() {
            if obs.date < start || obs.date > end {
                continue;
            }
            let value = obs.adj_close;
            // Strict comparisons: an equal later value never displaces the
            // earlier date.
            if max.map_or(true, |(_, best)| best < value) {
                max = Some((obs.date, value));
            }
            if min.map_or(true, |(_, best)| best > value) {
                min = Some((obs.date, value));
            }
        }
        if let Some((date, _)) = max {
            counts.entry(date).or_default().0 += 1;
        }
        if let Some((date, _)) = min {
            counts.entry(date).or_default().1 += 1;
        }
    }

    Ok(counts
        .into_iter()
        .map(|(date, (max_count, min_count))| ExtremeDateTally { date, max_count, min_count })
        .collect())
}
