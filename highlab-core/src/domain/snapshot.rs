//! Ranking snapshots — one day's capture of the new-high list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::SeriesError;

/// One row of a ranking snapshot.
///
/// `prior_high_date` is `None` when the source field failed to parse; such
/// rows silently fail the screener's recency filter instead of aborting the
/// run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRow {
    pub code: String,
    pub name: String,
    pub trading_price: f64,
    pub prior_high: f64,
    pub prior_high_date: Option<NaiveDate>,
    pub high: f64,
}

/// A dated capture of the ranking list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub rows: Vec<ScreeningRow>,
}

impl Snapshot {
    pub fn contains(&self, code: &str) -> bool {
        self.rows.iter().any(|row| row.code == code)
    }
}

/// Ordered-by-date sequence of snapshots.
///
/// Same construction discipline as `PriceSeries`: strictly ascending unique
/// dates, fail-fast on violation, never re-sorted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSeries {
    snapshots: Vec<Snapshot>,
}

impl SnapshotSeries {
    pub fn new(snapshots: Vec<Snapshot>) -> Result<Self, SeriesError> {
        for (i, pair) in snapshots.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::OrderingViolation {
                    code: "snapshots".into(),
                    index: i + 1,
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { snapshots })
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}

/// A code that survived every screening filter, keyed by the target
/// snapshot's date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub code: String,
    pub name: String,
    pub reference_date: NaiveDate,
}

/// How many captures in a snapshot sequence listed a code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceCount {
    pub code: String,
    pub name: String,
    pub days: usize,
}
