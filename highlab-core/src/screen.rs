//! Presence screening across dated ranking snapshots.
//!
//! Looks `period` snapshots back from the latest capture and keeps the
//! codes whose prior high is established (not fresh), which are still on
//! the list today, and which kept re-appearing across the trailing window.
//! Also home to the appearance-day report over a whole snapshot sequence.

use std::collections::HashSet;

use chrono::Duration;
use thiserror::Error;

use crate::domain::{PresenceCount, ScreeningResult, Snapshot, SnapshotSeries};

/// Default trailing snapshot count.
pub const DEFAULT_PERIOD: usize = 10;
/// Default minimum age, in days, of the prior year-to-date high.
pub const DEFAULT_PAST_HIGH_THRESHOLD_DAYS: i64 = 30;
/// Default minimum appearances across the trailing window.
pub const DEFAULT_MIN_APPEARANCE: usize = 8;

/// Structural screening failures. Unlike per-row rejections these abort the
/// run.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("need at least {need} snapshots for period {period}, got {have}")]
    NotEnoughSnapshots { need: usize, have: usize, period: usize },

    #[error("period must be at least 1")]
    InvalidPeriod,
}

/// Screens a snapshot sequence by recency-of-high and appearance counts.
#[derive(Debug, Clone, Copy)]
pub struct PresenceScreener {
    period: usize,
    past_high_threshold: Duration,
    min_appearance: usize,
}

impl Default for PresenceScreener {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            past_high_threshold: Duration::days(DEFAULT_PAST_HIGH_THRESHOLD_DAYS),
            min_appearance: DEFAULT_MIN_APPEARANCE,
        }
    }
}

impl PresenceScreener {
    pub fn new(
        period: usize,
        past_high_threshold_days: i64,
        min_appearance: usize,
    ) -> Result<Self, ScreenError> {
        if period < 1 {
            return Err(ScreenError::InvalidPeriod);
        }
        Ok(Self {
            period,
            past_high_threshold: Duration::days(past_high_threshold_days),
            min_appearance,
        })
    }

    /// Runs the screen. The target snapshot sits `period` positions before
    /// the latest; a row survives when all four filters pass:
    ///
    /// 1. its prior-high date parsed (unparsable rows are silently dropped),
    /// 2. the prior high is at least `past_high_threshold` days old at the
    ///    target date,
    /// 3. the code is still present in the latest snapshot,
    /// 4. the code appears in at least `min_appearance` of the trailing
    ///    `period` snapshots ending at the latest (target excluded).
    pub fn screen(&self, series: &SnapshotSeries) -> Result<Vec<ScreeningResult>, ScreenError> {
        let snapshots = series.snapshots();
        let need = self.period + 1;
        if snapshots.len() < need {
            return Err(ScreenError::NotEnoughSnapshots {
                need,
                have: snapshots.len(),
                period: self.period,
            });
        }

        let latest = &snapshots[snapshots.len() - 1];
        let target = &snapshots[snapshots.len() - 1 - self.period];
        let trailing = &snapshots[snapshots.len() - self.period..];

        let mut results = Vec::new();
        for row in &target.rows {
            let prior_high_date = match row.prior_high_date {
                Some(date) => date,
                None => continue,
            };
            if target.date - prior_high_date < self.past_high_threshold {
                continue;
            }
            if !latest.contains(&row.code) {
                continue;
            }
            let appearances = count_appearances(trailing, &row.code);
            if appearances < self.min_appearance {
                continue;
            }
            results.push(ScreeningResult {
                code: row.code.clone(),
                name: row.name.clone(),
                reference_date: target.date,
            });
        }
        Ok(results)
    }
}

fn count_appearances(snapshots: &[Snapshot], code: &str) -> usize {
    snapshots.iter().filter(|s| s.contains(code)).count()
}

/// For every code on the latest capture, how many captures in the whole
/// sequence listed it (the latest included). Rows come back in the latest
/// capture's order; a code listed twice there is reported once.
pub fn count_presence_days(series: &SnapshotSeries) -> Vec<PresenceCount> {
    let Some(latest) = series.latest() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut counts = Vec::new();
    for row in &latest.rows {
        if !seen.insert(row.code.as_str()) {
            continue;
        }
        counts.push(PresenceCount {
            code: row.code.clone(),
            name: row.name.clone(),
            days: count_appearances(series.snapshots(), &row.code),
        });
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScreeningRow;
    use chrono::NaiveDate;

    fn row(code: &str, prior_high_date: Option<NaiveDate>) -> ScreeningRow {
        ScreeningRow {
            code: code.to_string(),
            name: format!("name-{code}"),
            trading_price: 1500.0,
            prior_high: 1800.0,
            prior_high_date,
            high: 1810.0,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    /// Twelve daily snapshots. "7203" sits in the target (2nd) snapshot
    /// with a 45-day-old prior high and appears in 9 of the trailing 10,
    /// including the latest.
    fn twelve_snapshots() -> SnapshotSeries {
        let prior = date(2) - Duration::days(45);
        let mut snapshots = Vec::new();
        for day in 1..=12 {
            let mut rows = vec![row("9984", Some(date(1) - Duration::days(60)))];
            // Absent on day 5 only: 9 of the trailing 10 (days 3..=12).
            if day != 5 {
                rows.push(row("7203", Some(prior)));
            }
            snapshots.push(Snapshot { date: date(day), rows });
        }
        SnapshotSeries::new(snapshots).unwrap()
    }

    #[test]
    fn established_persistent_code_passes() {
        let screener = PresenceScreener::new(10, 30, 8).unwrap();
        let results = screener.screen(&twelve_snapshots()).unwrap();
        let codes: Vec<&str> = results.iter().map(|r| r.code.as_str()).collect();
        assert!(codes.contains(&"7203"));
        assert_eq!(results[0].reference_date, date(2));
    }

    #[test]
    fn raising_min_appearance_removes_it() {
        let screener = PresenceScreener::new(10, 30, 10).unwrap();
        let results = screener.screen(&twelve_snapshots()).unwrap();
        assert!(!results.iter().any(|r| r.code == "7203"));
    }

    #[test]
    fn fresh_prior_high_is_rejected() {
        let recent = date(2) - Duration::days(10);
        let snapshots: Vec<Snapshot> = (1..=12)
            .map(|day| Snapshot { date: date(day), rows: vec![row("7203", Some(recent))] })
            .collect();
        let series = SnapshotSeries::new(snapshots).unwrap();
        let results = PresenceScreener::new(10, 30, 8).unwrap().screen(&series).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn unparsable_prior_high_date_drops_the_row() {
        let snapshots: Vec<Snapshot> = (1..=12)
            .map(|day| Snapshot { date: date(day), rows: vec![row("7203", None)] })
            .collect();
        let series = SnapshotSeries::new(snapshots).unwrap();
        let results = PresenceScreener::new(10, 30, 8).unwrap().screen(&series).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn absence_from_latest_rejects() {
        let prior = date(2) - Duration::days(45);
        let snapshots: Vec<Snapshot> = (1..=12)
            .map(|day| Snapshot {
                date: date(day),
                rows: if day == 12 { vec![] } else { vec![row("7203", Some(prior))] },
            })
            .collect();
        let series = SnapshotSeries::new(snapshots).unwrap();
        let results = PresenceScreener::new(10, 30, 8).unwrap().screen(&series).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn too_few_snapshots_is_a_structural_error() {
        let snapshots: Vec<Snapshot> =
            (1..=10).map(|day| Snapshot { date: date(day), rows: vec![] }).collect();
        let series = SnapshotSeries::new(snapshots).unwrap();
        let err = PresenceScreener::new(10, 30, 8).unwrap().screen(&series).unwrap_err();
        assert!(matches!(err, ScreenError::NotEnoughSnapshots { need: 11, have: 10, .. }));
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = PresenceScreener::new(0, 30, 8).unwrap_err();
        assert!(matches!(err, ScreenError::InvalidPeriod));
    }

    #[test]
    fn presence_days_counts_every_capture_for_latest_codes() {
        let counts = count_presence_days(&twelve_snapshots());
        let summary: Vec<(&str, usize)> =
            counts.iter().map(|c| (c.code.as_str(), c.days)).collect();
        // Latest capture's row order; "7203" missed day 5 only.
        assert_eq!(summary, vec![("9984", 12), ("7203", 11)]);
    }

    #[test]
    fn presence_days_reports_duplicate_latest_rows_once() {
        let prior = date(1) - Duration::days(60);
        let snapshots = vec![
            Snapshot { date: date(1), rows: vec![row("7203", Some(prior))] },
            Snapshot {
                date: date(2),
                rows: vec![row("7203", Some(prior)), row("7203", Some(prior))],
            },
        ];
        let counts = count_presence_days(&SnapshotSeries::new(snapshots).unwrap());
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].days, 2);
    }

    #[test]
    fn presence_days_over_no_captures_is_empty() {
        let series = SnapshotSeries::new(vec![]).unwrap();
        assert!(count_presence_days(&series).is_empty());
    }
}
