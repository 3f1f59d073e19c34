//! Reconciliation of two time-adjacent history batches for one security.
//!
//! `pre` covers the older range and ends at the boundary date; `post`
//! begins at it. A merge succeeds only when the boundary rows agree on
//! every non-date field; anything else routes the code to the retry set so
//! the caller can re-acquire. Inputs are never mutated — a successful merge
//! allocates a new series.

use thiserror::Error;

use crate::domain::{PriceSeries, SeriesError};

/// Why a pair of batches could not be merged. All variants route the code
/// to the retry set; none is a crash.
#[derive(Debug, Error)]
pub enum MergeFailure {
    /// Boundary rows share a date but disagree on at least one field. The
    /// upstream source revised its history; both batches need re-fetching.
    #[error("code '{code}': overlap row at {date} differs between batches")]
    OverlapMismatch { code: String, date: chrono::NaiveDate },

    /// The batches do not meet at a shared boundary date — either a gap
    /// between the ranges or an overlap deeper than one row. A gap is
    /// indistinguishable from rows lost in acquisition, so the code goes to
    /// the retry set rather than being silently concatenated.
    #[error("code '{code}': batches do not share a boundary date (pre ends {pre_end}, post starts {post_start})")]
    BoundaryGap {
        code: String,
        pre_end: chrono::NaiveDate,
        post_start: chrono::NaiveDate,
    },

    /// The two inputs are not the same security. Caller bug, not a data
    /// conflict.
    #[error("code mismatch: pre is '{pre}', post is '{post}'")]
    CodeMismatch { pre: String, post: String },

    /// One side is empty. Callers normally treat an empty batch as missing
    /// input and skip the code before reaching the merge.
    #[error("code '{code}': {side} batch is empty")]
    EmptyBatch { code: String, side: &'static str },
}

/// Merges two time-adjacent batches into one canonical ascending series.
///
/// On success the result holds exactly `pre.len() + post.len() - 1`
/// observations: the shared boundary row is kept once, from `pre`.
pub fn merge(pre: &PriceSeries, post: &PriceSeries) -> Result<PriceSeries, MergeFailure> {
    if pre.code() != post.code() {
        return Err(MergeFailure::CodeMismatch {
            pre: pre.code().to_string(),
            post: post.code().to_string(),
        });
    }
    let code = pre.code().to_string();
    let pre_end = pre.last().ok_or(MergeFailure::EmptyBatch {
        code: code.clone(),
        side: "pre",
    })?;
    let post_start = post.first().ok_or(MergeFailure::EmptyBatch {
        code: code.clone(),
        side: "post",
    })?;

    if pre_end.date != post_start.date {
        return Err(MergeFailure::BoundaryGap {
            code,
            pre_end: pre_end.date,
            post_start: post_start.date,
        });
    }
    if !pre_end.same_quotes(post_start) {
        return Err(MergeFailure::OverlapMismatch { code, date: pre_end.date });
    }

    let mut merged = Vec::with_capacity(pre.len() + post.len() - 1);
    merged.extend_from_slice(pre.observations());
    merged.extend_from_slice(&post.observations()[1..]);
    // Both inputs are ascending and meet at the boundary, so the
    // constructor's ordering check cannot fail; propagate it anyway rather
    // than panic.
    PriceSeries::new(code.clone(), merged).map_err(|err| match err {
        SeriesError::OrderingViolation { .. } => MergeFailure::BoundaryGap {
            code,
            pre_end: pre_end.date,
            post_start: post_start.date,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceObservation;
    use chrono::NaiveDate;

    fn obs(day: u32, close: f64) -> PriceObservation {
        PriceObservation {
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000.0,
            adj_close: close,
        }
    }

    fn series(code: &str, days: &[(u32, f64)]) -> PriceSeries {
        PriceSeries::new(code, days.iter().map(|&(d, c)| obs(d, c)).collect()).unwrap()
    }

    #[test]
    fn matching_boundary_merges_to_m_plus_n_minus_1() {
        let pre = series("7203", &[(1, 100.0), (2, 101.0), (5, 102.0)]);
        let post = series("7203", &[(5, 102.0), (6, 103.0)]);
        let merged = merge(&pre, &post).unwrap();
        assert_eq!(merged.len(), 4);
        let dates: Vec<u32> = merged
            .observations()
            .iter()
            .map(|o| chrono::Datelike::day(&o.date))
            .collect();
        assert_eq!(dates, vec![1, 2, 5, 6]);
    }

    #[test]
    fn merge_does_not_mutate_inputs() {
        let pre = series("7203", &[(1, 100.0), (5, 102.0)]);
        let post = series("7203", &[(5, 102.0), (6, 103.0)]);
        let _ = merge(&pre, &post).unwrap();
        assert_eq!(pre.len(), 2);
        assert_eq!(post.len(), 2);
    }

    #[test]
    fn conflicting_boundary_is_an_overlap_mismatch() {
        let pre = series("7203", &[(1, 100.0), (5, 102.0)]);
        let post = series("7203", &[(5, 999.0), (6, 103.0)]);
        let err = merge(&pre, &post).unwrap_err();
        assert!(matches!(err, MergeFailure::OverlapMismatch { .. }));
    }

    #[test]
    fn disjoint_ranges_are_a_boundary_gap() {
        let pre = series("7203", &[(1, 100.0), (2, 101.0)]);
        let post = series("7203", &[(6, 103.0), (7, 104.0)]);
        let err = merge(&pre, &post).unwrap_err();
        assert!(matches!(err, MergeFailure::BoundaryGap { .. }));
    }

    #[test]
    fn deep_overlap_is_a_boundary_gap() {
        let pre = series("7203", &[(1, 100.0), (5, 102.0), (6, 103.0)]);
        let post = series("7203", &[(5, 102.0), (6, 103.0), (7, 104.0)]);
        let err = merge(&pre, &post).unwrap_err();
        assert!(matches!(err, MergeFailure::BoundaryGap { .. }));
    }

    #[test]
    fn different_codes_are_rejected() {
        let pre = series("7203", &[(1, 100.0)]);
        let post = series("6758", &[(1, 100.0)]);
        assert!(matches!(merge(&pre, &post), Err(MergeFailure::CodeMismatch { .. })));
    }

    #[test]
    fn empty_batch_is_reported() {
        let pre = PriceSeries::new("7203", vec![]).unwrap();
        let post = series("7203", &[(1, 100.0)]);
        assert!(matches!(
            merge(&pre, &post),
            Err(MergeFailure::EmptyBatch { side: "pre", .. })
        ));
    }
}
