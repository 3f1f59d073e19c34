//! Forward-window maximum annotation.
//!
//! For every observation, the maximum close among strictly later
//! observations within `span` calendar days. A single reverse traversal
//! maintains a monotonic deque of `(date, close)` candidates: each
//! observation enters once and leaves once, so the sweep is O(n) amortized.

use std::collections::VecDeque;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PriceObservation, PriceSeries};

/// Default window span: 52 weeks of calendar days.
pub const DEFAULT_SPAN_DAYS: i64 = 364;

/// Rejected annotator parameter.
#[derive(Debug, Error)]
#[error("window span must be at least 1 day, got {days}")]
pub struct InvalidSpan {
    pub days: i64,
}

/// Per-observation annotation.
///
/// `window_max` is the true forward-window maximum (the observation's own
/// close when no later observation falls inside the span). `complete` is
/// false when fewer than `span` days of future data existed — the
/// insufficient-trailing-data sentinel the simulator skips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowAnnotation {
    pub window_max: f64,
    pub complete: bool,
}

/// A price series plus its parallel annotation vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedSeries {
    series: PriceSeries,
    annotations: Vec<WindowAnnotation>,
}

impl AnnotatedSeries {
    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn annotations(&self) -> &[WindowAnnotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Observations zipped with their annotations, in date order.
    pub fn iter(&self) -> impl Iterator<Item = (&PriceObservation, &WindowAnnotation)> {
        self.series.observations().iter().zip(self.annotations.iter())
    }
}

/// Annotates a series with forward-window maxima.
#[derive(Debug, Clone, Copy)]
pub struct SlidingWindowAnnotator {
    span: Duration,
}

impl Default for SlidingWindowAnnotator {
    fn default() -> Self {
        Self { span: Duration::days(DEFAULT_SPAN_DAYS) }
    }
}

impl SlidingWindowAnnotator {
    pub fn new(span_days: i64) -> Result<Self, InvalidSpan> {
        if span_days < 1 {
            return Err(InvalidSpan { days: span_days });
        }
        Ok(Self { span: Duration::days(span_days) })
    }

    pub fn span_days(&self) -> i64 {
        self.span.num_days()
    }

    /// Annotates every observation. Pure: annotating twice yields identical
    /// results.
    ///
    /// Traverses newest to oldest. The deque holds visited (strictly later)
    /// observations still inside the span, closes strictly increasing from
    /// the just-inserted end to the expiring end, so the expiring end is
    /// always the window maximum. A new observation outlives every held
    /// candidate, which is what makes popping dominated closes sound.
    pub fn annotate(&self, series: PriceSeries) -> AnnotatedSeries {
        let obs = series.observations();
        let n = obs.len();
        let mut annotations = vec![WindowAnnotation { window_max: f64::NAN, complete: false }; n];

        if n == 0 {
            return AnnotatedSeries { series, annotations };
        }

        let last_date = obs[n - 1].date;
        // Front: most recently inserted (earliest date, expires last).
        // Back: latest date, expires first; holds the maximum close.
        let mut candidates: VecDeque<(chrono::NaiveDate, f64)> = VecDeque::new();

        for i in (0..n).rev() {
            let current = &obs[i];

            // Expire candidates no longer within span of this observation.
            while let Some(&(date, _)) = candidates.back() {
                if date - current.date >= self.span {
                    candidates.pop_back();
                } else {
                    break;
                }
            }

            let window_max = match candidates.back() {
                Some(&(_, close)) => close,
                // Empty window (most recent observation, or a calendar gap
                // wider than the span): seeded with the own close.
                None => current.close,
            };
            annotations[i] = WindowAnnotation {
                window_max,
                complete: last_date - current.date >= self.span,
            };

            // Insert, dropping candidates this close dominates.
            while let Some(&(_, close)) = candidates.front() {
                if close <= current.close {
                    candidates.pop_front();
                } else {
                    break;
                }
            }
            candidates.push_front((current.date, current.close));
        }

        AnnotatedSeries { series, annotations }
    }
}
