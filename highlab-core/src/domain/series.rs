//! PriceSeries — one security's ordered price history.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::observation::PriceObservation;

/// Errors raised when constructing a series from decoded observations.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// Input rows are not strictly ascending by date. This signals an
    /// upstream contract breach; the series is never silently re-sorted.
    #[error("series '{code}' is not strictly ascending by date at row {index} ({prev} then {next})")]
    OrderingViolation {
        code: String,
        index: usize,
        prev: chrono::NaiveDate,
        next: chrono::NaiveDate,
    },
}

/// Ordered-by-date price history for one security code.
///
/// Invariant: dates strictly increasing (ascending canonical order), no
/// duplicates. The constructor fails fast on any violation. An empty series
/// is structurally valid; consumers treat it as missing input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    code: String,
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    pub fn new(
        code: impl Into<String>,
        observations: Vec<PriceObservation>,
    ) -> Result<Self, SeriesError> {
        let code = code.into();
        for (i, pair) in observations.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::OrderingViolation {
                    code,
                    index: i + 1,
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { code, observations })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> Option<&PriceObservation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&PriceObservation> {
        self.observations.last()
    }

    /// Consumes the series, returning the observation vector.
    pub fn into_observations(self) -> Vec<PriceObservation> {
        self.observations
    }
}
