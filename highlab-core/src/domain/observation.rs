//! PriceObservation — one security's OHLCV record for a single day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Decoded OHLCV observation for one trading day.
///
/// When decoded from an adjusted source, open/high/low/close carry the
/// adjustment ratio (`adj_close / close`) and volume its inverse; volume is
/// therefore `f64`, not an integer. `adj_close` is kept as decoded so a
/// raw-shaped record can round-trip back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub adj_close: f64,
}

impl PriceObservation {
    /// Basic OHLCV sanity check: high >= low, open/close inside the range,
    /// strictly positive prices.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// Exact equality on every non-date field.
    ///
    /// Reconciliation compares boundary rows with this: both sides decode
    /// from the same textual format, so equal text yields bit-equal floats.
    pub fn same_quotes(&self, other: &PriceObservation) -> bool {
        self.open == other.open
            && self.high == other.high
            && self.low == other.low
            && self.close == other.close
            && self.volume == other.volume
            && self.adj_close == other.adj_close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PriceObservation {
        PriceObservation {
            date: NaiveDate::from_ymd_opt(2020, 4, 8).unwrap(),
            open: 2556.0,
            high: 2631.0,
            low: 2532.0,
            close: 2597.0,
            volume: 40_500.0,
            adj_close: 2597.0,
        }
    }

    #[test]
    fn observation_is_sane() {
        assert!(sample().is_sane());
    }

    #[test]
    fn detects_insane_high_low() {
        let mut obs = sample();
        obs.high = 2500.0; // below low
        assert!(!obs.is_sane());
    }

    #[test]
    fn same_quotes_ignores_date() {
        let a = sample();
        let mut b = sample();
        b.date = NaiveDate::from_ymd_opt(2020, 4, 9).unwrap();
        assert!(a.same_quotes(&b));
        b.close += 1.0;
        assert!(!a.same_quotes(&b));
    }

    #[test]
    fn serialization_roundtrip() {
        let obs = sample();
        let json = serde_json::to_string(&obs).unwrap();
        let deser: PriceObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(obs, deser);
    }
}
