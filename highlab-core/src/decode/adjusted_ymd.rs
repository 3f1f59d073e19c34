//! Adjusted 9-field decoder — split/dividend normalization at decode time.

use super::{parse_f64, parse_ymd, DecodeError, RecordDecoder};
use crate::domain::PriceObservation;

/// Decodes `year,month,day,open,high,low,close,volume,adj_close` and applies
/// the adjustment ratio `adj_close / close` to every price, its inverse to
/// volume. All downstream analysis sees split-consistent prices.
#[derive(Debug, Clone, Copy)]
pub struct AdjustedYmdDecoder;

impl RecordDecoder for AdjustedYmdDecoder {
    fn name(&self) -> &str {
        "adjusted_ymd"
    }

    fn decode(&self, fields: &[&str]) -> Result<Option<PriceObservation>, DecodeError> {
        if fields.len() != 9 {
            return Err(DecodeError::FieldCount { expected: 9, got: fields.len() });
        }
        let date = parse_ymd(fields[0], fields[1], fields[2])?;
        let open = parse_f64("open", fields[3])?;
        let high = parse_f64("high", fields[4])?;
        let low = parse_f64("low", fields[5])?;
        let close = parse_f64("close", fields[6])?;
        let volume = parse_f64("volume", fields[7])?;
        let adj_close = parse_f64("adj_close", fields[8])?;

        if close <= 0.0 {
            return Err(DecodeError::Field { field: "close", value: fields[6].to_string() });
        }
        let ratio = adj_close / close;
        Ok(Some(PriceObservation {
            date,
            open: open * ratio,
            high: high * ratio,
            low: low * ratio,
            close: close * ratio,
            volume: volume / ratio,
            adj_close,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn applies_adjustment_ratio() {
        let fields = ["2020", "4", "8", "2556", "2631", "2532", "2597", "40500", "1298.5"];
        let obs = AdjustedYmdDecoder.decode(&fields).unwrap().unwrap();
        // ratio = 1298.5 / 2597 = 0.5
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2020, 4, 8).unwrap());
        assert!((obs.open - 1278.0).abs() < 1e-9);
        assert!((obs.close - 1298.5).abs() < 1e-9);
        assert!((obs.volume - 81_000.0).abs() < 1e-9);
        assert_eq!(obs.adj_close, 1298.5);
    }

    #[test]
    fn unadjusted_row_passes_through() {
        let fields = ["2020", "4", "8", "2556", "2631", "2532", "2597", "40500", "2597"];
        let obs = AdjustedYmdDecoder.decode(&fields).unwrap().unwrap();
        assert_eq!(obs.open, 2556.0);
        assert_eq!(obs.volume, 40_500.0);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = AdjustedYmdDecoder.decode(&["2020", "4", "8"]).unwrap_err();
        assert!(matches!(err, DecodeError::FieldCount { expected: 9, got: 3 }));
    }

    #[test]
    fn rejects_impossible_date() {
        let fields = ["2020", "2", "30", "1", "1", "1", "1", "1", "1"];
        let err = AdjustedYmdDecoder.decode(&fields).unwrap_err();
        assert!(matches!(err, DecodeError::Date { month: 2, day: 30, .. }));
    }

    #[test]
    fn rejects_zero_close() {
        let fields = ["2020", "4", "8", "1", "1", "1", "0", "100", "1"];
        assert!(AdjustedYmdDecoder.decode(&fields).is_err());
    }
}
