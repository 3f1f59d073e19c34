//! Plain 6-field decoder — ISO dates, header row, no adjusted close.

use super::{parse_f64, DecodeError, RecordDecoder};
use crate::domain::PriceObservation;

/// Decodes `YYYY-MM-DD,open,high,low,close,volume`. The source files carry a
/// `Date,...` header row, skipped as a non-data row. No adjusted-close
/// column exists; `adj_close` is set to the close so the record shape stays
/// uniform.
#[derive(Debug, Clone, Copy)]
pub struct IsoPlainDecoder;

impl RecordDecoder for IsoPlainDecoder {
    fn name(&self) -> &str {
        "iso_plain"
    }

    fn decode(&self, fields: &[&str]) -> Result<Option<PriceObservation>, DecodeError> {
        if fields.first().map(|f| f.trim()) == Some("Date") {
            return Ok(None);
        }
        if fields.len() != 6 {
            return Err(DecodeError::FieldCount { expected: 6, got: fields.len() });
        }
        let date = chrono::NaiveDate::parse_from_str(fields[0].trim(), "%Y-%m-%d").map_err(|_| {
            DecodeError::Field { field: "date", value: fields[0].to_string() }
        })?;
        let close = parse_f64("close", fields[4])?;
        Ok(Some(PriceObservation {
            date,
            open: parse_f64("open", fields[1])?,
            high: parse_f64("high", fields[2])?,
            low: parse_f64("low", fields[3])?,
            close,
            volume: parse_f64("volume", fields[5])?,
            adj_close: close,
        }))
    }
}
