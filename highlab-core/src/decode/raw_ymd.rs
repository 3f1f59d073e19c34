//! Raw 9-field decoder — fields preserved verbatim.

use super::{parse_f64, parse_ymd, DecodeError, RecordDecoder};
use crate::domain::PriceObservation;

/// Decodes the same `year,month,day,open,high,low,close,volume,adj_close`
/// layout as `AdjustedYmdDecoder` without applying the adjustment ratio.
/// Reconciliation uses this so boundary rows compare and round-trip exactly
/// as they arrived.
#[derive(Debug, Clone, Copy)]
pub struct RawYmdDecoder;

impl RecordDecoder for RawYmdDecoder {
    fn name(&self) -> &str {
        "raw_ymd"
    }

    fn decode(&self, fields: &[&str]) -> Result<Option<PriceObservation>, DecodeError> {
        if fields.len() != 9 {
            return Err(DecodeError::FieldCount { expected: 9, got: fields.len() });
        }
        Ok(Some(PriceObservation {
            date: parse_ymd(fields[0], fields[1], fields[2])?,
            open: parse_f64("open", fields[3])?,
            high: parse_f64("high", fields[4])?,
            low: parse_f64("low", fields[5])?,
            close: parse_f64("close", fields[6])?,
            volume: parse_f64("volume", fields[7])?,
            adj_close: parse_f64("adj_close", fields[8])?,
        }))
    }
}
