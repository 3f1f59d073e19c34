//! Record decoders — one per source CSV convention.
//!
//! The original data sources disagree on field layout and on whether an
//! adjusted-close column is present. Instead of a series subclass per
//! convention, a single `PriceSeries` is fed by a pluggable `RecordDecoder`
//! selected by configuration. Decoders own field parsing and
//! adjustment-ratio normalization; they never see files, only pre-split
//! string fields.
//!
//! Every decoder requires ascending-by-date input. Ordering is enforced by
//! `PriceSeries::new` downstream, never inferred or repaired here.

mod adjusted_ymd;
mod iso_plain;
mod raw_ymd;

pub use adjusted_ymd::AdjustedYmdDecoder;
pub use iso_plain::IsoPlainDecoder;
pub use raw_ymd::RawYmdDecoder;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceObservation;

/// A single malformed record. Callers drop the row and continue; a decode
/// failure never aborts a series.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("expected {expected} fields, got {got}")]
    FieldCount { expected: usize, got: usize },

    #[error("invalid {field} '{value}'")]
    Field { field: &'static str, value: String },

    #[error("invalid calendar date {year}-{month}-{day}")]
    Date { year: i32, month: u32, day: u32 },
}

/// Decodes one pre-split delimited row into an observation.
///
/// `Ok(None)` marks a structural non-data row (a header line) to skip;
/// `Err` is a malformed data row.
pub trait RecordDecoder: Send + Sync {
    fn name(&self) -> &str;

    fn decode(&self, fields: &[&str]) -> Result<Option<PriceObservation>, DecodeError>;
}

/// Decoder selection, configuration-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderKind {
    /// 9 unlabeled fields `y,m,d,open,high,low,close,volume,adj_close`;
    /// adjustment ratio applied at decode time.
    AdjustedYmd,
    /// Same 9-field layout, fields preserved verbatim (reconciliation and
    /// round-trip export).
    RawYmd,
    /// 6 fields `YYYY-MM-DD,open,high,low,close,volume` with a header row.
    IsoPlain,
}

impl DecoderKind {
    pub fn build(self) -> Box<dyn RecordDecoder> {
        match self {
            DecoderKind::AdjustedYmd => Box::new(AdjustedYmdDecoder),
            DecoderKind::RawYmd => Box::new(RawYmdDecoder),
            DecoderKind::IsoPlain => Box::new(IsoPlainDecoder),
        }
    }
}

impl Default for DecoderKind {
    fn default() -> Self {
        DecoderKind::AdjustedYmd
    }
}

/// Decodes a batch of rows, dropping malformed ones.
///
/// Returns the decoded observations plus the number of rows dropped, so the
/// caller can log the count. Header rows skipped by the decoder are not
/// counted as drops.
pub fn decode_rows<'a, I>(decoder: &dyn RecordDecoder, rows: I) -> (Vec<PriceObservation>, usize)
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    let mut observations = Vec::new();
    let mut dropped = 0usize;
    for fields in rows {
        match decoder.decode(&fields) {
            Ok(Some(obs)) => observations.push(obs),
            Ok(None) => {}
            Err(_) => dropped += 1,
        }
    }
    (observations, dropped)
}

pub(crate) fn parse_f64(field: &'static str, value: &str) -> Result<f64, DecodeError> {
    value.trim().parse::<f64>().map_err(|_| DecodeError::Field {
        field,
        value: value.to_string(),
    })
}

pub(crate) fn parse_ymd(
    year: &str,
    month: &str,
    day: &str,
) -> Result<chrono::NaiveDate, DecodeError> {
    let y = year.trim().parse::<i32>().map_err(|_| DecodeError::Field {
        field: "year",
        value: year.to_string(),
    })?;
    let m = month.trim().parse::<u32>().map_err(|_| DecodeError::Field {
        field: "month",
        value: month.to_string(),
    })?;
    let d = day.trim().parse::<u32>().map_err(|_| DecodeError::Field {
        field: "day",
        value: day.to_string(),
    })?;
    chrono::NaiveDate::from_ymd_opt(y, m, d).ok_or(DecodeError::Date {
        year: y,
        month: m,
        day: d,
    })
}
