//! Ranking snapshot directory loading.
//!
//! One `YYYYMMDD.csv` per capture day, header row first, columns
//! `name, code, tradingPrice, priorYtdHigh, priorYtdHighDate, high` mapped
//! by position (the production files carry localized header labels).
//! `priorYtdHighDate` uses `%Y/%m/%d`; a row whose date fails to parse
//! keeps `None` and silently fails the screener's recency filter. Files
//! whose name is not a date are skipped with a warning.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use highlab_core::domain::{ScreeningRow, Snapshot, SnapshotSeries, SeriesError};

#[derive(Debug, Error)]
pub enum SnapshotLoadError {
    #[error("failed to read snapshot directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Ordering(#[from] SeriesError),
}

/// Loads every dated snapshot in `dir`, ascending by capture date.
///
/// Sorting happens on the parsed filename dates: a directory listing has no
/// order to preserve, so this is assembly of the series, not a repair of
/// mis-ordered input.
pub fn load_snapshot_dir(dir: &Path) -> Result<SnapshotSeries, SnapshotLoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| SnapshotLoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut dated_files: Vec<(NaiveDate, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SnapshotLoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem,
            None => continue,
        };
        match NaiveDate::parse_from_str(stem, "%Y%m%d") {
            Ok(date) => dated_files.push((date, path)),
            Err(_) => {
                eprintln!("WARNING: skipping {}: file name is not a date", path.display());
            }
        }
    }
    dated_files.sort_by_key(|(date, _)| *date);

    let mut snapshots = Vec::with_capacity(dated_files.len());
    for (date, path) in dated_files {
        snapshots.push(load_snapshot_file(&path, date)?);
    }
    Ok(SnapshotSeries::new(snapshots)?)
}

fn load_snapshot_file(path: &Path, date: NaiveDate) -> Result<Snapshot, SnapshotLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| SnapshotLoadError::Csv { path: path.to_path_buf(), source })?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record =
            record.map_err(|source| SnapshotLoadError::Csv { path: path.to_path_buf(), source })?;
        match decode_snapshot_row(&record) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        eprintln!("WARNING: dropped {dropped} malformed row(s) in {}", path.display());
    }
    Ok(Snapshot { date, rows })
}

fn decode_snapshot_row(record: &csv::StringRecord) -> Option<ScreeningRow> {
    if record.len() < 6 {
        return None;
    }
    Some(ScreeningRow {
        name: record.get(0)?.trim().to_string(),
        code: record.get(1)?.trim().to_string(),
        trading_price: parse_price(record.get(2)?)?,
        prior_high: parse_price(record.get(3)?)?,
        prior_high_date: NaiveDate::parse_from_str(record.get(4)?.trim(), "%Y/%m/%d").ok(),
        high: parse_price(record.get(5)?)?,
    })
}

/// Prices in the capture files may carry thousands separators.
fn parse_price(value: &str) -> Option<f64> {
    value.trim().replace(',', "").parse::<f64>().ok()
}
