//! Per-security price file loading.
//!
//! One `<code>.csv` per security. Malformed rows are dropped and counted;
//! a missing file is `LoadError::Missing`, which the batch API downgrades
//! to skip-and-log so one absent security never sinks the run. An ordering
//! violation is an upstream contract breach and always propagates.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;

use highlab_core::decode::{decode_rows, DecoderKind};
use highlab_core::domain::{PriceSeries, SeriesError};

/// Errors from the price loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no price file for '{code}' at {}", path.display())]
    Missing { code: String, path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
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

/// A decoded series plus how many malformed rows were dropped on the way.
#[derive(Debug)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    pub dropped_rows: usize,
}

/// Loads and decodes one security's file from `dir`.
pub fn load_series(dir: &Path, code: &str, decoder: DecoderKind) -> Result<LoadedSeries, LoadError> {
    let path = dir.join(format!("{code}.csv"));
    if !path.exists() {
        return Err(LoadError::Missing { code: code.to_string(), path });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .map_err(|source| LoadError::Csv { path: path.clone(), source })?;

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record.map_err(|source| LoadError::Csv { path: path.clone(), source })?);
    }

    let decoder = decoder.build();
    let (observations, dropped_rows) = decode_rows(
        decoder.as_ref(),
        records.iter().map(|record| record.iter().collect::<Vec<&str>>()),
    );
    if dropped_rows > 0 {
        eprintln!(
            "WARNING: dropped {dropped_rows} malformed row(s) in {}",
            path.display()
        );
    }

    let series = PriceSeries::new(code, observations)?;
    Ok(LoadedSeries { series, dropped_rows })
}

/// Loads many securities in parallel.
///
/// Missing files are skipped with a warning; any other failure aborts the
/// batch. Results come back in the input code order.
pub fn load_series_batch(
    dir: &Path,
    codes: &[String],
    decoder: DecoderKind,
) -> Result<Vec<LoadedSeries>, LoadError> {
    let loaded: Result<Vec<Option<LoadedSeries>>, LoadError> = codes
        .par_iter()
        .map(|code| match load_series(dir, code, decoder) {
            Ok(loaded) => Ok(Some(loaded)),
            Err(LoadError::Missing { code, .. }) => {
                eprintln!("WARNING: skipping '{code}': no price file");
                Ok(None)
            }
            Err(err) => Err(err),
        })
        .collect();
    Ok(loaded?.into_iter().flatten().collect())
}

/// Security codes present in a data directory: the `.csv` file stems,
/// sorted for deterministic traversal.
pub fn list_codes(dir: &Path) -> Result<Vec<String>, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut codes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                codes.push(stem.to_string());
            }
        }
    }
    codes.sort();
    Ok(codes)
}
