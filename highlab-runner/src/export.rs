//! Artifact export (CSV/JSON).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;

use highlab_core::annotate::AnnotatedSeries;
use highlab_core::domain::{PresenceCount, PriceSeries, ScreeningResult, TradeEvent};
use highlab_core::extremes::ExtremeDateTally;

pub fn write_trades_csv(path: &Path, trades: &[TradeEvent]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create trade log {}", path.display()))?;

    writeln!(file, "entry_date,entry_price,exit_date,exit_price")?;
    for trade in trades {
        writeln!(
            file,
            "{},{},{},{}",
            trade.entry_date, trade.entry_price, trade.exit_date, trade.exit_price
        )?;
    }
    Ok(())
}

pub fn write_trades_json(path: &Path, trades: &[TradeEvent]) -> Result<()> {
    let json = serde_json::to_string_pretty(trades).context("Failed to serialize trades")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write trade log JSON {}", path.display()))?;
    Ok(())
}

pub fn write_screening_csv(path: &Path, results: &[ScreeningResult]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create screening results {}", path.display()))?;

    writeln!(file, "code,name,reference_date")?;
    for result in results {
        writeln!(file, "{},{},{}", result.code, result.name, result.reference_date)?;
    }
    Ok(())
}

pub fn write_screening_json(path: &Path, results: &[ScreeningResult]) -> Result<()> {
    let json =
        serde_json::to_string_pretty(results).context("Failed to serialize screening results")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write screening JSON {}", path.display()))?;
    Ok(())
}

pub fn write_presence_csv(path: &Path, counts: &[PresenceCount]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create presence report {}", path.display()))?;

    writeln!(file, "code,name,days")?;
    for count in counts {
        writeln!(file, "{},{},{}", count.code, count.name, count.days)?;
    }
    Ok(())
}

pub fn write_tally_csv(path: &Path, tallies: &[ExtremeDateTally]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create extreme-date tally {}", path.display()))?;

    writeln!(file, "date,max_count,min_count")?;
    for tally in tallies {
        writeln!(file, "{},{},{}", tally.date, tally.max_count, tally.min_count)?;
    }
    Ok(())
}

/// One code per row, no header: the shape the re-acquisition tooling
/// consumes.
pub fn write_retry_list(path: &Path, codes: &[String]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create retry list {}", path.display()))?;
    for code in codes {
        writeln!(file, "{code}")?;
    }
    Ok(())
}

/// Writes a series back out in the 9-field input shape
/// (`y,m,d,open,high,low,close,volume,adj_close`, no header).
pub fn write_series_csv(path: &Path, series: &PriceSeries) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create series file {}", path.display()))?;

    for obs in series.observations() {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{}",
            obs.date.year(),
            obs.date.month(),
            obs.date.day(),
            obs.open,
            obs.high,
            obs.low,
            obs.close,
            obs.volume,
            obs.adj_close
        )?;
    }
    Ok(())
}

/// Writes an annotated series as `date,open,high,low,close,volume,window_max`.
/// Incomplete rows carry `-1` in the window column, the sentinel the
/// original artifact files used.
pub fn write_annotated_csv(path: &Path, annotated: &AnnotatedSeries) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create annotated series {}", path.display()))?;

    writeln!(file, "date,open,high,low,close,volume,window_max")?;
    for (obs, annotation) in annotated.iter() {
        let window = if annotation.complete {
            annotation.window_max.to_string()
        } else {
            "-1".to_string()
        };
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            obs.date, obs.open, obs.high, obs.low, obs.close, obs.volume, window
        )?;
    }
    Ok(())
}
