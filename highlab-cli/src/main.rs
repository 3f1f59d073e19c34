//! HighLab CLI — annotate, backtest, join, and screen commands.
//!
//! Commands:
//! - `annotate` — annotate one security with forward-window maxima
//! - `backtest` — annotate and replay the breakout rule, printing the trade log
//! - `join` — reconcile two history directories into a canonical one
//! - `screen` — run the presence screen over a snapshot directory
//! - `presence` — count appearance days for the latest capture's codes
//! - `extremes` — tally the dates holding each security's range extremes
//!
//! A TOML config file (`--config`) supplies defaults; explicit flags win.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use highlab_core::annotate::SlidingWindowAnnotator;
use highlab_core::extremes::tally_extreme_dates;
use highlab_core::screen::{count_presence_days, PresenceScreener};
use highlab_core::simulate::BreakoutSimulator;
use highlab_runner::export::{
    write_annotated_csv, write_presence_csv, write_screening_csv, write_tally_csv,
    write_trades_csv,
};
use highlab_runner::{
    list_codes, load_series, load_series_batch, load_snapshot_dir, run_join, RunnerConfig,
};

#[derive(Parser)]
#[command(name = "highlab", about = "HighLab CLI — new-high series analysis and screening")]
struct Cli {
    /// Path to a TOML config file with parameter defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate one security with forward-window maxima.
    Annotate {
        /// Security code (file stem under the data directory).
        #[arg(long)]
        code: String,

        /// Directory of per-security price files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Window span in calendar days. Defaults to the config value.
        #[arg(long)]
        span: Option<i64>,

        /// Output CSV. Defaults to annotated-<code>.csv.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Annotate and simulate the breakout rule, printing the trade log.
    Backtest {
        /// Security code (file stem under the data directory).
        #[arg(long)]
        code: String,

        /// Directory of per-security price files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Window span in calendar days. Defaults to the config value.
        #[arg(long)]
        span: Option<i64>,

        /// Holding period in calendar days. Defaults to the config value.
        #[arg(long)]
        hold: Option<i64>,

        /// Optional trade log CSV output.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Reconcile two time-adjacent history directories.
    Join {
        /// Directory of the earlier batch.
        #[arg(long)]
        pre: PathBuf,

        /// Directory of the later batch.
        #[arg(long)]
        post: PathBuf,

        /// Destination for merged files and the retry list.
        #[arg(long)]
        dest: PathBuf,
    },
    /// Screen a snapshot directory by recency-of-high and persistence.
    Screen {
        /// Directory of YYYYMMDD.csv ranking captures.
        #[arg(long)]
        snapshot_dir: PathBuf,

        /// Trailing snapshot count. Defaults to the config value.
        #[arg(long)]
        period: Option<usize>,

        /// Minimum age of the prior high, in days.
        #[arg(long)]
        past_high_threshold: Option<i64>,

        /// Minimum appearances across the trailing window.
        #[arg(long)]
        min_appearance: Option<usize>,

        /// Optional results CSV output.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Count, for the latest capture's codes, their appearance days across
    /// every capture.
    Presence {
        /// Directory of YYYYMMDD.csv ranking captures.
        #[arg(long)]
        snapshot_dir: PathBuf,

        /// Optional report CSV output.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Tally the dates on which securities peaked and bottomed.
    Extremes {
        /// Directory of per-security price files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Range start (YYYY-MM-DD), inclusive.
        #[arg(long)]
        start: NaiveDate,

        /// Range end (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: NaiveDate,

        /// Optional tally CSV output.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RunnerConfig::from_path(path)?,
        None => RunnerConfig::default(),
    };

    match cli.command {
        Commands::Annotate { code, data_dir, span, out } => {
            let span = span.unwrap_or(config.annotate.span_days);
            let annotator = SlidingWindowAnnotator::new(span)?;
            let loaded = load_series(&data_dir, &code, config.data.decoder)
                .with_context(|| format!("loading series for '{code}'"))?;
            let annotated = annotator.annotate(loaded.series);

            let out = out.unwrap_or_else(|| PathBuf::from(format!("annotated-{code}.csv")));
            write_annotated_csv(&out, &annotated)?;
            println!("annotated {} rows -> {}", annotated.len(), out.display());
        }
        Commands::Backtest { code, data_dir, span, hold, out } => {
            let span = span.unwrap_or(config.annotate.span_days);
            let hold = hold.unwrap_or(config.trade.hold_days);
            let annotator = SlidingWindowAnnotator::new(span)?;
            let simulator = BreakoutSimulator::new(hold)?;
            let loaded = load_series(&data_dir, &code, config.data.decoder)
                .with_context(|| format!("loading series for '{code}'"))?;
            let annotated = annotator.annotate(loaded.series);
            let trades = simulator.simulate(&annotated);

            for trade in &trades {
                println!(
                    "{} {} {} {}",
                    trade.entry_date, trade.entry_price, trade.exit_date, trade.exit_price
                );
            }
            println!("{} trade(s)", trades.len());
            if let Some(out) = out {
                write_trades_csv(&out, &trades)?;
                println!("trade log -> {}", out.display());
            }
        }
        Commands::Join { pre, post, dest } => {
            let summary = run_join(&pre, &post, &dest)?;
            println!(
                "merged {} code(s), {} for retry, {} skipped",
                summary.merged.len(),
                summary.retry.len(),
                summary.skipped.len()
            );
        }
        Commands::Screen { snapshot_dir, period, past_high_threshold, min_appearance, out } => {
            let screener = PresenceScreener::new(
                period.unwrap_or(config.screen.period),
                past_high_threshold.unwrap_or(config.screen.past_high_threshold_days),
                min_appearance.unwrap_or(config.screen.min_appearance),
            )?;
            let snapshots = load_snapshot_dir(&snapshot_dir)
                .with_context(|| format!("loading snapshots from {}", snapshot_dir.display()))?;
            let results = screener.screen(&snapshots)?;

            for result in &results {
                println!("{} {} {}", result.code, result.name, result.reference_date);
            }
            println!("{} code(s) passed", results.len());
            if let Some(out) = out {
                write_screening_csv(&out, &results)?;
                println!("results -> {}", out.display());
            }
        }
        Commands::Presence { snapshot_dir, out } => {
            let snapshots = load_snapshot_dir(&snapshot_dir)
                .with_context(|| format!("loading snapshots from {}", snapshot_dir.display()))?;
            let counts = count_presence_days(&snapshots);

            for count in &counts {
                println!("{} {} {}", count.code, count.name, count.days);
            }
            println!("{} code(s) on the latest capture", counts.len());
            if let Some(out) = out {
                write_presence_csv(&out, &counts)?;
                println!("report -> {}", out.display());
            }
        }
        Commands::Extremes { data_dir, start, end, out } => {
            let codes = list_codes(&data_dir)
                .with_context(|| format!("listing codes in {}", data_dir.display()))?;
            let loaded = load_series_batch(&data_dir, &codes, config.data.decoder)?;
            let series: Vec<_> = loaded.into_iter().map(|l| l.series).collect();
            let tallies = tally_extreme_dates(&series, start, end)?;

            for tally in &tallies {
                println!("{} {} {}", tally.date, tally.max_count, tally.min_count);
            }
            println!("{} date(s) held an extreme", tallies.len());
            if let Some(out) = out {
                write_tally_csv(&out, &tallies)?;
                println!("tally -> {}", out.display());
            }
        }
    }

    Ok(())
}
