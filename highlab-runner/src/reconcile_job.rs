//! The join job: reconcile two source directories into one.
//!
//! For every code with a file in the pre directory, load both batches with
//! the raw decoder, merge, and write the canonical file to the destination.
//! Codes whose batches conflict land in the retry list; codes with a
//! missing or empty side are skipped with a warning. Per-code work is
//! independent and runs in parallel.

use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;

use highlab_core::decode::DecoderKind;
use highlab_core::reconcile::{merge, MergeFailure};

use crate::data_loader::{list_codes, load_series, LoadError};
use crate::export::{write_retry_list, write_series_csv};

/// What happened to each code, in sorted code order.
#[derive(Debug, Default)]
pub struct JoinSummary {
    pub merged: Vec<String>,
    pub retry: Vec<String>,
    pub skipped: Vec<String>,
}

enum Outcome {
    Merged(String),
    Retry(String),
    Skipped(String),
}

/// Runs the join across `pre_dir` and `post_dir`, writing merged files and
/// `retrycode.csv` into `dest_dir`.
pub fn run_join(pre_dir: &Path, post_dir: &Path, dest_dir: &Path) -> Result<JoinSummary> {
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create destination {}", dest_dir.display()))?;

    let codes = list_codes(pre_dir)
        .with_context(|| format!("Failed to list codes in {}", pre_dir.display()))?;

    let outcomes: Result<Vec<Outcome>> = codes
        .par_iter()
        .map(|code| join_one(code, pre_dir, post_dir, dest_dir))
        .collect();

    let mut summary = JoinSummary::default();
    for outcome in outcomes? {
        match outcome {
            Outcome::Merged(code) => summary.merged.push(code),
            Outcome::Retry(code) => summary.retry.push(code),
            Outcome::Skipped(code) => summary.skipped.push(code),
        }
    }

    write_retry_list(&dest_dir.join("retrycode.csv"), &summary.retry)?;
    Ok(summary)
}

fn join_one(code: &str, pre_dir: &Path, post_dir: &Path, dest_dir: &Path) -> Result<Outcome> {
    let pre = match load_series(pre_dir, code, DecoderKind::RawYmd) {
        Ok(loaded) => loaded.series,
        Err(LoadError::Missing { .. }) => {
            eprintln!("WARNING: skipping '{code}': no pre batch");
            return Ok(Outcome::Skipped(code.to_string()));
        }
        Err(err) => return Err(err).context("loading pre batch"),
    };
    let post = match load_series(post_dir, code, DecoderKind::RawYmd) {
        Ok(loaded) => loaded.series,
        Err(LoadError::Missing { .. }) => {
            eprintln!("WARNING: skipping '{code}': no post batch");
            return Ok(Outcome::Skipped(code.to_string()));
        }
        Err(err) => return Err(err).context("loading post batch"),
    };
    if pre.is_empty() || post.is_empty() {
        eprintln!("WARNING: skipping '{code}': empty batch");
        return Ok(Outcome::Skipped(code.to_string()));
    }

    match merge(&pre, &post) {
        Ok(merged) => {
            write_series_csv(&dest_dir.join(format!("{code}.csv")), &merged)?;
            Ok(Outcome::Merged(code.to_string()))
        }
        Err(MergeFailure::OverlapMismatch { .. }) | Err(MergeFailure::BoundaryGap { .. }) => {
            Ok(Outcome::Retry(code.to_string()))
        }
        // CodeMismatch/EmptyBatch cannot arise here (same stem, emptiness
        // checked above); surface them loudly if they ever do.
        Err(err) => Err(err).context("merging batches"),
    }
}
