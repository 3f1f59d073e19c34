//! HighLab Runner — file orchestration around the core.
//!
//! Loads per-security price files and per-date snapshot files (parallel
//! across independent files), drives the reconciliation job over two source
//! directories, and writes the CSV/JSON artifacts. All policy lives in
//! `highlab-core`; this crate only moves bytes and reports skips.

pub mod config;
pub mod data_loader;
pub mod export;
pub mod reconcile_job;
pub mod snapshot_loader;

pub use config::RunnerConfig;
pub use data_loader::{list_codes, load_series, load_series_batch, LoadError, LoadedSeries};
pub use reconcile_job::{run_join, JoinSummary};
pub use snapshot_loader::{load_snapshot_dir, SnapshotLoadError};
