//! HighLab Core — new-high analysis over daily price series and ranking snapshots.
//!
//! This crate contains the pure, CPU-bound heart of the system:
//! - Domain types (observations, series, trades, snapshots)
//! - Pluggable record decoders (one per source CSV convention)
//! - Forward-window maximum annotation
//! - Breakout-entry / fixed-hold trade simulation
//! - Reconciliation of two time-adjacent history batches per security
//! - Presence screening and appearance-day counts across dated ranking
//!   snapshots
//! - Tally of the dates holding each security's range extremes
//!
//! No I/O happens here: collaborators hand every component a complete,
//! immutable input and consume its output. Input ordering (ascending by
//! date, unique) is an enforced precondition, never repaired.

pub mod annotate;
pub mod decode;
pub mod domain;
pub mod extremes;
pub mod reconcile;
pub mod screen;
pub mod simulate;
