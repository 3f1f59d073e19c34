//! TradeEvent — a completed round-trip produced by the simulator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One simulated entry/exit pair. Entries and exits both fill at the
/// observation's open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
}

impl TradeEvent {
    /// Return on the trade as a fraction of the entry price.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        (self.exit_price - self.entry_price) / self.entry_price
    }

    /// Calendar days held.
    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}
