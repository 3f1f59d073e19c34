//! Breakout-entry / fixed-hold trade simulation.
//!
//! Two states, FLAT and LONG, plus a pending-entry flag while FLAT. A day
//! whose high exceeds the maximum of the remainder of its forward window is
//! a breakout; the entry fills at the next processed observation's open and
//! the exit at the open of the first observation held at least `hold_days`
//! calendar days. Observations with an incomplete annotation are skipped
//! entirely — they neither arm nor advance state.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::annotate::AnnotatedSeries;
use crate::domain::TradeEvent;

/// Default holding period: one calendar week.
pub const DEFAULT_HOLD_DAYS: i64 = 7;

/// Rejected simulator parameter.
#[derive(Debug, Error)]
#[error("holding period must be at least 1 day, got {days}")]
pub struct InvalidHold {
    pub days: i64,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Flat { pending_entry: bool },
    Long { entry_date: NaiveDate, entry_price: f64 },
}

/// Replays the breakout rule over an annotated series.
#[derive(Debug, Clone, Copy)]
pub struct BreakoutSimulator {
    hold: Duration,
}

impl Default for BreakoutSimulator {
    fn default() -> Self {
        Self { hold: Duration::days(DEFAULT_HOLD_DAYS) }
    }
}

impl BreakoutSimulator {
    pub fn new(hold_days: i64) -> Result<Self, InvalidHold> {
        if hold_days < 1 {
            return Err(InvalidHold { days: hold_days });
        }
        Ok(Self { hold: Duration::days(hold_days) })
    }

    pub fn hold_days(&self) -> i64 {
        self.hold.num_days()
    }

    /// Returns the ordered trade events. A position still open at the end
    /// of data emits nothing.
    ///
    /// A breakout on the pending-entry day re-arms instead of entering:
    /// the fill waits for the first non-breakout observation.
    pub fn simulate(&self, annotated: &AnnotatedSeries) -> Vec<TradeEvent> {
        let mut trades = Vec::new();
        let mut state = State::Flat { pending_entry: false };

        for (obs, annotation) in annotated.iter() {
            if !annotation.complete {
                continue;
            }
            match state {
                State::Flat { pending_entry } => {
                    if annotation.window_max < obs.high {
                        state = State::Flat { pending_entry: true };
                        continue;
                    }
                    if pending_entry {
                        state = State::Long { entry_date: obs.date, entry_price: obs.open };
                    }
                }
                State::Long { entry_date, entry_price } => {
                    if obs.date - entry_date < self.hold {
                        continue;
                    }
                    trades.push(TradeEvent {
                        entry_date,
                        entry_price,
                        exit_date: obs.date,
                        exit_price: obs.open,
                    });
                    state = State::Flat { pending_entry: false };
                }
            }
        }

        trades
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::SlidingWindowAnnotator;
    use crate::domain::{PriceObservation, PriceSeries};

    fn obs(day: u32, open: f64, high: f64, close: f64) -> PriceObservation {
        PriceObservation {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(day as i64 - 1),
            open,
            high,
            low: open.min(close) - 1.0,
            close,
            volume: 1000.0,
            adj_close: close,
        }
    }

    /// Builds a series annotated with a 5-day span.
    fn annotated(rows: &[(u32, f64, f64, f64)]) -> AnnotatedSeries {
        let series = PriceSeries::new(
            "7203",
            rows.iter().map(|&(d, o, h, c)| obs(d, o, h, c)).collect(),
        )
        .unwrap();
        SlidingWindowAnnotator::new(5).unwrap().annotate(series)
    }

    fn simulator(hold_days: i64) -> BreakoutSimulator {
        BreakoutSimulator::new(hold_days).unwrap()
    }

    #[test]
    fn breakout_enters_next_day_and_exits_after_hold() {
        // Day 2's high (120) tops every later close in its 5-day window, so
        // it arms the entry. Day 3 is not itself a breakout (its window max
        // 106 equals its high), so the entry fills at day 3's open; the exit
        // fills at day 10, the first row held >= 7 calendar days. The tail
        // rows only exist to make the earlier rows complete.
        let annotated = annotated(&[
            (1, 100.0, 101.0, 100.0),
            (2, 100.0, 120.0, 110.0),
            (3, 105.0, 106.0, 103.0),
            (4, 104.0, 107.0, 106.0),
            (5, 105.0, 106.0, 105.0),
            (8, 104.0, 105.0, 104.0),
            (10, 101.0, 102.0, 100.0),
            (16, 100.0, 101.0, 99.0),
            (17, 99.0, 100.0, 98.0),
            (18, 98.0, 99.0, 97.0),
        ]);
        let trades = simulator(7).simulate(&annotated);
        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.entry_date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(trade.entry_price, 105.0);
        assert_eq!(trade.exit_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(trade.exit_price, 101.0);
        assert!(trade.holding_days() >= 7);
    }

    #[test]
    fn incomplete_annotations_neither_arm_nor_enter() {
        // Every row is within the span of the last date: all incomplete.
        let annotated = annotated(&[(1, 100.0, 200.0, 100.0), (2, 100.0, 100.5, 100.0)]);
        assert!(annotated.annotations().iter().all(|a| !a.complete));
        assert!(BreakoutSimulator::default().simulate(&annotated).is_empty());
    }

    #[test]
    fn open_position_at_end_of_data_emits_nothing() {
        let annotated = annotated(&[
            (1, 100.0, 120.0, 110.0), // breakout, arms
            (2, 111.0, 112.0, 111.0), // entry (window max 112 == high)
            (3, 112.0, 113.0, 112.0), // held
            (9, 100.0, 101.0, 100.0),
            (10, 100.0, 101.0, 100.0),
        ]);
        // Rows 1-3 are complete; the 30-day hold never elapses before the
        // incomplete tail, so the open position is discarded.
        let trades = simulator(30).simulate(&annotated);
        assert!(trades.is_empty());
    }

    #[test]
    fn breakout_on_pending_day_defers_entry() {
        let annotated = annotated(&[
            (1, 100.0, 130.0, 110.0), // breakout, arms
            (2, 108.0, 129.0, 107.0), // breakout again, re-arms
            (3, 108.0, 109.0, 107.0), // window max 110 >= high: entry fills
            (4, 107.0, 111.0, 110.0),
            (5, 106.0, 107.0, 105.0),
            (10, 105.0, 106.0, 104.0), // exit (>= 7 days)
            (16, 104.0, 105.0, 103.0),
            (17, 103.0, 104.0, 102.0),
            (18, 102.0, 103.0, 101.0),
        ]);
        let trades = simulator(7).simulate(&annotated);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].entry_date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(trades[0].entry_price, 108.0);
    }

    #[test]
    fn non_positive_hold_is_rejected() {
        assert!(BreakoutSimulator::new(0).is_err());
        let err = BreakoutSimulator::new(-1).unwrap_err();
        assert_eq!(err.days, -1);
    }

    #[test]
    fn single_observation_yields_zero_trades() {
        let annotated = annotated(&[(1, 100.0, 101.0, 100.0)]);
        assert!(BreakoutSimulator::default().simulate(&annotated).is_empty());
    }
}
