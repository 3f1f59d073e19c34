//! Domain types shared by every component.

pub mod observation;
pub mod series;
pub mod snapshot;
pub mod trade;

pub use observation::PriceObservation;
pub use series::{PriceSeries, SeriesError};
pub use snapshot::{PresenceCount, ScreeningResult, ScreeningRow, Snapshot, SnapshotSeries};
pub use trade::TradeEvent;
