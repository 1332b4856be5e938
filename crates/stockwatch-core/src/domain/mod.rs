//! # Domain Models
//!
//! Canonical types for daily price history and the series derived from it.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`TradingDate`] | Calendar day in `YYYY-MM-DD` form |
//! | [`PriceRecord`] | OHLCV values for one ticker on one day |
//! | [`Series`] | Chronological records for one ticker |
//! | [`MetricSeries`] | Derived `{date, value}` points for one ticker |
//! | [`VolumeChange`] | Daily volume with its increase/decrease direction |
//!
//! All constructors validate their invariants, so a [`Series`] handed to the
//! metric functions is always strictly ordered by date with finite prices.

mod date;
mod models;
mod symbol;

pub use date::TradingDate;
pub use models::{
    MetricKind, MetricPoint, MetricSeries, PriceRecord, Series, VolumeChange, VolumeDirection,
};
pub use symbol::Symbol;
