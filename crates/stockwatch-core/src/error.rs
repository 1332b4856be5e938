use thiserror::Error;

use crate::data_source::SourceError;
use crate::{Symbol, TradingDate};

/// Validation and contract errors exposed by `stockwatch-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter, digit, or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("record high must be >= low")]
    InvalidPriceRange,
    #[error("record open/close must be within high/low range")]
    InvalidPriceBounds,

    #[error("series dates must be strictly increasing: {previous} is followed by {next}")]
    UnorderedSeries {
        previous: TradingDate,
        next: TradingDate,
    },

    #[error("config value {name}='{value}' is invalid")]
    InvalidConfig { name: &'static str, value: String },
}

/// Failures raised while retrieving price history.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: TradingDate, end: TradingDate },

    #[error("no price data available for {symbol} between {start} and {end}")]
    DataUnavailable {
        symbol: Symbol,
        start: TradingDate,
        end: TradingDate,
    },

    #[error("at least one ticker is required")]
    NoSymbols,

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Failures raised while deriving metric series.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricError {
    #[error("series has {len} record(s), at least {required} are required")]
    InsufficientData { len: usize, required: usize },

    #[error("baseline close on {date} is zero; percent change is undefined")]
    InvalidBaseline { date: TradingDate },
}

/// Failures raised while building chart specifications.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("cannot build a chart from empty series")]
    EmptySeries,

    #[error("chart serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
