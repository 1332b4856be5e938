use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate, ValidationError};

/// One trading day of OHLCV data for a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceRecord {
    pub fn new(
        date: TradingDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidPriceRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidPriceBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Chronological daily records for one ticker. Dates are strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: Symbol,
    records: Vec<PriceRecord>,
}

impl Series {
    pub fn new(symbol: Symbol, records: Vec<PriceRecord>) -> Result<Self, ValidationError> {
        check_increasing(records.iter().map(|record| record.date))?;
        Ok(Self { symbol, records })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Which quantity a [`MetricSeries`] measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    PercentChange,
    VolumeChange,
}

impl MetricKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PercentChange => "percent_change",
            Self::VolumeChange => "volume_change",
        }
    }

    /// Axis title used by charts.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PercentChange => "Price Change Percentage (%)",
            Self::VolumeChange => "Volume Change",
        }
    }
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub date: TradingDate,
    pub value: f64,
}

/// Derived values for one ticker. Dates are strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    symbol: Symbol,
    kind: MetricKind,
    points: Vec<MetricPoint>,
}

impl MetricSeries {
    pub fn new(
        symbol: Symbol,
        kind: MetricKind,
        points: Vec<MetricPoint>,
    ) -> Result<Self, ValidationError> {
        check_increasing(points.iter().map(|point| point.date))?;
        Ok(Self::from_ordered(symbol, kind, points))
    }

    /// Caller guarantees `points` are already strictly increasing by date.
    pub(crate) fn from_ordered(symbol: Symbol, kind: MetricKind, points: Vec<MetricPoint>) -> Self {
        debug_assert!(points.windows(2).all(|pair| pair[0].date < pair[1].date));
        Self {
            symbol,
            kind,
            points,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub const fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn points(&self) -> &[MetricPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.value)
    }
}

/// Sign of a day-over-day volume move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeDirection {
    Increase,
    Decrease,
    Unchanged,
}

impl VolumeDirection {
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Increase
        } else if delta < 0.0 {
            Self::Decrease
        } else {
            Self::Unchanged
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increase => "Increase",
            Self::Decrease => "Decrease",
            Self::Unchanged => "Unchanged",
        }
    }
}

impl Display for VolumeDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traded volume for a day plus its direction against the prior day.
///
/// The first day of a series has no prior day, so `direction` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeChange {
    pub date: TradingDate,
    pub volume: u64,
    pub direction: Option<VolumeDirection>,
}

fn check_increasing<I>(dates: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = TradingDate>,
{
    let mut previous: Option<TradingDate> = None;
    for next in dates {
        if let Some(previous) = previous.filter(|previous| next <= *previous) {
            return Err(ValidationError::UnorderedSeries { previous, next });
        }
        previous = Some(next);
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
