//! Profitability and trading-volume metrics.
//!
//! All functions are pure: they borrow a [`Series`] and return freshly
//! allocated results in the same date order.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    MetricError, MetricKind, MetricPoint, MetricSeries, PriceRecord, Series, TradingDate,
    VolumeChange, VolumeDirection,
};

const MIN_RECORDS: usize = 2;

/// Reference close that each day's price is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Baseline {
    /// First close of the series; output keeps every day and starts at 0.
    #[default]
    PeriodStart,
    /// Prior day's close; output starts on the second day.
    PreviousClose,
}

impl Baseline {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PeriodStart => "period-start",
            Self::PreviousClose => "previous-close",
        }
    }
}

impl Display for Baseline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage change of each close against `baseline`:
/// `(close_t - baseline) / baseline * 100`.
///
/// # Errors
///
/// - [`MetricError::InsufficientData`] for fewer than two records.
/// - [`MetricError::InvalidBaseline`] when a baseline close is zero.
pub fn percent_change(series: &Series, baseline: Baseline) -> Result<MetricSeries, MetricError> {
    let records = require_records(series)?;

    let points = match baseline {
        Baseline::PeriodStart => {
            let first = &records[0];
            let base = nonzero_baseline(first.close, first.date)?;
            records
                .iter()
                .map(|record| MetricPoint {
                    date: record.date,
                    value: relative_change(record.close, base),
                })
                .collect::<Vec<_>>()
        }
        Baseline::PreviousClose => records
            .windows(2)
            .map(|pair| {
                let base = nonzero_baseline(pair[0].close, pair[0].date)?;
                Ok(MetricPoint {
                    date: pair[1].date,
                    value: relative_change(pair[1].close, base),
                })
            })
            .collect::<Result<Vec<_>, MetricError>>()?,
    };

    debug!(
        symbol = %series.symbol(),
        %baseline,
        points = points.len(),
        "computed percent change"
    );
    Ok(MetricSeries::from_ordered(
        series.symbol().clone(),
        MetricKind::PercentChange,
        points,
    ))
}

/// Day-over-day volume delta `volume_t - volume_(t-1)`; the first day is excluded.
///
/// # Errors
///
/// [`MetricError::InsufficientData`] for fewer than two records.
pub fn volume_change(series: &Series) -> Result<MetricSeries, MetricError> {
    let records = require_records(series)?;

    let points = records
        .windows(2)
        .map(|pair| MetricPoint {
            date: pair[1].date,
            value: volume_delta(pair[0].volume, pair[1].volume),
        })
        .collect::<Vec<_>>();

    debug!(symbol = %series.symbol(), points = points.len(), "computed volume change");
    Ok(MetricSeries::from_ordered(
        series.symbol().clone(),
        MetricKind::VolumeChange,
        points,
    ))
}

/// Every day's volume with its direction against the prior day.
///
/// The first row keeps its volume but has no direction.
///
/// # Errors
///
/// [`MetricError::InsufficientData`] for fewer than two records.
pub fn volume_report(series: &Series) -> Result<Vec<VolumeChange>, MetricError> {
    let records = require_records(series)?;

    let mut rows = Vec::with_capacity(records.len());
    rows.push(VolumeChange {
        date: records[0].date,
        volume: records[0].volume,
        direction: None,
    });
    rows.extend(records.windows(2).map(|pair| VolumeChange {
        date: pair[1].date,
        volume: pair[1].volume,
        direction: Some(VolumeDirection::from_delta(volume_delta(
            pair[0].volume,
            pair[1].volume,
        ))),
    }));

    Ok(rows)
}

/// Restricts every series to the dates present in all of them.
///
/// Used to compare a stock with a benchmark whose trading calendars differ.
pub fn align_on_dates(series: &[MetricSeries]) -> Vec<MetricSeries> {
    let Some((first, rest)) = series.split_first() else {
        return Vec::new();
    };

    let mut common: BTreeSet<TradingDate> =
        first.points().iter().map(|point| point.date).collect();
    for other in rest {
        let dates: BTreeSet<TradingDate> =
            other.points().iter().map(|point| point.date).collect();
        common.retain(|date| dates.contains(date));
    }

    series
        .iter()
        .map(|metric| {
            let points = metric
                .points()
                .iter()
                .filter(|point| common.contains(&point.date))
                .copied()
                .collect();
            MetricSeries::from_ordered(metric.symbol().clone(), metric.kind(), points)
        })
        .collect()
}

fn require_records(series: &Series) -> Result<&[PriceRecord], MetricError> {
    if series.len() < MIN_RECORDS {
        return Err(MetricError::InsufficientData {
            len: series.len(),
            required: MIN_RECORDS,
        });
    }
    Ok(series.records())
}

fn nonzero_baseline(close: f64, date: TradingDate) -> Result<f64, MetricError> {
    if close == 0.0 {
        return Err(MetricError::InvalidBaseline { date });
    }
    Ok(close)
}

fn relative_change(close: f64, base: f64) -> f64 {
    (close - base) * 100.0 / base
}

fn volume_delta(previous: u64, current: u64) -> f64 {
    current as f64 - previous as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    fn series(rows: &[(&str, f64, u64)]) -> Series {
        let records = rows
            .iter()
            .map(|&(date, close, volume)| {
                PriceRecord::new(
                    TradingDate::parse(date).expect("date"),
                    close,
                    close,
                    close,
                    close,
                    volume,
                )
                .expect("record")
            })
            .collect();
        Series::new(Symbol::parse("AAPL").expect("symbol"), records).expect("series")
    }

    #[test]
    fn two_day_scenario() {
        let input = series(&[("2024-01-02", 100.0, 1000), ("2024-01-03", 110.0, 1200)]);

        let pct = percent_change(&input, Baseline::PreviousClose).expect("pct");
        assert_eq!(pct.values().collect::<Vec<_>>(), vec![10.0]);
        assert_eq!(pct.points()[0].date.to_string(), "2024-01-03");

        let vol = volume_change(&input).expect("vol");
        assert_eq!(vol.values().collect::<Vec<_>>(), vec![200.0]);
    }

    #[test]
    fn period_start_keeps_every_day_and_starts_at_zero() {
        let input = series(&[
            ("2024-01-02", 50.0, 1),
            ("2024-01-03", 55.0, 1),
            ("2024-01-04", 45.0, 1),
        ]);

        let pct = percent_change(&input, Baseline::PeriodStart).expect("pct");
        assert_eq!(pct.len(), 3);
        assert_eq!(pct.values().collect::<Vec<_>>(), vec![0.0, 10.0, -10.0]);
    }

    #[test]
    fn zero_previous_close_is_rejected() {
        let input = series(&[
            ("2024-01-02", 5.0, 1),
            ("2024-01-03", 0.0, 1),
            ("2024-01-04", 1.0, 1),
        ]);

        let err = percent_change(&input, Baseline::PreviousClose).expect_err("must fail");
        assert_eq!(
            err,
            MetricError::InvalidBaseline {
                date: TradingDate::parse("2024-01-03").expect("date")
            }
        );
    }

    #[test]
    fn volume_report_marks_directions() {
        let input = series(&[
            ("2024-01-02", 1.0, 1000),
            ("2024-01-03", 1.0, 2000),
            ("2024-01-04", 1.0, 1500),
            ("2024-01-05", 1.0, 1500),
        ]);

        let directions = volume_report(&input)
            .expect("report")
            .into_iter()
            .map(|row| row.direction)
            .collect::<Vec<_>>();

        assert_eq!(
            directions,
            vec![
                None,
                Some(VolumeDirection::Increase),
                Some(VolumeDirection::Decrease),
                Some(VolumeDirection::Unchanged),
            ]
        );
    }
}
