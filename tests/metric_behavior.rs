//! Behavior-driven tests for profitability and volume metrics
//!
//! These tests verify WHAT the metric calculator reports for a series,
//! including its length rules and the failures it refuses to paper over.

use std::sync::Arc;

use stockwatch_core::metrics::{align_on_dates, percent_change, volume_change, volume_report};
use stockwatch_core::{
    Baseline, Fetcher, FixtureSource, MetricError, MetricKind, PriceRecord, Series, Symbol,
    TradingDate, VolumeDirection,
};

fn series(symbol: &str, rows: &[(&str, f64, u64)]) -> Series {
    let records = rows
        .iter()
        .map(|&(date, close, volume)| {
            PriceRecord::new(
                TradingDate::parse(date).expect("valid date"),
                close,
                close,
                close,
                close,
                volume,
            )
            .expect("valid record")
        })
        .collect();
    Series::new(Symbol::parse(symbol).expect("valid symbol"), records).expect("ordered series")
}

fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

// =============================================================================
// Metrics: Percent Change
// =============================================================================

#[test]
fn two_day_series_gains_ten_percent_and_two_hundred_shares() {
    // Given: close 100 -> 110 and volume 1000 -> 1200
    let input = series("AAPL", &[("2024-01-02", 100.0, 1000), ("2024-01-03", 110.0, 1200)]);

    // When: Metrics are computed against the previous close
    let pct = percent_change(&input, Baseline::PreviousClose).expect("percent change");
    let vol = volume_change(&input).expect("volume change");

    // Then: One point each
    assert_eq!(pct.kind(), MetricKind::PercentChange);
    assert_eq!(pct.len(), 1);
    assert!(approx_eq(pct.points()[0].value, 10.0));
    assert_eq!(vol.kind(), MetricKind::VolumeChange);
    assert_eq!(vol.values().collect::<Vec<_>>(), vec![200.0]);
}

#[tokio::test]
async fn percent_change_length_depends_on_baseline() {
    // Given: A month of fixture data
    let fetcher = Fetcher::new(Arc::new(FixtureSource::new()));
    let input = fetcher
        .fetch(
            &Symbol::parse("AAPL").expect("valid"),
            TradingDate::parse("2024-03-01").expect("valid"),
            TradingDate::parse("2024-04-01").expect("valid"),
        )
        .await
        .expect("fixture fetch");

    // When: Both baselines are applied
    let from_start = percent_change(&input, Baseline::PeriodStart).expect("period start");
    let from_previous = percent_change(&input, Baseline::PreviousClose).expect("previous");

    // Then: Period start keeps every day and opens at zero
    assert_eq!(from_start.len(), input.len());
    assert_eq!(from_start.points()[0].value, 0.0);
    assert_eq!(from_start.points()[0].date, input.records()[0].date);

    // And: Previous close drops the first day
    assert_eq!(from_previous.len(), input.len() - 1);
    assert_eq!(from_previous.points()[0].date, input.records()[1].date);

    // And: Every point follows the formula
    for (point, pair) in from_previous.points().iter().zip(input.records().windows(2)) {
        let expected = (pair[1].close - pair[0].close) / pair[0].close * 100.0;
        assert!(approx_eq(point.value, expected), "{} vs {expected}", point.value);
    }
}

#[test]
fn constant_close_yields_all_zero_change() {
    // Given: A flat price
    let input = series(
        "SPY",
        &[
            ("2024-01-02", 42.5, 10),
            ("2024-01-03", 42.5, 20),
            ("2024-01-04", 42.5, 30),
            ("2024-01-05", 42.5, 40),
        ],
    );

    for baseline in [Baseline::PeriodStart, Baseline::PreviousClose] {
        // When: Percent change is computed
        let pct = percent_change(&input, baseline).expect("percent change");

        // Then: Nothing moved
        assert!(pct.values().all(|value| value == 0.0), "{baseline}");
    }
}

#[test]
fn single_record_is_insufficient_for_every_metric() {
    // Given: Only one trading day
    let input = series("AAPL", &[("2024-01-02", 100.0, 1000)]);

    // Then: Every metric refuses it
    let expected = MetricError::InsufficientData { len: 1, required: 2 };
    assert_eq!(percent_change(&input, Baseline::PeriodStart), Err(expected.clone()));
    assert_eq!(percent_change(&input, Baseline::PreviousClose), Err(expected.clone()));
    assert_eq!(volume_change(&input), Err(expected.clone()));
    assert_eq!(volume_report(&input).map(|rows| rows.len()), Err(expected));
}

#[test]
fn zero_baseline_is_an_error_not_infinity() {
    // Given: A series that opens at zero
    let input = series("PENNY", &[("2024-01-02", 0.0, 1), ("2024-01-03", 1.0, 1)]);

    // When: Percent change is measured from the period start
    let result = percent_change(&input, Baseline::PeriodStart);

    // Then: The baseline is reported as invalid
    assert_eq!(
        result,
        Err(MetricError::InvalidBaseline {
            date: TradingDate::parse("2024-01-02").expect("valid")
        })
    );
}

// =============================================================================
// Metrics: Volume
// =============================================================================

#[test]
fn volume_change_is_difference_of_consecutive_days() {
    // Given: Volumes that rise, fall, and hold
    let volumes = [1000_u64, 2000, 3000, 2500, 2500];
    let dates = ["2021-01-04", "2021-01-05", "2021-01-06", "2021-01-07", "2021-01-08"];
    let rows = dates
        .iter()
        .zip(volumes)
        .map(|(date, volume)| (*date, 10.0, volume))
        .collect::<Vec<_>>();
    let input = series("AAPL", &rows);

    // When: Volume change is computed
    let change = volume_change(&input).expect("volume change");

    // Then: Index 0 is excluded and each value is v[i] - v[i-1]
    assert_eq!(change.len(), volumes.len() - 1);
    for (i, point) in change.points().iter().enumerate() {
        assert_eq!(point.value, volumes[i + 1] as f64 - volumes[i] as f64);
        assert_eq!(point.date.to_string(), dates[i + 1]);
    }

    // And: The report labels the same moves
    let report = volume_report(&input).expect("report");
    assert_eq!(report.len(), volumes.len());
    assert_eq!(report[0].direction, None);
    assert_eq!(report[0].volume, 1000);
    assert_eq!(report[2].direction, Some(VolumeDirection::Increase));
    assert_eq!(report[3].direction, Some(VolumeDirection::Decrease));
    assert_eq!(report[4].direction, Some(VolumeDirection::Unchanged));
}

// =============================================================================
// Metrics: Stock vs Benchmark
// =============================================================================

#[test]
fn alignment_keeps_only_shared_dates() {
    // Given: A stock and a benchmark with different trading calendars
    let stock = series(
        "AAPL",
        &[
            ("2024-01-02", 100.0, 1),
            ("2024-01-03", 101.0, 1),
            ("2024-01-04", 102.0, 1),
        ],
    );
    let bench = series(
        "SPY",
        &[
            ("2024-01-03", 400.0, 1),
            ("2024-01-04", 404.0, 1),
            ("2024-01-05", 408.0, 1),
        ],
    );
    let stock_pct = percent_change(&stock, Baseline::PeriodStart).expect("stock");
    let bench_pct = percent_change(&bench, Baseline::PeriodStart).expect("bench");

    // When: They are aligned
    let aligned = align_on_dates(&[stock_pct, bench_pct]);

    // Then: Both keep 01-03 and 01-04 only, in order
    assert_eq!(aligned.len(), 2);
    for metric in &aligned {
        let dates = metric
            .points()
            .iter()
            .map(|point| point.date.to_string())
            .collect::<Vec<_>>();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-04"]);
    }
    assert_eq!(aligned[1].symbol().as_str(), "SPY");
    assert!(approx_eq(aligned[1].points()[1].value, 1.0));
}
