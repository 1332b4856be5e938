//! Behavior-driven tests for chart building
//!
//! These tests follow the full fetch -> measure -> chart flow on fixture data
//! and check the Vega-Lite documents a renderer would receive.

use std::sync::Arc;

use serde_json::Value;
use stockwatch_core::metrics::{align_on_dates, percent_change, volume_change};
use stockwatch_core::{
    Baseline, ChartBuilder, ChartError, ChartKind, Fetcher, FixtureSource, MetricSeries, Series,
    Symbol, TradingDate,
};
use tempfile::tempdir;

async fn fixture_series(symbol: &str) -> Series {
    Fetcher::new(Arc::new(FixtureSource::new()))
        .fetch(
            &Symbol::parse(symbol).expect("valid symbol"),
            TradingDate::parse("2024-01-01").expect("valid"),
            TradingDate::parse("2024-02-01").expect("valid"),
        )
        .await
        .expect("fixture fetch")
}

#[tokio::test]
async fn profit_chart_compares_stock_against_benchmark() {
    // Given: Percent change for a stock and its benchmark
    let stock = percent_change(&fixture_series("AAPL").await, Baseline::PeriodStart)
        .expect("stock metric");
    let bench = percent_change(&fixture_series("SPY").await, Baseline::PeriodStart)
        .expect("benchmark metric");
    let aligned = align_on_dates(&[stock, bench]);

    // When: A line chart is built
    let spec = ChartBuilder::line()
        .title("AAPL vs SPY")
        .build(&aligned)
        .expect("chart");

    // Then: Both series are plotted, stock in red and benchmark in blue
    assert_eq!(spec.kind(), ChartKind::Line);
    assert_eq!(spec.rows().len(), aligned[0].len() * 2);

    let doc = spec.to_vega_lite();
    assert_eq!(doc["mark"]["type"], "line");
    assert_eq!(doc["encoding"]["x"]["type"], "temporal");
    assert_eq!(doc["encoding"]["y"]["type"], "quantitative");
    assert_eq!(doc["encoding"]["color"]["field"], "series");
    assert_eq!(
        doc["encoding"]["color"]["scale"]["domain"],
        serde_json::json!(["AAPL", "SPY"])
    );
    assert_eq!(
        doc["encoding"]["color"]["scale"]["range"],
        serde_json::json!(["red", "blue"])
    );
}

#[tokio::test]
async fn volume_chart_splits_increase_and_decrease() {
    // Given: Volume change for a month
    let change = volume_change(&fixture_series("MSFT").await).expect("volume metric");

    // When: A bar chart is built
    let spec = ChartBuilder::bar().build(&[change.clone()]).expect("chart");

    // Then: Each bar is colored by the sign of its delta
    let doc = spec.to_vega_lite();
    assert_eq!(doc["mark"]["type"], "bar");
    assert_eq!(doc["encoding"]["color"]["field"], "direction");
    assert_eq!(doc["encoding"]["y"]["title"], "Volume Change");

    let values = doc["data"]["values"].as_array().expect("inline data");
    assert_eq!(values.len(), change.len());
    for (row, point) in values.iter().zip(change.points()) {
        let expected = if point.value > 0.0 {
            "Increase"
        } else if point.value < 0.0 {
            "Decrease"
        } else {
            "Unchanged"
        };
        assert_eq!(row["direction"], Value::from(expected));
    }
}

#[test]
fn chart_without_series_is_rejected() {
    // Given: Nothing to plot
    let none: [MetricSeries; 0] = [];

    // Then: Both chart types refuse to build
    assert!(matches!(
        ChartBuilder::line().build(&none),
        Err(ChartError::EmptySeries)
    ));
    assert!(matches!(
        ChartBuilder::bar().build(&none),
        Err(ChartError::EmptySeries)
    ));
}

#[tokio::test]
async fn html_export_embeds_the_spec() {
    // Given: A built chart
    let pct = percent_change(&fixture_series("AAPL").await, Baseline::PreviousClose)
        .expect("metric");
    let spec = ChartBuilder::line().title("AAPL").build(&[pct]).expect("chart");

    // When: It is written as a standalone page
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("profit.html");
    std::fs::write(&path, spec.render_html().expect("html")).expect("write html");

    // Then: The page loads vega-embed and carries the inline data
    let html = std::fs::read_to_string(&path).expect("read html");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("vega-embed@6"));
    assert!(html.contains("\"$schema\":\"https://vega.github.io/schema/vega-lite/v5.json\""));
    assert!(html.contains("<title>AAPL</title>"));
}
