use std::collections::BTreeMap;

use serde::Serialize;
use stockwatch_core::metrics;
use stockwatch_core::{Baseline, Fetcher, MetricSeries, TradingDate};

use crate::cli::PercentChangeArgs;
use crate::error::CliError;
use crate::output::Table;

use super::{parse_range, parse_symbol, CommandResult};

#[derive(Debug, Serialize)]
struct PercentChangeData {
    baseline: Baseline,
    start: TradingDate,
    end: TradingDate,
    series: Vec<MetricSeries>,
}

pub async fn run(args: &PercentChangeArgs, fetcher: &Fetcher) -> Result<CommandResult, CliError> {
    let symbols = args
        .symbols
        .iter()
        .map(|raw| parse_symbol(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let (start, end) = parse_range(&args.range)?;
    let baseline = Baseline::from(args.baseline);

    let fetched = fetcher.fetch_many(&symbols, start, end).await?;
    let series = fetched
        .iter()
        .map(|series| metrics::percent_change(series, baseline))
        .collect::<Result<Vec<_>, _>>()?;

    let table = percent_table(&series);
    let data = serde_json::to_value(PercentChangeData {
        baseline,
        start,
        end,
        series,
    })?;

    Ok(CommandResult::ok(data).with_table(table))
}

/// One row per date, one column per ticker. Tickers without a value on a
/// date get an empty cell.
fn percent_table(series: &[MetricSeries]) -> Table {
    let mut headers = vec![String::from("Date")];
    headers.extend(series.iter().map(|metric| metric.symbol().to_string()));

    let mut by_date: BTreeMap<TradingDate, Vec<Option<f64>>> = BTreeMap::new();
    for (column, metric) in series.iter().enumerate() {
        for point in metric.points() {
            by_date
                .entry(point.date)
                .or_insert_with(|| vec![None; series.len()])[column] = Some(point.value);
        }
    }

    let mut table = Table::new(headers);
    for (date, values) in by_date {
        let mut row = vec![date.to_string()];
        row.extend(
            values
                .into_iter()
                .map(|value| value.map(|v| format!("{v:.6}")).unwrap_or_default()),
        );
        table.push_row(row);
    }
    table
}
