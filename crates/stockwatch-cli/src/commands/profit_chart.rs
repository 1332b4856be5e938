use stockwatch_core::metrics;
use stockwatch_core::{Baseline, ChartBuilder, Fetcher};
use tracing::debug;

use crate::cli::ProfitChartArgs;
use crate::error::CliError;

use super::{emit_chart, parse_range, parse_symbol, CommandResult};

pub async fn run(
    args: &ProfitChartArgs,
    fetcher: &Fetcher,
    pretty: bool,
) -> Result<CommandResult, CliError> {
    let stock = parse_symbol(&args.symbol)?;
    let benchmark = parse_symbol(&args.benchmark)?;
    let (start, end) = parse_range(&args.range)?;

    let fetched = fetcher
        .fetch_many(&[stock.clone(), benchmark.clone()], start, end)
        .await?;
    let changes = fetched
        .iter()
        .map(|series| metrics::percent_change(series, Baseline::PeriodStart))
        .collect::<Result<Vec<_>, _>>()?;

    let aligned = metrics::align_on_dates(&changes);
    let dropped = changes
        .iter()
        .zip(&aligned)
        .map(|(full, kept)| full.len() - kept.len())
        .sum::<usize>();
    debug!(%stock, %benchmark, dropped, "aligned stock and benchmark");

    let spec = ChartBuilder::line()
        .title(format!("{stock} vs {benchmark}"))
        .build(&aligned)?;
    let data = emit_chart(&spec, args.output.as_deref(), pretty)?;

    let mut result = CommandResult::ok(data);
    if dropped > 0 {
        result = result.with_warning(format!(
            "{dropped} points without a matching date in both {stock} and {benchmark} were left out"
        ));
    }
    Ok(result)
}
