use stockwatch_core::metrics;
use stockwatch_core::{ChartBuilder, Fetcher};

use crate::cli::VolumeChartArgs;
use crate::error::CliError;

use super::{emit_chart, parse_range, parse_symbol, CommandResult};

pub async fn run(
    args: &VolumeChartArgs,
    fetcher: &Fetcher,
    pretty: bool,
) -> Result<CommandResult, CliError> {
    let symbol = parse_symbol(&args.symbol)?;
    let (start, end) = parse_range(&args.range)?;

    let series = fetcher.fetch(&symbol, start, end).await?;

    let spec = if args.delta {
        let change = metrics::volume_change(&series)?;
        ChartBuilder::bar()
            .title(format!("{symbol} daily volume change"))
            .build(&[change])?
    } else {
        let report = metrics::volume_report(&series)?;
        ChartBuilder::bar()
            .title(format!("{symbol} daily volume"))
            .build_volume(&symbol, &report)?
    };
    let data = emit_chart(&spec, args.output.as_deref(), pretty)?;

    Ok(CommandResult::ok(data))
}
