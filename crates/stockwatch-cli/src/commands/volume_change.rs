use serde::Serialize;
use stockwatch_core::metrics;
use stockwatch_core::{Fetcher, Symbol, VolumeChange};

use crate::cli::VolumeChangeArgs;
use crate::error::CliError;
use crate::output::Table;

use super::{parse_range, parse_symbol, CommandResult};

#[derive(Debug, Serialize)]
struct VolumeChangeData {
    symbol: Symbol,
    rows: Vec<VolumeChange>,
}

pub async fn run(args: &VolumeChangeArgs, fetcher: &Fetcher) -> Result<CommandResult, CliError> {
    let symbol = parse_symbol(&args.symbol)?;
    let (start, end) = parse_range(&args.range)?;

    let series = fetcher.fetch(&symbol, start, end).await?;
    let rows = metrics::volume_report(&series)?;

    let mut table = Table::new(vec![
        String::from("Date"),
        String::from("Volume"),
        String::from("Direction"),
    ]);
    for row in &rows {
        table.push_row(vec![
            row.date.to_string(),
            row.volume.to_string(),
            row.direction
                .map(|direction| direction.to_string())
                .unwrap_or_default(),
        ]);
    }

    let data = serde_json::to_value(VolumeChangeData { symbol, rows })?;
    Ok(CommandResult::ok(data).with_table(table))
}
