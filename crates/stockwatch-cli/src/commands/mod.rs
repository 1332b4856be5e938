mod percent_change;
mod profit_chart;
mod volume_change;
mod volume_chart;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use stockwatch_core::{
    ChartSpec, FetchConfig, Fetcher, FixtureSource, Symbol, TradingDate, YahooSource,
};
use tracing::debug;

use crate::cli::{Cli, Command, RangeArgs};
use crate::error::CliError;
use crate::metadata::{Envelope, Meta};
use crate::output::Table;

pub struct CommandResult {
    pub data: Value,
    pub table: Option<Table>,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            table: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// A finished command: the envelope plus an optional tabular view of it.
pub struct Response {
    pub envelope: Envelope<Value>,
    pub table: Option<Table>,
}

pub async fn run(cli: &Cli) -> Result<Response, CliError> {
    let fetcher = build_fetcher(cli)?;
    let started = Instant::now();

    let command_result = match &cli.command {
        Command::PercentChange(args) => percent_change::run(args, &fetcher).await?,
        Command::VolumeChange(args) => volume_change::run(args, &fetcher).await?,
        Command::ProfitChart(args) => profit_chart::run(args, &fetcher, cli.pretty).await?,
        Command::VolumeChart(args) => volume_chart::run(args, &fetcher, cli.pretty).await?,
    };

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let CommandResult {
        data,
        table,
        warnings,
    } = command_result;

    let mut meta = Meta::new(fetcher.source_id(), latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Ok(Response {
        envelope: Envelope { meta, data },
        table,
    })
}

fn build_fetcher(cli: &Cli) -> Result<Fetcher, CliError> {
    if cli.offline {
        debug!("using offline fixture source");
        return Ok(Fetcher::new(Arc::new(FixtureSource::new())));
    }

    let mut config = FetchConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str())?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    debug!(base_url = %config.base_url, timeout_ms = config.timeout_ms, "using yahoo source");

    Ok(Fetcher::new(Arc::new(YahooSource::new(config))))
}

fn parse_symbol(raw: &str) -> Result<Symbol, CliError> {
    Symbol::parse(raw).map_err(CliError::from)
}

fn parse_range(args: &RangeArgs) -> Result<(TradingDate, TradingDate), CliError> {
    Ok((
        TradingDate::parse(&args.start)?,
        TradingDate::parse(&args.end)?,
    ))
}

/// Prints the chart inline, or writes it to `output` and reports where it went.
fn emit_chart(spec: &ChartSpec, output: Option<&str>, pretty: bool) -> Result<Value, CliError> {
    let Some(path) = output else {
        return Ok(spec.to_vega_lite());
    };

    let is_html = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
    let (format, contents) = if is_html {
        ("html", spec.render_html()?)
    } else {
        ("vega-lite", spec.to_json_string(pretty)?)
    };

    std::fs::write(path, contents)?;
    debug!(path, format, "chart written");

    Ok(json!({
        "output": path,
        "format": format,
        "kind": spec.kind(),
        "points": spec.rows().len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwatch_core::metrics::percent_change;
    use stockwatch_core::{Baseline, ChartBuilder, PriceRecord, Series};
    use tempfile::tempdir;

    fn sample_chart() -> ChartSpec {
        let records = [("2024-01-02", 100.0), ("2024-01-03", 105.0)]
            .into_iter()
            .map(|(date, close)| {
                PriceRecord::new(
                    TradingDate::parse(date).expect("date"),
                    close,
                    close,
                    close,
                    close,
                    10,
                )
                .expect("record")
            })
            .collect();
        let series = Series::new(Symbol::parse("AAPL").expect("symbol"), records).expect("series");
        let pct = percent_change(&series, Baseline::PeriodStart).expect("metric");
        ChartBuilder::line().build(&[pct]).expect("chart")
    }

    #[test]
    fn chart_without_output_is_returned_inline() {
        let data = emit_chart(&sample_chart(), None, false).expect("inline chart");
        assert_eq!(data["mark"]["type"], "line");
    }

    #[test]
    fn html_extension_selects_html_output() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("chart.HTML");
        let path = path.to_str().expect("utf-8 path");

        let data = emit_chart(&sample_chart(), Some(path), false).expect("written");

        assert_eq!(data["format"], "html");
        assert_eq!(data["points"], 2);
        let written = std::fs::read_to_string(path).expect("read back");
        assert!(written.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn other_extensions_get_vega_lite_json() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("chart.json");
        let path = path.to_str().expect("utf-8 path");

        let data = emit_chart(&sample_chart(), Some(path), true).expect("written");

        assert_eq!(data["format"], "vega-lite");
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(path).expect("read back"))
                .expect("valid json");
        assert_eq!(written["mark"]["type"], "line");
    }
}
