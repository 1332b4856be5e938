//! Declarative chart specifications.
//!
//! [`ChartBuilder`] turns one or more [`MetricSeries`], or a daily volume
//! report, into an immutable [`ChartSpec`]. Specs serialize to Vega-Lite v5
//! JSON, which any Vega-Lite renderer (vega-embed, Altair, the Vega editor)
//! can display.
//!
//! ```rust,ignore
//! let spec = ChartBuilder::line()
//!     .title("AAPL vs SPY")
//!     .build(&[stock_pct, benchmark_pct])?;
//! std::fs::write("profit.html", spec.render_html()?)?;
//! ```

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{ChartError, MetricKind, MetricSeries, Symbol, TradingDate, VolumeChange, VolumeDirection};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

const WIDTH: u32 = 640;
const HEIGHT: u32 = 320;
const LINE_PALETTE: [&str; 6] = ["red", "blue", "green", "orange", "purple", "brown"];
const VOLUME_TITLE: &str = "Volume";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One datum in the chart's inline data table (long format).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub date: TradingDate,
    pub series: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<VolumeDirection>,
}

/// Nominal color scale: `domain[i]` is drawn in `range[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorScale {
    pub field: &'static str,
    pub title: String,
    pub domain: Vec<String>,
    pub range: Vec<String>,
}

/// Immutable chart description produced by [`ChartBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    kind: ChartKind,
    title: Option<String>,
    y_title: String,
    color: ColorScale,
    series: Vec<String>,
    rows: Vec<ChartRow>,
}

impl ChartSpec {
    pub const fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn y_title(&self) -> &str {
        &self.y_title
    }

    pub fn color(&self) -> &ColorScale {
        &self.color
    }

    /// Tickers plotted, in input order.
    pub fn series(&self) -> &[String] {
        &self.series
    }

    pub fn rows(&self) -> &[ChartRow] {
        &self.rows
    }

    /// Vega-Lite v5 document with the data inlined.
    ///
    /// Bars use a discrete date axis. With more than one ticker, bars for the
    /// same day sit side by side via an `xOffset` on the ticker.
    pub fn to_vega_lite(&self) -> Value {
        let x_type = match self.kind {
            ChartKind::Line => "temporal",
            ChartKind::Bar => "ordinal",
        };

        let mut spec = json!({
            "$schema": VEGA_LITE_SCHEMA,
            "width": WIDTH,
            "height": HEIGHT,
            "data": { "values": self.rows },
            "mark": { "type": self.kind.as_str(), "tooltip": true },
            "encoding": {
                "x": { "field": "date", "type": x_type, "title": "Date" },
                "y": { "field": "value", "type": "quantitative", "title": self.y_title },
                "color": {
                    "field": self.color.field,
                    "type": "nominal",
                    "title": self.color.title,
                    "scale": { "domain": self.color.domain, "range": self.color.range },
                },
            },
        });

        if self.kind == ChartKind::Bar && self.series.len() > 1 {
            spec["encoding"]["xOffset"] =
                json!({ "field": "series", "type": "nominal", "title": "Ticker" });
        }
        if let Some(title) = &self.title {
            spec["title"] = Value::String(title.clone());
        }
        spec
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String, ChartError> {
        let spec = self.to_vega_lite();
        let rendered = if pretty {
            serde_json::to_string_pretty(&spec)?
        } else {
            serde_json::to_string(&spec)?
        };
        Ok(rendered)
    }

    /// Standalone HTML page that renders the chart with vega-embed.
    pub fn render_html(&self) -> Result<String, ChartError> {
        // "</" inside a script block would end it early.
        let spec = self.to_json_string(false)?.replace("</", "<\\/");
        let title = escape_html(self.title().unwrap_or("stockwatch chart"));

        Ok(format!(
            r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
  <script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
  <script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>
</head>
<body>
  <div id="chart"></div>
  <script type="text/javascript">
    vegaEmbed("#chart", {spec});
  </script>
</body>
</html>
"##
        ))
    }
}

/// Builds [`ChartSpec`]s from metric series or a volume report.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    kind: ChartKind,
    title: Option<String>,
}

impl ChartBuilder {
    pub fn new(kind: ChartKind) -> Self {
        Self { kind, title: None }
    }

    /// One line per series, colored by ticker.
    pub fn line() -> Self {
        Self::new(ChartKind::Line)
    }

    /// Bars colored green/red by direction.
    pub fn bar() -> Self {
        Self::new(ChartKind::Bar)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Plots metric values. Line charts color by ticker; bar charts color by
    /// the sign of each value.
    ///
    /// # Errors
    ///
    /// [`ChartError::EmptySeries`] when `series` is empty or has no points at all.
    pub fn build(&self, series: &[MetricSeries]) -> Result<ChartSpec, ChartError> {
        if series.iter().all(MetricSeries::is_empty) {
            return Err(ChartError::EmptySeries);
        }

        let rows = series
            .iter()
            .flat_map(|metric| {
                metric.points().iter().map(|point| ChartRow {
                    date: point.date,
                    series: metric.symbol().to_string(),
                    value: point.value,
                    direction: match self.kind {
                        ChartKind::Line => None,
                        ChartKind::Bar => Some(VolumeDirection::from_delta(point.value)),
                    },
                })
            })
            .collect::<Vec<_>>();

        let names = series_names(series.iter().map(MetricSeries::symbol));
        let color = match self.kind {
            ChartKind::Line => ticker_scale(&names),
            ChartKind::Bar => direction_scale(),
        };
        let y_title = series
            .first()
            .map_or(MetricKind::PercentChange.label(), |metric| metric.kind().label());

        Ok(ChartSpec {
            kind: self.kind,
            title: self.title.clone(),
            y_title: y_title.to_owned(),
            color,
            series: names,
            rows,
        })
    }

    /// Plots each day's traded volume, colored by its direction against the
    /// prior day. The first day has no direction and is left out.
    ///
    /// # Errors
    ///
    /// [`ChartError::EmptySeries`] when no day has a direction.
    pub fn build_volume(
        &self,
        symbol: &Symbol,
        report: &[VolumeChange],
    ) -> Result<ChartSpec, ChartError> {
        let rows = report
            .iter()
            .filter_map(|day| {
                day.direction.map(|direction| ChartRow {
                    date: day.date,
                    series: symbol.to_string(),
                    value: day.volume as f64,
                    direction: Some(direction),
                })
            })
            .collect::<Vec<_>>();

        if rows.is_empty() {
            return Err(ChartError::EmptySeries);
        }

        Ok(ChartSpec {
            kind: self.kind,
            title: self.title.clone(),
            y_title: String::from(VOLUME_TITLE),
            color: direction_scale(),
            series: vec![symbol.to_string()],
            rows,
        })
    }
}

fn series_names<'a, I>(symbols: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Symbol>,
{
    let mut names: Vec<String> = Vec::new();
    for symbol in symbols {
        let name = symbol.to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn ticker_scale(names: &[String]) -> ColorScale {
    ColorScale {
        field: "series",
        title: String::from("Ticker"),
        domain: names.to_vec(),
        range: LINE_PALETTE
            .iter()
            .cycle()
            .take(names.len())
            .map(|color| (*color).to_owned())
            .collect(),
    }
}

fn direction_scale() -> ColorScale {
    let directions = [
        (VolumeDirection::Increase, "green"),
        (VolumeDirection::Decrease, "red"),
        (VolumeDirection::Unchanged, "gray"),
    ];

    ColorScale {
        field: "direction",
        title: String::from("Change"),
        domain: directions
            .iter()
            .map(|(direction, _)| direction.to_string())
            .collect(),
        range: directions
            .iter()
            .map(|(_, color)| (*color).to_owned())
            .collect(),
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
