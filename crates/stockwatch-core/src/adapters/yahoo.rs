use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::data_source::{DateRange, HistoryRequest, PriceSource, ProviderId, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{PriceRecord, Series, Symbol, TradingDate};

/// Daily history from the Yahoo Finance v8 chart endpoint.
#[derive(Clone)]
pub struct YahooSource {
    http_client: Arc<dyn HttpClient>,
    config: FetchConfig,
}

impl YahooSource {
    pub fn new(config: FetchConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Self {
            http_client,
            config,
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: FetchConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn chart_url(&self, req: &HistoryRequest) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.config.base_url,
            urlencoding::encode(req.symbol.as_str()),
            req.range.start().unix_timestamp(),
            req.range.end().unix_timestamp(),
        )
    }

    async fn fetch_history(&self, req: &HistoryRequest) -> Result<Series, SourceError> {
        let url = self.chart_url(req);
        debug!(symbol = %req.symbol, %url, "requesting yahoo chart");

        let request = HttpRequest::get(url)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_header("accept", "application/json")
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
        })?;

        match response.status {
            200..=299 => {}
            404 => return Err(not_found_error(&req.symbol, &response.body)),
            429 => {
                return Err(SourceError::rate_limited(
                    "yahoo rate limited the chart request",
                ))
            }
            status => {
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {status}"
                )))
            }
        }

        parse_chart(&req.symbol, req.range, &response.body)
    }
}

impl PriceSource for YahooSource {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Series, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_history(&req).await })
    }
}

fn not_found_error(symbol: &Symbol, body: &str) -> SourceError {
    let description = serde_json::from_str::<YahooChartResponse>(body)
        .ok()
        .and_then(|payload| payload.chart.error)
        .and_then(|error| error.description)
        .unwrap_or_else(|| String::from("symbol not found"));
    SourceError::not_found(format!("yahoo has no chart for {symbol}: {description}"))
}

/// Converts a chart payload into a [`Series`] restricted to `range`.
///
/// Timestamps are shifted by the exchange's `gmtoffset` before taking the
/// calendar day, so a session that opens before midnight UTC keeps its local
/// date. Days with any missing OHLC value are skipped. When two timestamps
/// fall on the same calendar day the later one wins.
pub(crate) fn parse_chart(
    symbol: &Symbol,
    range: DateRange,
    body: &str,
) -> Result<Series, SourceError> {
    let payload: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::invalid_response(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = payload.chart.error {
        let description = error.description.unwrap_or_default();
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(SourceError::not_found(format!(
                "yahoo has no chart for {symbol}: {description}"
            )));
        }
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error {}: {description}",
            error.code
        )));
    }

    let Some(result) = payload.chart.result.and_then(|results| results.into_iter().next())
    else {
        return Series::new(symbol.clone(), Vec::new())
            .map_err(|e| SourceError::invalid_response(e.to_string()));
    };

    let gmtoffset = result.meta.map_or(0, |meta| meta.gmtoffset);
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut records: Vec<PriceRecord> = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, &ts) in timestamps.iter().enumerate() {
        let date = TradingDate::from_unix_timestamp(ts.saturating_add(gmtoffset))
            .map_err(|e| SourceError::invalid_response(e.to_string()))?;
        if !range.contains(date) {
            continue;
        }

        let (Some(open), Some(high), Some(low), Some(close)) = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        ) else {
            skipped += 1;
            continue;
        };
        let volume = value_at(&quote.volume, i).map_or(0, |v| v.max(0) as u64);

        let record = match PriceRecord::new(date, open, high, low, close, volume) {
            Ok(record) => record,
            Err(error) => {
                warn!(%symbol, %date, %error, "dropping malformed yahoo row");
                skipped += 1;
                continue;
            }
        };

        match records.last().map(|last| last.date) {
            Some(previous) if previous == date => {
                records.pop();
                records.push(record);
            }
            Some(previous) if previous > date => {
                return Err(SourceError::invalid_response(format!(
                    "yahoo timestamps out of order at {date}"
                )))
            }
            _ => records.push(record),
        }
    }

    if skipped > 0 {
        warn!(%symbol, skipped, "skipped incomplete yahoo rows");
    }

    Series::new(symbol.clone(), records).map_err(|e| SourceError::invalid_response(e.to_string()))
}

fn value_at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}
