use std::sync::Arc;

use tracing::{debug, info};

use crate::data_source::{
    DateRange, HistoryRequest, PriceSource, ProviderId, SourceError, SourceErrorKind,
};
use crate::{FetchError, Series, Symbol, TradingDate};

/// Retrieves daily series for tickers over a date range, one upstream call per ticker.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn PriceSource>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    pub fn source_id(&self) -> ProviderId {
        self.source.id()
    }

    /// Fetches one ticker. `start` is inclusive and `end` exclusive.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidRange`] when `start > end`; no request is sent.
    /// - [`FetchError::DataUnavailable`] when the provider has no rows for the
    ///   range or does not know the symbol.
    /// - [`FetchError::Source`] for any other provider failure.
    pub async fn fetch(
        &self,
        symbol: &Symbol,
        start: TradingDate,
        end: TradingDate,
    ) -> Result<Series, FetchError> {
        let range = DateRange::new(start, end)?;
        self.fetch_range(symbol, range).await
    }

    /// Fetches several tickers sequentially, returning series in request order.
    pub async fn fetch_many(
        &self,
        symbols: &[Symbol],
        start: TradingDate,
        end: TradingDate,
    ) -> Result<Vec<Series>, FetchError> {
        let range = DateRange::new(start, end)?;
        if symbols.is_empty() {
            return Err(FetchError::NoSymbols);
        }

        let mut series = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            series.push(self.fetch_range(symbol, range).await?);
        }
        Ok(series)
    }

    async fn fetch_range(&self, symbol: &Symbol, range: DateRange) -> Result<Series, FetchError> {
        let unavailable = || FetchError::DataUnavailable {
            symbol: symbol.clone(),
            start: range.start(),
            end: range.end(),
        };

        debug!(
            source = %self.source.id(),
            %symbol,
            start = %range.start(),
            end = %range.end(),
            "fetching daily history"
        );

        let series = self
            .source
            .history(HistoryRequest::new(symbol.clone(), range))
            .await
            .map_err(|error: SourceError| match error.kind() {
                SourceErrorKind::NotFound => {
                    debug!(%symbol, %error, "provider does not know symbol");
                    unavailable()
                }
                _ => FetchError::Source(error),
            })?;

        if series.is_empty() {
            return Err(unavailable());
        }

        info!(%symbol, records = series.len(), "fetched daily history");
        Ok(series)
    }
}
