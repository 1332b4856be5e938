use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;

use crate::data_source::{HistoryRequest, PriceSource, ProviderId, SourceError};
use crate::{PriceRecord, Series, Symbol};

/// Deterministic offline source: one record per weekday in the range.
///
/// Prices and volumes are derived from the symbol, so repeated calls return
/// identical series. Used by tests and by the CLI `--offline` flag.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    unknown: BTreeSet<Symbol>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `symbol` behave like a ticker the provider has never heard of.
    pub fn without_symbol(mut self, symbol: Symbol) -> Self {
        self.unknown.insert(symbol);
        self
    }

    fn generate(&self, req: &HistoryRequest) -> Result<Series, SourceError> {
        if self.unknown.contains(&req.symbol) {
            return Err(SourceError::not_found(format!(
                "fixture has no data for {}",
                req.symbol
            )));
        }

        let seed = symbol_seed(&req.symbol);
        let base = 50.0 + (seed % 150) as f64;
        let mut records = Vec::new();
        let mut day = Some(req.range.start());
        let mut index = 0u64;

        while let Some(date) = day.filter(|date| req.range.contains(*date)) {
            if !date.is_weekend() {
                let drift = (((seed + index * 7) % 21) as f64 - 10.0) / 100.0;
                let open = base * (1.0 + drift);
                let close = base * (1.0 + drift + 0.005);
                let high = open.max(close) * 1.01;
                let low = open.min(close) * 0.99;
                let volume = 1_000_000 + ((seed + index * 37) % 500) * 1_000;

                let record = PriceRecord::new(date, open, high, low, close, volume)
                    .map_err(|e| SourceError::invalid_response(e.to_string()))?;
                records.push(record);
                index += 1;
            }
            day = date.next_day();
        }

        Series::new(req.symbol.clone(), records)
            .map_err(|e| SourceError::invalid_response(e.to_string()))
    }
}

impl PriceSource for FixtureSource {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Series, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.generate(&req) })
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}
