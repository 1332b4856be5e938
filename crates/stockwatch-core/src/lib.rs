//! # Stockwatch Core
//!
//! Stock profitability and trading-volume statistics over daily price history.
//!
//! ## Overview
//!
//! Data flows through three stages:
//!
//! 1. **Fetch**: [`Fetcher`] pulls a daily [`Series`] per ticker from a
//!    [`PriceSource`] ([`YahooSource`] online, [`FixtureSource`] offline).
//! 2. **Measure**: [`metrics`] derives percent change against a [`Baseline`]
//!    and day-over-day volume change as [`MetricSeries`].
//! 3. **Chart**: [`ChartBuilder`] turns metric series into a Vega-Lite
//!    [`ChartSpec`].
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo Finance and deterministic fixture sources |
//! | [`chart`] | Chart specs and Vega-Lite/HTML rendering |
//! | [`config`] | Source configuration from defaults and environment |
//! | [`data_source`] | Price source trait, requests, and source errors |
//! | [`domain`] | Symbols, dates, records, and series |
//! | [`error`] | Stage error types |
//! | [`fetcher`] | Range validation and per-ticker retrieval |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`metrics`] | Percent change, volume change, alignment |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockwatch_core::{metrics, Baseline, ChartBuilder, Fetcher, FetchConfig, Symbol, TradingDate, YahooSource};
//!
//! let fetcher = Fetcher::new(Arc::new(YahooSource::new(FetchConfig::from_env()?)));
//! let series = fetcher
//!     .fetch(&Symbol::parse("AAPL")?, TradingDate::parse("2017-01-01")?, TradingDate::parse("2017-01-10")?)
//!     .await?;
//! let pct = metrics::percent_change(&series, Baseline::PeriodStart)?;
//! let chart = ChartBuilder::line().title("AAPL").build(&[pct])?;
//! println!("{}", chart.to_json_string(true)?);
//! ```

pub mod adapters;
pub mod chart;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod metrics;

pub use adapters::{FixtureSource, YahooSource};

pub use chart::{ChartBuilder, ChartKind, ChartRow, ChartSpec, ColorScale};

pub use config::FetchConfig;

pub use data_source::{
    DateRange, HistoryRequest, PriceSource, ProviderId, SourceError, SourceErrorKind,
};

pub use domain::{
    MetricKind, MetricPoint, MetricSeries, PriceRecord, Series, Symbol, TradingDate,
    VolumeChange, VolumeDirection,
};

pub use error::{ChartError, FetchError, MetricError, ValidationError};

pub use fetcher::Fetcher;

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use metrics::Baseline;
