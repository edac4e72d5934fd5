//! # Finscreen Core
//!
//! Intent-driven stock screening against a CSV export endpoint.
//!
//! ## Overview
//!
//! - **Filter builder** turning a named intent plus caller overrides into a
//!   validated [`FilterSpec`]
//! - **Query compiler** producing the service's `f=` filter string and the
//!   rest of the export parameters
//! - **Response normalizer** turning CSV exports or HTML tables into typed
//!   [`StockRecord`]s, reporting dropped rows instead of failing
//! - **Screener** running build, fetch with retry and rate limiting,
//!   normalize, then ordering and truncation
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Endpoint, API key, timeouts and environment overrides |
//! | [`domain`] | [`Ticker`] and [`StockRecord`] |
//! | [`error`] | Filter, row, response and top-level errors |
//! | [`filter`] | Intents, profiles, overrides and the canonical spec |
//! | [`http_client`] | Transport abstraction with a reqwest implementation |
//! | [`normalize`] | CSV and HTML row normalization |
//! | [`query`] | Spec to query parameters, and back |
//! | [`retry`] | Backoff policy and sleeper |
//! | [`screener`] | End-to-end runs and fundamentals lookups |
//! | [`units`] | Unit-suffixed numeric cell parsing |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use finscreen_core::{Overrides, Screener, ScreenerConfig, ScreenerIntent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let screener = Screener::new(ScreenerConfig::from_env()?);
//!     let overrides = Overrides {
//!         market_cap: Some(String::from("largeover")),
//!         max_results: Some(10),
//!         ..Overrides::default()
//!     };
//!
//!     let report = screener.run(ScreenerIntent::VolumeSurge, &overrides).await?;
//!     for record in &report.records {
//!         println!("{} {:?}", record.ticker, record.change);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Compiling a query needs no network:
//!
//! ```rust
//! use finscreen_core::{build, query, Overrides, ScreenerIntent};
//!
//! let spec = build(ScreenerIntent::Etf, &Overrides::default()).unwrap();
//! let params = query::compile(&spec, None);
//! assert_eq!(params.get("o"), Some("-aum"));
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod http_client;
pub mod normalize;
pub mod query;
pub mod retry;
pub mod screener;
pub mod units;

pub use config::{ConfigError, ScreenerConfig};
pub use domain::{StockRecord, Ticker};
pub use error::{FilterError, ParseIssue, ResponseIssue, ScreenError, TickerError};
pub use filter::{
    build, Bound, EarningsDateInput, FilterKey, FilterSpec, FilterValue, Overrides,
    ScreenerIntent, SortField, SortOrder, SortSpec, TrendType,
};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use normalize::{normalize_csv, normalize_html, NormalizeReport, RawRow, ResponseShape, RowIssue};
pub use query::QueryParams;
pub use retry::{Backoff, RetryConfig, Sleeper, TokioSleeper};
pub use screener::{FundamentalsReport, Screener, ScreeningReport};

pub use finscreen_fields as fields;
