//! # pairlens core
//!
//! Return and correlation analysis for a pair of instruments.
//!
//! ## Overview
//!
//! Given two ticker symbols and a date window, the crate fetches adjusted
//! daily closes, joins them on shared trading dates, computes day-over-day
//! fractional returns, and reports:
//!
//! - **Descriptive statistics** per instrument (count, mean, sample std, quartiles)
//! - **Pearson correlation** of the two return series
//! - **Chart-ready views**: price evolution, return scatter, correlation matrix
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Price sources (Yahoo chart API, deterministic fixtures) |
//! | [`analysis`] | Report, chart selection and chart views |
//! | [`config`] | Fetch configuration from the environment |
//! | [`data_source`] | `PriceSource` trait and request/error types |
//! | [`domain`] | Symbols, dates, price series and joined tables |
//! | [`envelope`] | JSON response envelope with metadata |
//! | [`error`] | Validation and analysis errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`input`] | Input collection and validation |
//! | [`pipeline`] | End-to-end run |
//! | [`retry`] | Backoff policy and retrying source wrapper |
//! | [`returns`] | Return calculation |
//! | [`stats`] | Descriptive statistics and Pearson correlation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pairlens_core::{ChartChoice, Pipeline, TradeDate, YahooAdapter, FetchConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(YahooAdapter::new(FetchConfig::from_env())?);
//!     let outcome = pipeline
//!         .run(
//!             "AAPL",
//!             "KO",
//!             TradeDate::parse("2022-01-01")?,
//!             TradeDate::parse("2025-01-01")?,
//!             ChartChoice::ReturnRelationship,
//!         )
//!         .await?;
//!
//!     println!("correlation: {:.4}", outcome.report.correlation);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │ raw symbols + dates
//!          ▼
//! ┌─────────────────┐
//! │ Input Collector │  AnalysisRequest (validated, no I/O)
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Price Source    │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest/stub)   │
//! └────────┬────────┘     └──────────────────┘
//!          │ two PriceSeries, inner-joined
//!          ▼
//! ┌─────────────────┐
//! │ Return Calc     │  ReturnTable (N-1 rows)
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ Analysis Report │  stats, correlation, chart views
//! └─────────────────┘
//! ```

pub mod adapters;
pub mod analysis;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod input;
pub mod pipeline;
pub mod retry;
pub mod returns;
pub mod stats;

pub use adapters::{FixtureSource, YahooAdapter};
pub use analysis::{
    AnalysisReport, ChartChoice, ChartData, ChartView, CorrelationMatrix, Diversification,
    PriceChart, ReturnScatter, SymbolStats,
};
pub use config::FetchConfig;
pub use data_source::{
    PriceFuture, PriceRequest, PriceSource, ProviderId, SourceError, SourceErrorKind,
};
pub use domain::{DateRange, PricePoint, PriceRow, PriceSeries, PriceTable, Symbol, TradeDate};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{AnalysisError, AnalysisErrorKind, ValidationError};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use input::AnalysisRequest;
pub use pipeline::{AnalysisOutcome, Pipeline};
pub use retry::{Backoff, RetryConfig, RetryingSource};
pub use returns::{returns_of, ReturnPoint, ReturnRow, ReturnTable};
pub use stats::{pearson, DescriptiveStats};
