//! Price source trait and request/error types.
//!
//! This module defines the adapter contract (`PriceSource`) the pipeline
//! fetches through. Any upstream that can return adjusted daily closes for a
//! symbol over a date range satisfies it.
//!
//! # Example
//!
//! ```rust,ignore
//! use pairlens_core::{DateRange, PriceRequest, PriceSource, Symbol, TradeDate, YahooAdapter};
//!
//! async fn fetch(adapter: &YahooAdapter) -> Result<(), Box<dyn std::error::Error>> {
//!     let range = DateRange::new(TradeDate::parse("2022-01-01")?, TradeDate::parse("2025-01-01")?)?;
//!     let series = adapter
//!         .adjusted_closes(PriceRequest::new(Symbol::parse("AAPL")?, range))
//!         .await?;
//!     println!("{} closes for {}", series.len(), series.symbol());
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;

use crate::{DateRange, PriceSeries, Symbol, ValidationError};

/// Canonical provider identifiers used in logs and envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Yahoo,
    Fixture,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Fixture => "fixture",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure, timeout or 5xx.
    Unavailable,
    RateLimited,
    /// Upstream knows nothing about the symbol or returned no rows.
    NotFound,
    /// Response could not be parsed into a price series.
    Malformed,
    InvalidRequest,
    Internal,
}

/// Structured price source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Malformed => "source.malformed",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::malformed(error.to_string())
    }
}

/// Request payload for one symbol's adjusted closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub symbol: Symbol,
    pub range: DateRange,
}

impl PriceRequest {
    pub fn new(symbol: Symbol, range: DateRange) -> Self {
        Self { symbol, range }
    }
}

/// Boxed future returned by [`PriceSource::adjusted_closes`].
pub type PriceFuture<'a> = Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;

/// Price source adapter contract.
///
/// Implementations must only return points inside `req.range` and must
/// return an error rather than an empty series.
pub trait PriceSource: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches adjusted daily closes for `req.symbol` over `req.range`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the provider is unreachable, knows no data
    /// for the symbol, or answers with something that is not a price series.
    fn adjusted_closes<'a>(&'a self, req: PriceRequest) -> PriceFuture<'a>;
}

impl<S> PriceSource for Arc<S>
where
    S: PriceSource + ?Sized,
{
    fn id(&self) -> ProviderId {
        (**self).id()
    }

    fn adjusted_closes<'a>(&'a self, req: PriceRequest) -> PriceFuture<'a> {
        (**self).adjusted_closes(req)
    }
}
