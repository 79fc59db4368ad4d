use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::data_source::{PriceFuture, PriceRequest, PriceSource, ProviderId, SourceError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::RetryConfig;
use crate::{DateRange, PriceSeries, Symbol, TradeDate};

/// Yahoo Finance chart API adapter returning adjusted daily closes.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    config: FetchConfig,
    status_policy: RetryConfig,
}

impl YahooAdapter {
    /// Adapter over a real reqwest transport.
    pub fn new(config: FetchConfig) -> Result<Self, SourceError> {
        let client = ReqwestHttpClient::new(&config)
            .map_err(|e| SourceError::internal(format!("yahoo transport setup: {}", e.message())))?;
        Ok(Self::with_http_client(Arc::new(client), config))
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: FetchConfig) -> Self {
        Self {
            http_client,
            config,
            status_policy: RetryConfig::default(),
        }
    }

    fn chart_url(&self, req: &PriceRequest) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=div%2Csplit&includeAdjustedClose=true",
            self.config.base_url,
            urlencoding::encode(req.symbol.as_str()),
            req.range.start().unix_midnight(),
            req.range.end().unix_midnight(),
        )
    }

    fn auth(&self) -> HttpAuth {
        match &self.config.cookie {
            Some(cookie) => HttpAuth::Cookie(cookie.clone()),
            None => HttpAuth::None,
        }
    }

    async fn fetch_series(&self, req: PriceRequest) -> Result<PriceSeries, SourceError> {
        let url = self.chart_url(&req);
        debug!(symbol = %req.symbol, range = %req.range, %url, "requesting yahoo chart");

        let request = HttpRequest::get(url.as_str())
            .with_header("referer", "https://finance.yahoo.com/")
            .with_auth(&self.auth())
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", e.message()))
            }
        })?;

        if !response.is_success() {
            return Err(self.status_error(&req.symbol, response.status, &response.body));
        }

        parse_chart(&req.symbol, &req.range, &response.body)
    }

    fn status_error(&self, symbol: &Symbol, status: u16, body: &str) -> SourceError {
        if status == 404 {
            let detail = serde_json::from_str::<ChartEnvelope>(body)
                .ok()
                .and_then(|envelope| envelope.chart.error)
                .map(|error| error.to_string())
                .unwrap_or_else(|| String::from("not found"));
            return SourceError::not_found(format!("yahoo has no chart for {symbol}: {detail}"));
        }
        if status == 429 {
            return SourceError::rate_limited("yahoo returned status 429");
        }
        if self.status_policy.should_retry_status(status) {
            return SourceError::unavailable(format!("yahoo returned status {status}"));
        }
        if status == 400 {
            return SourceError::invalid_request(format!("yahoo rejected request for {symbol}"));
        }
        SourceError::internal(format!("yahoo returned status {status}"))
    }
}

impl PriceSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn adjusted_closes<'a>(&'a self, req: PriceRequest) -> PriceFuture<'a> {
        Box::pin(self.fetch_series(req))
    }
}

/// Parses a chart response body into the adjusted closes inside `range`.
///
/// Null closes are skipped. Timestamps are shifted by the exchange's GMT
/// offset before taking the calendar date; when two timestamps land on the
/// same date the later one wins.
pub(crate) fn parse_chart(
    symbol: &Symbol,
    range: &DateRange,
    body: &str,
) -> Result<PriceSeries, SourceError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = envelope.chart.error {
        return Err(SourceError::not_found(format!(
            "yahoo chart API error for {symbol}: {error}"
        )));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::not_found(format!("no chart data for {symbol}")))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = match result.indicators.adjclose.into_iter().next() {
        Some(indicator) => indicator.adjclose,
        None => {
            warn!(%symbol, "yahoo response has no adjclose; falling back to close");
            result
                .indicators
                .quote
                .into_iter()
                .next()
                .map(|quote| quote.close)
                .unwrap_or_default()
        }
    };

    if closes.len() != timestamps.len() {
        return Err(SourceError::malformed(format!(
            "yahoo chart for {symbol} has {} timestamps but {} closes",
            timestamps.len(),
            closes.len()
        )));
    }

    let offset = result.meta.gmt_offset.unwrap_or(0);
    let mut by_date = BTreeMap::new();
    for (ts, close) in timestamps.into_iter().zip(closes) {
        let Some(close) = close else { continue };
        let local = OffsetDateTime::from_unix_timestamp(ts.saturating_add(offset))
            .map_err(|e| SourceError::malformed(format!("invalid timestamp {ts}: {e}")))?;
        let date = TradeDate::new(local.date());
        if range.contains(date) {
            by_date.insert(date, close);
        }
    }

    if by_date.is_empty() {
        return Err(SourceError::not_found(format!(
            "yahoo returned no prices for {symbol} in {range}"
        )));
    }

    Ok(PriceSeries::from_pairs(symbol.clone(), by_date)?)
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

impl std::fmt::Display for ChartApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.code, description),
            None => f.write_str(&self.code),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "gmtoffset", default)]
    gmt_offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteIndicator>,
    #[serde(default)]
    adjclose: Vec<AdjCloseIndicator>,
}

#[derive(Debug, Deserialize)]
struct QuoteIndicator {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseIndicator {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
