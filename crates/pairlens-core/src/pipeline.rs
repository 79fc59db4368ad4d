//! End-to-end run: validate, fetch both series, join, compute returns, report.
//!
//! A run either yields a complete [`AnalysisOutcome`] or one terminal
//! [`AnalysisError`]. Fetches are sequential (first symbol, then second) and
//! nothing is fetched when validation fails.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisReport, ChartChoice, ChartView};
use crate::data_source::{PriceRequest, PriceSource};
use crate::{
    AnalysisError, AnalysisRequest, PriceSeries, PriceTable, ReturnTable, Symbol, TradeDate,
};

/// Everything one successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub request: AnalysisRequest,
    pub price_table: PriceTable,
    pub returns: ReturnTable,
    pub report: AnalysisReport,
    pub chart: ChartChoice,
    /// Dates present in only one of the two series and therefore excluded.
    pub dropped_dates: usize,
    pub latency_ms: u64,
}

impl AnalysisOutcome {
    /// The chart the caller asked for.
    pub fn selected_view(&self) -> ChartView<'_> {
        self.report.charts.view(self.chart)
    }
}

/// Drives the four analysis stages over one [`PriceSource`].
#[derive(Debug, Clone)]
pub struct Pipeline<S> {
    source: S,
}

impl<S> Pipeline<S>
where
    S: PriceSource,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs the full analysis for two raw identifiers over `[start, end)`.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Validation`] before any fetch for bad input.
    /// - [`AnalysisError::DataUnavailable`] naming the symbol whose fetch failed.
    /// - [`AnalysisError::InsufficientData`] when the shared dates cannot
    ///   support returns or a defined correlation.
    pub async fn run(
        &self,
        first: &str,
        second: &str,
        start: TradeDate,
        end: TradeDate,
        chart: ChartChoice,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let request = AnalysisRequest::new(first, second, start, end)?;
        self.run_request(request, chart).await
    }

    /// Same as [`Pipeline::run`] for an already validated request.
    pub async fn run_request(
        &self,
        request: AnalysisRequest,
        chart: ChartChoice,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let started = Instant::now();

        let first = self.fetch(request.first(), &request).await?;
        let second = if request.second() == request.first() {
            first.clone()
        } else {
            self.fetch(request.second(), &request).await?
        };

        let price_table = PriceTable::inner_join(&first, &second);
        let dropped_dates = price_table.dropped_dates();
        if dropped_dates > 0 {
            warn!(
                first = %request.first(),
                second = %request.second(),
                dropped_dates,
                kept = price_table.len(),
                "dropped dates not shared by both series"
            );
        }

        let returns = ReturnTable::from_prices(&price_table)?;
        let report = AnalysisReport::from_tables(&price_table, &returns)?;
        let latency_ms = started.elapsed().as_millis() as u64;

        info!(
            first = %request.first(),
            second = %request.second(),
            range = %request.range(),
            rows = price_table.len(),
            correlation = report.correlation,
            latency_ms,
            "analysis complete"
        );

        Ok(AnalysisOutcome {
            request,
            price_table,
            returns,
            report,
            chart,
            dropped_dates,
            latency_ms,
        })
    }

    async fn fetch(
        &self,
        symbol: &Symbol,
        request: &AnalysisRequest,
    ) -> Result<PriceSeries, AnalysisError> {
        debug!(source = %self.source.id(), %symbol, range = %request.range(), "fetching adjusted closes");

        let series = self
            .source
            .adjusted_closes(PriceRequest::new(symbol.clone(), *request.range()))
            .await
            .map_err(|error| AnalysisError::data_unavailable(symbol, error))?;

        debug!(%symbol, points = series.len(), "fetched adjusted closes");
        Ok(series)
    }
}
