use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use pairlens_core::{
    AnalysisError, AnalysisOutcome, AnalysisRequest, ChartChoice, ChartView, DateRange, Diversification,
    EnvelopeMeta, FetchConfig, FixtureSource, Pipeline, PriceRow, PriceSource, ProviderId,
    RetryConfig, RetryingSource, Symbol, SymbolStats, TradeDate, YahooAdapter,
};
use serde::Serialize;
use tracing::info;

use crate::chart;
use crate::cli::AnalyzeArgs;
use crate::error::CliError;

/// A completed analysis together with what the renderer needs around it.
#[derive(Debug)]
pub struct AnalysisRun {
    pub outcome: AnalysisOutcome,
    pub meta: EnvelopeMeta,
    pub tail: usize,
    pub chart_path: Option<PathBuf>,
}

/// A failed analysis and the metadata its failure envelope carries.
#[derive(Debug)]
pub struct AnalyzeFailure {
    pub error: CliError,
    pub meta: EnvelopeMeta,
}

/// JSON payload of a successful `analyze` run.
#[derive(Debug, Serialize)]
pub struct AnalysisData<'a> {
    pub symbols: &'a [Symbol; 2],
    pub range: &'a DateRange,
    pub rows: usize,
    pub dropped_dates: usize,
    pub tail: &'a [PriceRow],
    pub stats: &'a [SymbolStats; 2],
    pub correlation: f64,
    pub diversification: DiversificationData,
    pub chart: ChartData<'a>,
}

#[derive(Debug, Serialize)]
pub struct DiversificationData {
    pub level: Diversification,
    pub diversifies: bool,
    pub summary: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChartData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub view: ChartView<'a>,
}

impl AnalysisRun {
    pub fn data(&self) -> AnalysisData<'_> {
        let outcome = &self.outcome;
        let report = &outcome.report;
        AnalysisData {
            symbols: outcome.request.symbols(),
            range: outcome.request.range(),
            rows: outcome.price_table.len(),
            dropped_dates: outcome.dropped_dates,
            tail: outcome.price_table.tail(self.tail),
            stats: &report.stats,
            correlation: report.correlation,
            diversification: DiversificationData {
                level: report.diversification,
                diversifies: report.diversification.diversifies(),
                summary: report.diversification.summary(),
            },
            chart: ChartData {
                path: self
                    .chart_path
                    .as_ref()
                    .map(|path| path.display().to_string()),
                view: outcome.selected_view(),
            },
        }
    }
}

pub async fn run(args: &AnalyzeArgs) -> Result<AnalysisRun, AnalyzeFailure> {
    let started = Instant::now();
    let provider = if args.mock {
        ProviderId::Fixture
    } else {
        ProviderId::Yahoo
    };
    let fail = |error: CliError| AnalyzeFailure {
        error,
        meta: EnvelopeMeta::new(provider, started.elapsed().as_millis() as u64),
    };

    let request = build_request(args).map_err(|error| fail(CliError::Analysis(error)))?;
    let pipeline = Pipeline::new(build_source(args).map_err(fail)?);

    let outcome = pipeline
        .run_request(request, ChartChoice::from(args.chart))
        .await
        .map_err(|error| fail(CliError::Analysis(error)))?;

    let chart_path = match &args.chart_out {
        Some(path) => {
            chart::render(outcome.selected_view(), path).map_err(fail)?;
            info!(path = %path.display(), chart = %outcome.chart, "chart written");
            Some(path.clone())
        }
        None => None,
    };

    let mut meta = EnvelopeMeta::new(provider, started.elapsed().as_millis() as u64);
    if outcome.dropped_dates > 0 {
        meta.push_warning(format!(
            "{} dates not shared by both series were dropped",
            outcome.dropped_dates
        ));
    }

    Ok(AnalysisRun {
        outcome,
        meta,
        tail: args.tail,
        chart_path,
    })
}

/// Input problems surface as [`AnalysisError::Validation`] so JSON callers get
/// the same failure envelope as for fetch or data errors.
fn build_request(args: &AnalyzeArgs) -> Result<AnalysisRequest, AnalysisError> {
    let start = TradeDate::parse(&args.start)?;
    let end = TradeDate::parse(&args.end)?;
    Ok(AnalysisRequest::new(&args.first, &args.second, start, end)?)
}

fn build_source(args: &AnalyzeArgs) -> Result<RetryingSource<Arc<dyn PriceSource>>, CliError> {
    let source: Arc<dyn PriceSource> = if args.mock {
        Arc::new(FixtureSource::synthetic())
    } else {
        let mut config = FetchConfig::from_env();
        if let Some(timeout_ms) = args.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }
        Arc::new(YahooAdapter::new(config).map_err(|error| CliError::Command(error.to_string()))?)
    };

    let retry = if args.retries == 0 {
        RetryConfig::no_retry()
    } else {
        RetryConfig::exponential(args.retries)
    };
    Ok(RetryingSource::new(source, retry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ChartArg;
    use crate::output;

    fn args(first: &str, second: &str, start: &str, end: &str) -> AnalyzeArgs {
        AnalyzeArgs {
            first: first.to_owned(),
            second: second.to_owned(),
            start: start.to_owned(),
            end: end.to_owned(),
            chart: ChartArg::CorrelationMatrix,
            chart_out: None,
            tail: 3,
            mock: true,
            retries: 0,
            timeout_ms: None,
        }
    }

    #[tokio::test]
    async fn mock_run_builds_json_payload() {
        let run = run(&args("AAPL", "KO", "2024-01-01", "2024-03-01"))
            .await
            .expect("mock run succeeds");
        let json = serde_json::to_value(run.data()).expect("serializes");

        assert_eq!(json["symbols"][0], "AAPL");
        assert_eq!(json["tail"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["chart"]["kind"], "correlation_matrix");
        assert!(json["chart"].get("path").is_none());
        assert_eq!(run.meta.source, ProviderId::Fixture);
    }

    #[tokio::test]
    async fn malformed_date_is_a_validation_failure() {
        let failure = run(&args("AAPL", "KO", "01/01/2024", "2024-03-01"))
            .await
            .expect_err("bad date");

        assert_eq!(failure.error.exit_code(), 2);
        assert!(matches!(
            failure.error,
            CliError::Analysis(AnalysisError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn empty_symbol_yields_validation_failure_envelope() {
        let failure = run(&args("", "KO", "2024-01-01", "2024-03-01"))
            .await
            .expect_err("empty symbol");
        let CliError::Analysis(error) = &failure.error else {
            panic!("expected analysis error, got {:?}", failure.error);
        };

        let envelope = output::failure_envelope(error, failure.meta);
        let json = serde_json::to_value(&envelope).expect("serializes");

        assert!(json["data"].is_null());
        assert_eq!(json["errors"][0]["code"], "analysis.validation");
        assert_eq!(json["meta"]["source"], "fixture");
        assert_eq!(failure.error.exit_code(), 2);
    }

    #[tokio::test]
    async fn inverted_window_yields_validation_failure_envelope() {
        let failure = run(&args("AAPL", "KO", "2024-03-01", "2024-03-01"))
            .await
            .expect_err("start == end");
        let CliError::Analysis(error) = &failure.error else {
            panic!("expected analysis error, got {:?}", failure.error);
        };

        let json = serde_json::to_value(output::failure_envelope(error, failure.meta))
            .expect("serializes");
        assert_eq!(json["errors"][0]["code"], "analysis.validation");
    }

    #[tokio::test]
    async fn weekend_only_window_is_data_unavailable() {
        let failure = run(&args("AAPL", "KO", "2024-01-06", "2024-01-08"))
            .await
            .expect_err("no weekday prices");

        assert_eq!(failure.error.exit_code(), 3);
    }
}
