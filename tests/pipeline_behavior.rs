//! Behavior-driven tests for the analysis pipeline
//!
//! These tests drive `Pipeline::run` end to end over a recording stub source
//! and check validation ordering, join semantics, error wrapping and the
//! numbers the report carries.

use std::collections::BTreeMap;
use std::sync::Mutex;

use pairlens_core::{
    AnalysisError, AnalysisErrorKind, ChartChoice, ChartView, Diversification, Pipeline,
    PriceFuture, PriceRequest, PriceSeries, PriceSource, ProviderId, SourceError,
    SourceErrorKind, Symbol, ValidationError,
};
use pairlens_tests::day;

/// Serves canned responses per symbol and records every request it receives.
#[derive(Default)]
struct RecordingSource {
    responses: BTreeMap<String, Result<Vec<(&'static str, f64)>, SourceError>>,
    calls: Mutex<Vec<PriceRequest>>,
}

impl RecordingSource {
    fn with_prices(mut self, symbol: &str, prices: Vec<(&'static str, f64)>) -> Self {
        self.responses.insert(symbol.to_owned(), Ok(prices));
        self
    }

    fn with_error(mut self, symbol: &str, error: SourceError) -> Self {
        self.responses.insert(symbol.to_owned(), Err(error));
        self
    }

    fn called_symbols(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|req| req.symbol.to_string())
            .collect()
    }
}

impl PriceSource for RecordingSource {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn adjusted_closes<'a>(&'a self, req: PriceRequest) -> PriceFuture<'a> {
        self.calls.lock().expect("calls lock").push(req.clone());

        let result = match self.responses.get(req.symbol.as_str()) {
            Some(Ok(prices)) => PriceSeries::from_pairs(
                req.symbol.clone(),
                prices
                    .iter()
                    .map(|(date, price)| (day(date), *price)),
            )
            .map_err(SourceError::from),
            Some(Err(error)) => Err(error.clone()),
            None => Err(SourceError::not_found(format!("no stub for {}", req.symbol))),
        };
        Box::pin(async move { result })
    }
}

fn three_row_stub() -> RecordingSource {
    RecordingSource::default()
        .with_prices(
            "AAPL",
            vec![("2022-01-03", 100.0), ("2022-01-04", 110.0), ("2022-01-05", 99.0)],
        )
        .with_prices(
            "KO",
            vec![("2022-01-03", 50.0), ("2022-01-04", 51.0), ("2022-01-05", 50.49)],
        )
}

// =============================================================================
// Pipeline: Input Validation
// =============================================================================

#[tokio::test]
async fn when_first_identifier_is_empty_then_validation_fails_before_any_fetch() {
    // Given: A pipeline over a stub that would happily serve data
    let pipeline = Pipeline::new(three_row_stub());

    // When: The user leaves the first identifier blank
    let result = pipeline
        .run(
            "",
            "KO",
            day("2022-01-01"),
            day("2025-01-01"),
            ChartChoice::PriceEvolution,
        )
        .await;

    // Then: A validation error is returned and the source was never called
    let error = result.expect_err("empty identifier must fail");
    assert_eq!(error, AnalysisError::Validation(ValidationError::EmptySymbol));
    assert!(pipeline.source().called_symbols().is_empty());
}

#[tokio::test]
async fn when_start_equals_end_then_validation_fails_before_any_fetch() {
    // Given: A pipeline over a stub source
    let pipeline = Pipeline::new(three_row_stub());

    // When: The range is empty
    let result = pipeline
        .run(
            "AAPL",
            "KO",
            day("2022-01-03"),
            day("2022-01-03"),
            ChartChoice::PriceEvolution,
        )
        .await;

    // Then: The range is rejected and nothing is fetched
    let error = result.expect_err("empty range must fail");
    assert!(matches!(
        error,
        AnalysisError::Validation(ValidationError::InvertedDateRange { .. })
    ));
    assert!(pipeline.source().called_symbols().is_empty());
}

#[tokio::test]
async fn when_identifier_is_lowercase_then_it_is_normalized_before_fetching() {
    // Given: A stub keyed by uppercase symbols
    let pipeline = Pipeline::new(three_row_stub());

    // When: The user types lowercase identifiers with whitespace
    let outcome = pipeline
        .run(
            " aapl ",
            "ko",
            day("2022-01-01"),
            day("2025-01-01"),
            ChartChoice::PriceEvolution,
        )
        .await
        .expect("normalized identifiers resolve");

    // Then: The source saw the normalized symbols, first then second
    assert_eq!(pipeline.source().called_symbols(), vec!["AAPL", "KO"]);
    assert_eq!(outcome.request.second().as_str(), "KO");
}

// =============================================================================
// Pipeline: Numbers
// =============================================================================

#[tokio::test]
async fn when_three_rows_are_fetched_then_two_returns_and_hand_computed_correlation_result() {
    // Given: Three aligned trading days for AAPL and KO
    let pipeline = Pipeline::new(three_row_stub());

    // When: The default window is analysed
    let outcome = pipeline
        .run(
            "AAPL",
            "KO",
            day("2022-01-01"),
            day("2025-01-01"),
            ChartChoice::ReturnRelationship,
        )
        .await
        .expect("three rows are enough");

    // Then: Each instrument has two returns with the exact formula
    assert_eq!(outcome.price_table.len(), 3);
    assert_eq!(outcome.returns.len(), 2);
    let aapl = outcome.returns.column(0);
    let ko = outcome.returns.column(1);
    assert!((aapl[0] - 0.10).abs() < 1e-12);
    assert!((aapl[1] - (99.0 - 110.0) / 110.0).abs() < 1e-12);
    assert!((ko[0] - 0.02).abs() < 1e-12);
    assert!((ko[1] - (-0.01)).abs() < 1e-9);

    // And: Both series move up then down, so two points correlate perfectly
    assert!((outcome.report.correlation - 1.0).abs() < 1e-6);
    assert_eq!(outcome.report.diversification, Diversification::High);

    // And: The requested view is the scatter of paired returns
    match outcome.selected_view() {
        ChartView::ReturnRelationship(scatter) => {
            assert_eq!(scatter.points.len(), 2);
            assert_eq!(scatter.x_symbol.as_str(), "AAPL");
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn when_five_rows_are_fetched_then_correlation_matches_hand_computation() {
    // Given: Five aligned days with mixed co-movement
    let dates = ["2022-01-03", "2022-01-04", "2022-01-05", "2022-01-06", "2022-01-07"];
    let aapl = [100.0, 102.0, 99.0, 101.0, 105.0];
    let ko = [60.0, 60.6, 60.3, 61.5, 61.2];
    let source = RecordingSource::default()
        .with_prices("AAPL", dates.iter().copied().zip(aapl).collect())
        .with_prices("KO", dates.iter().copied().zip(ko).collect());

    // When: The pair is analysed
    let outcome = Pipeline::new(source)
        .run(
            "AAPL",
            "KO",
            day("2022-01-01"),
            day("2025-01-01"),
            ChartChoice::CorrelationMatrix,
        )
        .await
        .expect("five rows are enough");

    // Then: Pearson r matches the value computed by hand to 6 decimals
    assert!((outcome.report.correlation - 0.280_433_615_675_467_4).abs() < 1e-6);
    assert_eq!(outcome.report.diversification, Diversification::Low);
    assert_eq!(outcome.report.stats[0].stats.count, 4);

    // And: The matrix view is symmetric with a unit diagonal
    let ChartView::CorrelationMatrix(matrix) = outcome.selected_view() else {
        panic!("expected correlation matrix view");
    };
    assert_eq!(matrix.values[0][0], 1.0);
    assert_eq!(matrix.values[0][1], matrix.values[1][0]);
}

#[tokio::test]
async fn when_dates_do_not_overlap_fully_then_only_shared_dates_are_used() {
    // Given: KO is missing one AAPL trading day and has one extra of its own
    let source = RecordingSource::default()
        .with_prices(
            "AAPL",
            vec![
                ("2022-01-03", 100.0),
                ("2022-01-04", 101.0),
                ("2022-01-05", 102.0),
                ("2022-01-06", 99.0),
            ],
        )
        .with_prices(
            "KO",
            vec![
                ("2022-01-03", 50.0),
                ("2022-01-05", 51.0),
                ("2022-01-06", 52.0),
                ("2022-01-07", 51.5),
            ],
        );

    // When: The pair is analysed
    let outcome = Pipeline::new(source)
        .run(
            "AAPL",
            "KO",
            day("2022-01-01"),
            day("2022-02-01"),
            ChartChoice::PriceEvolution,
        )
        .await
        .expect("three shared dates are enough");

    // Then: The join keeps the three shared dates and returns span them
    let dates: Vec<String> = outcome
        .price_table
        .dates()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(dates, vec!["2022-01-03", "2022-01-05", "2022-01-06"]);
    assert_eq!(outcome.dropped_dates, 2);
    assert!((outcome.returns.column(0)[0] - 0.02).abs() < 1e-12);
}

#[tokio::test]
async fn when_only_one_date_is_shared_then_insufficient_data_is_reported() {
    // Given: Series that overlap on a single day
    let source = RecordingSource::default()
        .with_prices("AAPL", vec![("2022-01-03", 100.0), ("2022-01-04", 101.0)])
        .with_prices("KO", vec![("2022-01-04", 50.0), ("2022-01-05", 51.0)]);

    // When: The pair is analysed
    let error = Pipeline::new(source)
        .run(
            "AAPL",
            "KO",
            day("2022-01-01"),
            day("2022-02-01"),
            ChartChoice::PriceEvolution,
        )
        .await
        .expect_err("one shared row cannot produce returns");

    // Then: The error says how much data was available
    assert_eq!(error.kind(), AnalysisErrorKind::InsufficientData);
    assert!(matches!(
        error,
        AnalysisError::InsufficientData { required: 2, available: 1, .. }
    ));
}

#[tokio::test]
async fn when_one_series_is_flat_then_insufficient_data_reports_the_shared_return_count() {
    // Given: A moving stock against a pegged instrument over five shared days
    let source = RecordingSource::default()
        .with_prices(
            "AAPL",
            vec![
                ("2022-01-03", 100.0),
                ("2022-01-04", 102.0),
                ("2022-01-05", 101.0),
                ("2022-01-06", 104.0),
                ("2022-01-07", 103.0),
            ],
        )
        .with_prices(
            "USDC",
            vec![
                ("2022-01-03", 1.0),
                ("2022-01-04", 1.0),
                ("2022-01-05", 1.0),
                ("2022-01-06", 1.0),
                ("2022-01-07", 1.0),
            ],
        );

    // When: The pair is analysed
    let error = Pipeline::new(source)
        .run(
            "AAPL",
            "USDC",
            day("2022-01-01"),
            day("2022-02-01"),
            ChartChoice::CorrelationMatrix,
        )
        .await
        .expect_err("flat returns leave correlation undefined");

    // Then: The error names the flat side and counts all four return rows
    assert_eq!(error.kind(), AnalysisErrorKind::InsufficientData);
    assert!(matches!(
        error,
        AnalysisError::InsufficientData { available: 4, .. }
    ));
    assert!(error.to_string().contains("zero variance in second series"));
}

#[tokio::test]
async fn when_same_symbol_is_given_twice_then_it_is_fetched_once_and_correlates_to_one() {
    // Given: A single stubbed symbol
    let pipeline = Pipeline::new(three_row_stub());

    // When: The user compares AAPL with itself
    let outcome = pipeline
        .run(
            "AAPL",
            "aapl",
            day("2022-01-01"),
            day("2025-01-01"),
            ChartChoice::CorrelationMatrix,
        )
        .await
        .expect("self comparison is allowed");

    // Then: One fetch, perfect correlation
    assert_eq!(pipeline.source().called_symbols(), vec!["AAPL"]);
    assert!((outcome.report.correlation - 1.0).abs() < 1e-12);
}

// =============================================================================
// Pipeline: Source Failures
// =============================================================================

#[tokio::test]
async fn when_source_cannot_connect_then_data_unavailable_names_the_symbol() {
    // Given: AAPL is served but KO fails with a connectivity error
    let source = three_row_stub().with_error(
        "KO",
        SourceError::unavailable("yahoo transport error: connection refused"),
    );
    let pipeline = Pipeline::new(source);

    // When: The pair is analysed
    let error = pipeline
        .run(
            "AAPL",
            "KO",
            day("2022-01-01"),
            day("2025-01-01"),
            ChartChoice::PriceEvolution,
        )
        .await
        .expect_err("connectivity failure is terminal");

    // Then: The error is DataUnavailable for KO and keeps the cause
    match &error {
        AnalysisError::DataUnavailable { symbol, source } => {
            assert_eq!(symbol, &Symbol::parse("KO").expect("valid"));
            assert_eq!(source.kind(), SourceErrorKind::Unavailable);
            assert!(source.message().contains("connection refused"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(error.retryable());
    assert_eq!(error.code(), "analysis.data_unavailable");
}

#[tokio::test]
async fn when_first_symbol_fails_then_second_is_never_fetched() {
    // Given: The first symbol is unknown to the source
    let pipeline = Pipeline::new(three_row_stub());

    // When: The pair is analysed
    let error = pipeline
        .run(
            "ZZZZ",
            "KO",
            day("2022-01-01"),
            day("2025-01-01"),
            ChartChoice::PriceEvolution,
        )
        .await
        .expect_err("unknown symbol fails");

    // Then: The run stops at the first failure
    assert_eq!(error.kind(), AnalysisErrorKind::DataUnavailable);
    assert_eq!(pipeline.source().called_symbols(), vec!["ZZZZ"]);
}

#[tokio::test]
async fn when_request_is_sent_then_source_receives_the_half_open_range() {
    // Given: A recording stub
    let pipeline = Pipeline::new(three_row_stub());

    // When: A run completes
    pipeline
        .run(
            "AAPL",
            "KO",
            day("2022-01-01"),
            day("2025-01-01"),
            ChartChoice::PriceEvolution,
        )
        .await
        .expect("run succeeds");

    // Then: Both requests carry the same validated range
    let calls = pipeline.source().calls.lock().expect("calls lock").clone();
    assert_eq!(calls.len(), 2);
    for call in calls {
        assert_eq!(call.range.start(), day("2022-01-01"));
        assert_eq!(call.range.end(), day("2025-01-01"));
    }
}
