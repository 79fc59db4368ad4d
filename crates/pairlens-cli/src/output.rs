use std::io::{self, Write};

use pairlens_core::{AnalysisError, Envelope, EnvelopeError, EnvelopeMeta};

use crate::cli::OutputFormat;
use crate::commands::AnalysisRun;
use crate::error::CliError;

const COLUMN_WIDTH: usize = 12;

pub fn render(run: &AnalysisRun, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let envelope = Envelope::success(run.meta.clone(), run.data());
            print_json(&envelope, pretty)?;
        }
        OutputFormat::Table => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_table(&mut out, run)?;
        }
    }

    Ok(())
}

/// JSON output gets a failure envelope on stdout; table output relies on the
/// error line `main` prints to stderr.
pub fn render_failure(
    error: &AnalysisError,
    meta: EnvelopeMeta,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    if format == OutputFormat::Json {
        print_json(&failure_envelope(error, meta), pretty)?;
    }
    Ok(())
}

pub fn failure_envelope(error: &AnalysisError, meta: EnvelopeMeta) -> Envelope<()> {
    Envelope::failure(meta, EnvelopeError::from(error))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{payload}");
    Ok(())
}

pub fn write_table<W: Write>(out: &mut W, run: &AnalysisRun) -> io::Result<()> {
    let outcome = &run.outcome;
    let report = &outcome.report;
    let [first, second] = outcome.request.symbols();

    writeln!(
        out,
        "{first} vs {second}  {}  ({} shared dates, source {})",
        outcome.request.range(),
        outcome.price_table.len(),
        run.meta.source
    )?;

    let tail = outcome.price_table.tail(run.tail);
    if !tail.is_empty() {
        writeln!(out)?;
        writeln!(out, "Last {} price rows", tail.len())?;
        write_header(out, "date", [first.as_str(), second.as_str()])?;
        for row in tail {
            write_row(out, &row.date.to_string(), row.prices, 4)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Daily return statistics")?;
    write_header(out, "stat", [first.as_str(), second.as_str()])?;
    let [a, b] = [&report.stats[0].stats, &report.stats[1].stats];
    writeln!(
        out,
        "{:<COLUMN_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}",
        "count", a.count, b.count
    )?;
    for (label, values) in [
        ("mean", [a.mean, b.mean]),
        ("std", [a.std, b.std]),
        ("min", [a.min, b.min]),
        ("25%", [a.p25, b.p25]),
        ("50%", [a.p50, b.p50]),
        ("75%", [a.p75, b.p75]),
        ("max", [a.max, b.max]),
    ] {
        write_row(out, label, values, 6)?;
    }

    let matrix = &report.charts.correlation;
    writeln!(out)?;
    writeln!(out, "Correlation matrix")?;
    write_header(out, "", [matrix.labels[0].as_str(), matrix.labels[1].as_str()])?;
    for (label, values) in matrix.labels.iter().zip(matrix.values) {
        write_row(out, label.as_str(), values, 4)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Correlation {:.4} ({}): {}",
        report.correlation,
        report.diversification.as_str(),
        report.diversification.summary()
    )?;

    if let Some(path) = &run.chart_path {
        writeln!(out, "Chart {} written to {}", outcome.chart, path.display())?;
    }

    if !run.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &run.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    Ok(())
}

fn write_header<W: Write>(out: &mut W, corner: &str, labels: [&str; 2]) -> io::Result<()> {
    writeln!(
        out,
        "{corner:<COLUMN_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}",
        labels[0], labels[1]
    )
}

fn write_row<W: Write>(
    out: &mut W,
    label: &str,
    values: [f64; 2],
    precision: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "{label:<COLUMN_WIDTH$}{:>COLUMN_WIDTH$.precision$}{:>COLUMN_WIDTH$.precision$}",
        values[0], values[1]
    )
}

#[cfg(test)]
mod tests {
    use pairlens_core::{ChartChoice, FixtureSource, Pipeline, ProviderId, TradeDate};

    use super::*;

    async fn mock_run(tail: usize) -> AnalysisRun {
        let outcome = Pipeline::new(FixtureSource::synthetic())
            .run(
                "AAPL",
                "KO",
                TradeDate::parse("2024-01-01").expect("start"),
                TradeDate::parse("2024-02-01").expect("end"),
                ChartChoice::CorrelationMatrix,
            )
            .await
            .expect("mock run succeeds");
        AnalysisRun {
            outcome,
            meta: EnvelopeMeta::new(ProviderId::Fixture, 1),
            tail,
            chart_path: None,
        }
    }

    #[tokio::test]
    async fn table_lists_tail_stats_and_matrix() {
        let run = mock_run(2).await;
        let mut out = Vec::new();
        write_table(&mut out, &run).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.starts_with("AAPL vs KO  2024-01-01..2024-02-01"));
        assert!(text.contains("Last 2 price rows"));
        assert!(text.contains("2024-01-31"));
        assert!(text.contains("Daily return statistics"));
        assert!(text.contains("25%"));
        assert!(text.contains("Correlation matrix"));
        assert!(text.contains("1.0000"));
        assert!(!text.contains("warnings:"));
    }

    #[tokio::test]
    async fn zero_tail_skips_price_rows() {
        let run = mock_run(0).await;
        let mut out = Vec::new();
        write_table(&mut out, &run).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");

        assert!(!text.contains("price rows"));
    }

    #[test]
    fn rows_are_right_aligned_with_fixed_precision() {
        let mut out = Vec::new();
        write_row(&mut out, "mean", [0.5, -0.25], 4).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");

        assert_eq!(text, "mean              0.5000     -0.2500\n");
    }
}
