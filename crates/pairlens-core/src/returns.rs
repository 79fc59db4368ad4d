//! Day-over-day fractional returns.

use serde::Serialize;

use crate::{AnalysisError, PriceSeries, PriceTable, Symbol, TradeDate};

/// Fractional change from the previous date's price, dated at the later date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnPoint {
    pub date: TradeDate,
    pub value: f64,
}

/// One joined return row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnRow {
    pub date: TradeDate,
    pub returns: [f64; 2],
}

/// Paired returns of two instruments over the joined price table.
/// Always one row shorter than the table it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnTable {
    symbols: [Symbol; 2],
    rows: Vec<ReturnRow>,
}

impl ReturnTable {
    /// # Errors
    ///
    /// [`AnalysisError::InsufficientData`] when the table has fewer than two rows.
    pub fn from_prices(table: &PriceTable) -> Result<Self, AnalysisError> {
        let rows = table.rows();
        if rows.len() < 2 {
            return Err(AnalysisError::insufficient(
                format!(
                    "returns of {}/{} (shared trading dates)",
                    table.symbols()[0],
                    table.symbols()[1]
                ),
                2,
                rows.len(),
            ));
        }

        let rows = rows
            .windows(2)
            .map(|pair| ReturnRow {
                date: pair[1].date,
                returns: [
                    pct_change(pair[0].prices[0], pair[1].prices[0]),
                    pct_change(pair[0].prices[1], pair[1].prices[1]),
                ],
            })
            .collect();

        Ok(Self {
            symbols: table.symbols().clone(),
            rows,
        })
    }

    pub fn symbols(&self) -> &[Symbol; 2] {
        &self.symbols
    }

    pub fn rows(&self) -> &[ReturnRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns of instrument `index` (0 or 1) in date order.
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row.returns[index]).collect()
    }

    pub fn points(&self, index: usize) -> Vec<ReturnPoint> {
        self.rows
            .iter()
            .map(|row| ReturnPoint {
                date: row.date,
                value: row.returns[index],
            })
            .collect()
    }
}

/// Returns of a single series, before any join.
///
/// # Errors
///
/// [`AnalysisError::InsufficientData`] when the series has fewer than two prices.
pub fn returns_of(series: &PriceSeries) -> Result<Vec<ReturnPoint>, AnalysisError> {
    let points = series.points();
    if points.len() < 2 {
        return Err(AnalysisError::insufficient(
            format!("returns of {}", series.symbol()),
            2,
            points.len(),
        ));
    }

    Ok(points
        .windows(2)
        .map(|pair| ReturnPoint {
            date: pair[1].date,
            value: pct_change(pair[0].price, pair[1].price),
        })
        .collect())
}

fn pct_change(previous: f64, current: f64) -> f64 {
    (current - previous) / previous
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnalysisErrorKind;

    fn day(value: &str) -> TradeDate {
        TradeDate::parse(value).expect("valid date")
    }

    fn series(symbol: &str, prices: &[f64]) -> PriceSeries {
        let start = day("2024-01-01");
        PriceSeries::from_pairs(
            Symbol::parse(symbol).expect("valid symbol"),
            prices
                .iter()
                .enumerate()
                .map(|(i, p)| (start.plus_days(i as i64).expect("date"), *p)),
        )
        .expect("valid series")
    }

    #[test]
    fn computes_fractional_change_and_drops_first_row() {
        let table = PriceTable::inner_join(
            &series("AAPL", &[100.0, 110.0, 99.0]),
            &series("KO", &[50.0, 50.0, 55.0]),
        );
        let returns = ReturnTable::from_prices(&table).expect("enough rows");

        assert_eq!(returns.len(), 2);
        assert_eq!(returns.rows()[0].date, day("2024-01-02"));
        assert!((returns.column(0)[0] - 0.10).abs() < 1e-12);
        assert!((returns.column(0)[1] - (-0.10)).abs() < 1e-12);
        assert_eq!(returns.column(1)[0], 0.0);
        assert!((returns.column(1)[1] - 0.10).abs() < 1e-12);
    }

    #[test]
    fn single_row_table_is_insufficient() {
        let table = PriceTable::inner_join(&series("AAPL", &[100.0]), &series("KO", &[50.0]));
        let err = ReturnTable::from_prices(&table).expect_err("must fail");
        assert_eq!(err.kind(), AnalysisErrorKind::InsufficientData);
    }

    #[test]
    fn returns_of_single_series() {
        let points = returns_of(&series("AAPL", &[10.0, 12.0, 9.0])).expect("enough prices");
        assert_eq!(points.len(), 2);
        assert!((points[0].value - 0.2).abs() < 1e-12);
        assert!((points[1].value - (-0.25)).abs() < 1e-12);

        let err = returns_of(&series("AAPL", &[10.0])).expect_err("must fail");
        assert!(matches!(
            err,
            AnalysisError::InsufficientData { required: 2, available: 1, .. }
        ));
    }
}
