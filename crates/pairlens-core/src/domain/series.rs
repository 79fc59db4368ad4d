use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{DateRange, Symbol, TradeDate, ValidationError};

/// Adjusted close for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: TradeDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: TradeDate, price: f64) -> Result<Self, ValidationError> {
        validate_positive("price", price)?;
        Ok(Self { date, price })
    }
}

/// Date-ordered adjusted closes for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, enforcing strictly increasing dates and positive prices.
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        for point in &points {
            validate_positive("price", point.price)?;
        }
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ValidationError::UnorderedDates {
                    date: pair[1].date.to_string(),
                });
            }
        }
        Ok(Self { symbol, points })
    }

    pub fn from_pairs<I>(symbol: Symbol, pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (TradeDate, f64)>,
    {
        let points = pairs
            .into_iter()
            .map(|(date, price)| PricePoint::new(date, price))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keeps only the points whose date falls in `range`.
    pub fn restrict_to(mut self, range: &DateRange) -> Self {
        self.points.retain(|point| range.contains(point.date));
        self
    }
}

/// One joined row: the date and the price of each instrument on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRow {
    pub date: TradeDate,
    pub prices: [f64; 2],
}

/// Two price series inner-joined on the dates they share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTable {
    symbols: [Symbol; 2],
    rows: Vec<PriceRow>,
    #[serde(skip)]
    dropped_dates: usize,
}

impl PriceTable {
    /// Joins on shared dates only. A date missing from either side is dropped
    /// rather than filled.
    pub fn inner_join(first: &PriceSeries, second: &PriceSeries) -> Self {
        let left = first.points();
        let right = second.points();
        let mut rows = Vec::with_capacity(left.len().min(right.len()));
        let (mut i, mut j) = (0, 0);

        while i < left.len() && j < right.len() {
            match left[i].date.cmp(&right[j].date) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    rows.push(PriceRow {
                        date: left[i].date,
                        prices: [left[i].price, right[j].price],
                    });
                    i += 1;
                    j += 1;
                }
            }
        }

        let dropped_dates = (left.len() - rows.len()) + (right.len() - rows.len());
        Self {
            symbols: [first.symbol().clone(), second.symbol().clone()],
            rows,
            dropped_dates,
        }
    }

    pub fn symbols(&self) -> &[Symbol; 2] {
        &self.symbols
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of single-sided dates discarded by the join, summed over both inputs.
    pub fn dropped_dates(&self) -> usize {
        self.dropped_dates
    }

    pub fn dates(&self) -> Vec<TradeDate> {
        self.rows.iter().map(|row| row.date).collect()
    }

    /// Prices of instrument `index` (0 or 1) in date order.
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row.prices[index]).collect()
    }

    /// The last `n` rows, or all rows when fewer exist.
    pub fn tail(&self, n: usize) -> &[PriceRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
