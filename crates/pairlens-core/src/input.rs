//! Input collection: turns raw form values into a validated [`AnalysisRequest`].

use serde::Serialize;

use crate::{DateRange, Symbol, TradeDate, ValidationError};

/// Two normalized symbols and the window to analyse them over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    symbols: [Symbol; 2],
    range: DateRange,
}

impl AnalysisRequest {
    /// Validates and normalizes the caller's input. Performs no I/O.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] when either identifier is empty or malformed, or
    /// when `start` is not strictly before `end`.
    pub fn new(
        first: &str,
        second: &str,
        start: TradeDate,
        end: TradeDate,
    ) -> Result<Self, ValidationError> {
        let first = Symbol::parse(first)?;
        let second = Symbol::parse(second)?;
        let range = DateRange::new(start, end)?;

        Ok(Self {
            symbols: [first, second],
            range,
        })
    }

    pub fn symbols(&self) -> &[Symbol; 2] {
        &self.symbols
    }

    pub fn first(&self) -> &Symbol {
        &self.symbols[0]
    }

    pub fn second(&self) -> &Symbol {
        &self.symbols[1]
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }
}
