use thiserror::Error;

use crate::data_source::SourceError;
use crate::Symbol;

/// Input and contract errors exposed by `pairlens-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("start date {start} must be strictly before end date {end}")]
    InvertedDateRange { start: String, end: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be strictly positive")]
    NonPositiveValue { field: &'static str },
    #[error("price dates must be strictly increasing (offending date {date})")]
    UnorderedDates { date: String },
}

/// Stable classification of [`AnalysisError`] used for exit codes and envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisErrorKind {
    Validation,
    DataUnavailable,
    InsufficientData,
}

/// Terminal pipeline error. A run yields either a complete outcome or one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("price data unavailable for {symbol}: {source}")]
    DataUnavailable {
        symbol: Symbol,
        #[source]
        source: SourceError,
    },

    #[error("insufficient data for {what}: need at least {required} points, got {available}")]
    InsufficientData {
        what: String,
        required: usize,
        available: usize,
    },
}

impl AnalysisError {
    pub fn data_unavailable(symbol: &Symbol, source: SourceError) -> Self {
        Self::DataUnavailable {
            symbol: symbol.clone(),
            source,
        }
    }

    pub fn insufficient(what: impl Into<String>, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            what: what.into(),
            required,
            available,
        }
    }

    pub const fn kind(&self) -> AnalysisErrorKind {
        match self {
            Self::Validation(_) => AnalysisErrorKind::Validation,
            Self::DataUnavailable { .. } => AnalysisErrorKind::DataUnavailable,
            Self::InsufficientData { .. } => AnalysisErrorKind::InsufficientData,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            AnalysisErrorKind::Validation => "analysis.validation",
            AnalysisErrorKind::DataUnavailable => "analysis.data_unavailable",
            AnalysisErrorKind::InsufficientData => "analysis.insufficient_data",
        }
    }

    /// Whether re-invoking the run could succeed without changing the input.
    pub fn retryable(&self) -> bool {
        match self {
            Self::DataUnavailable { source, .. } => source.retryable(),
            _ => false,
        }
    }
}
