//! Analysis reporting: statistics, correlation, and the three chart views.
//!
//! | View | Chart | Source |
//! |------|-------|--------|
//! | [`PriceChart`] | multi-line time series | joined price table |
//! | [`ReturnScatter`] | 2-D scatter | paired return vectors |
//! | [`CorrelationMatrix`] | 2×2 matrix | Pearson coefficient |
//!
//! The report always carries all three; the presentation layer picks one
//! through [`ChartData::view`].

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::stats::{pearson, DescriptiveStats};
use crate::{AnalysisError, PriceTable, ReturnTable, Symbol, TradeDate};

/// Which chart the caller wants to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartChoice {
    PriceEvolution,
    ReturnRelationship,
    CorrelationMatrix,
}

impl ChartChoice {
    pub const ALL: [Self; 3] = [
        Self::PriceEvolution,
        Self::ReturnRelationship,
        Self::CorrelationMatrix,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceEvolution => "price_evolution",
            Self::ReturnRelationship => "return_relationship",
            Self::CorrelationMatrix => "correlation_matrix",
        }
    }
}

impl Display for ChartChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reading of the correlation in diversification terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Diversification {
    /// Below zero: the instruments tend to move in opposite directions.
    Negative,
    /// `[0, 0.3)`.
    Low,
    /// `[0.3, 0.7)`.
    Moderate,
    /// `0.7` and above.
    High,
}

impl Diversification {
    pub fn from_correlation(correlation: f64) -> Self {
        if correlation < 0.0 {
            Self::Negative
        } else if correlation < 0.3 {
            Self::Low
        } else if correlation < 0.7 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    /// Whether combining the pair meaningfully reduces portfolio risk.
    pub const fn diversifies(self) -> bool {
        matches!(self, Self::Negative | Self::Low)
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::Negative => {
                "returns move in opposite directions; combining them reduces overall risk"
            }
            Self::Low => "returns barely move together; combining them reduces overall risk",
            Self::Moderate => "returns partly move together; diversification benefit is limited",
            Self::High => "returns move together; combining them adds little diversification",
        }
    }
}

/// Summary statistics labelled with their symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolStats {
    pub symbol: Symbol,
    #[serde(flatten)]
    pub stats: DescriptiveStats,
}

/// Price evolution of both instruments over the joined dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub symbols: [Symbol; 2],
    pub dates: Vec<TradeDate>,
    pub prices: [Vec<f64>; 2],
}

/// Paired daily returns: `x` is the first instrument, `y` the second.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnScatter {
    pub x_symbol: Symbol,
    pub y_symbol: Symbol,
    pub points: Vec<(f64, f64)>,
}

/// Symmetric 2×2 correlation matrix with unit diagonal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: [Symbol; 2],
    pub values: [[f64; 2]; 2],
}

impl CorrelationMatrix {
    pub fn from_coefficient(labels: [Symbol; 2], correlation: f64) -> Self {
        Self {
            labels,
            values: [[1.0, correlation], [correlation, 1.0]],
        }
    }

    pub fn coefficient(&self) -> f64 {
        self.values[0][1]
    }
}

/// All chart-ready projections of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub prices: PriceChart,
    pub returns: ReturnScatter,
    pub correlation: CorrelationMatrix,
}

/// Borrowed view selected by a [`ChartChoice`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ChartView<'a> {
    PriceEvolution(&'a PriceChart),
    ReturnRelationship(&'a ReturnScatter),
    CorrelationMatrix(&'a CorrelationMatrix),
}

impl ChartData {
    pub fn view(&self, choice: ChartChoice) -> ChartView<'_> {
        match choice {
            ChartChoice::PriceEvolution => ChartView::PriceEvolution(&self.prices),
            ChartChoice::ReturnRelationship => ChartView::ReturnRelationship(&self.returns),
            ChartChoice::CorrelationMatrix => ChartView::CorrelationMatrix(&self.correlation),
        }
    }
}

/// Statistics, correlation and chart data derived from one return table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub stats: [SymbolStats; 2],
    pub correlation: f64,
    pub diversification: Diversification,
    pub charts: ChartData,
}

impl AnalysisReport {
    /// # Errors
    ///
    /// [`AnalysisError::InsufficientData`] when fewer than two return rows
    /// exist or either return series is constant.
    pub fn from_tables(prices: &PriceTable, returns: &ReturnTable) -> Result<Self, AnalysisError> {
        let [first, second] = returns.symbols().clone();
        let xs = returns.column(0);
        let ys = returns.column(1);

        let correlation = pearson(&xs, &ys)?;
        let stats = [
            SymbolStats {
                stats: DescriptiveStats::from_values(&format!("returns of {first}"), &xs)?,
                symbol: first.clone(),
            },
            SymbolStats {
                stats: DescriptiveStats::from_values(&format!("returns of {second}"), &ys)?,
                symbol: second.clone(),
            },
        ];

        let charts = ChartData {
            prices: PriceChart {
                symbols: prices.symbols().clone(),
                dates: prices.dates(),
                prices: [prices.column(0), prices.column(1)],
            },
            returns: ReturnScatter {
                x_symbol: first.clone(),
                y_symbol: second.clone(),
                points: xs.iter().copied().zip(ys.iter().copied()).collect(),
            },
            correlation: CorrelationMatrix::from_coefficient([first, second], correlation),
        };

        Ok(Self {
            stats,
            correlation,
            diversification: Diversification::from_correlation(correlation),
            charts,
        })
    }
}
