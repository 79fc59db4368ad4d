use std::collections::BTreeMap;

use time::Weekday;

use crate::data_source::{PriceFuture, PriceRequest, PriceSource, ProviderId, SourceError};
use crate::{PriceSeries, Symbol};

/// Longest window the synthetic generator will fill, in days.
const MAX_SYNTHETIC_DAYS: i64 = 366 * 50;

/// Deterministic offline price source.
///
/// Serves either a fixed set of series (missing symbols fail with
/// `NotFound`) or, when empty, a synthetic weekday random walk seeded by the
/// symbol so repeated runs agree.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    series: BTreeMap<Symbol, PriceSeries>,
}

impl FixtureSource {
    pub fn synthetic() -> Self {
        Self::default()
    }

    pub fn with_series(series: impl IntoIterator<Item = PriceSeries>) -> Self {
        Self {
            series: series
                .into_iter()
                .map(|s| (s.symbol().clone(), s))
                .collect(),
        }
    }

    fn serve(&self, req: &PriceRequest) -> Result<PriceSeries, SourceError> {
        let series = if self.series.is_empty() {
            synthetic_series(req)?
        } else {
            self.series
                .get(&req.symbol)
                .cloned()
                .ok_or_else(|| SourceError::not_found(format!("no fixture for {}", req.symbol)))?
                .restrict_to(&req.range)
        };

        if series.is_empty() {
            return Err(SourceError::not_found(format!(
                "no fixture prices for {} in {}",
                req.symbol, req.range
            )));
        }
        Ok(series)
    }
}

impl PriceSource for FixtureSource {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn adjusted_closes<'a>(&'a self, req: PriceRequest) -> PriceFuture<'a> {
        Box::pin(async move { self.serve(&req) })
    }
}

fn synthetic_series(req: &PriceRequest) -> Result<PriceSeries, SourceError> {
    let start = req.range.start();
    let days = start.days_until(req.range.end());
    if days > MAX_SYNTHETIC_DAYS {
        return Err(SourceError::invalid_request(format!(
            "fixture range {} is longer than {MAX_SYNTHETIC_DAYS} days",
            req.range
        )));
    }

    let seed = symbol_seed(&req.symbol);
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut price = 20.0 + (seed % 400) as f64;
    let drift = ((seed % 7) as f64 - 3.0) / 10_000.0;

    let mut pairs = Vec::new();
    for offset in 0..days {
        let Some(date) = start.plus_days(offset) else { break };
        if matches!(date.into_inner().weekday(), Weekday::Saturday | Weekday::Sunday) {
            continue;
        }
        let shock = (rng.f64() - 0.5) * 0.04;
        price = (price * (1.0 + drift + shock)).max(0.01);
        pairs.push((date, price));
    }

    Ok(PriceSeries::from_pairs(req.symbol.clone(), pairs)?)
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(5381_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}
