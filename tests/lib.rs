// Shared helpers for the pairlens behavior and property tests
pub use pairlens_core::{PriceSeries, Symbol, TradeDate};

pub fn day(value: &str) -> TradeDate {
    TradeDate::parse(value).expect("valid date")
}

/// Consecutive calendar days starting 2022-01-03, one per price.
pub fn series(symbol: &str, prices: &[f64]) -> PriceSeries {
    let start = day("2022-01-03");
    PriceSeries::from_pairs(
        Symbol::parse(symbol).expect("valid symbol"),
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| (start.plus_days(i as i64).expect("in range"), *p)),
    )
    .expect("positive prices on increasing dates")
}
