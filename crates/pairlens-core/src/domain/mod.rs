//! # Domain Models
//!
//! Strongly-typed inputs and price data for the pair analysis.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker, normalized to uppercase |
//! | [`TradeDate`] | Calendar date (`YYYY-MM-DD`) |
//! | [`DateRange`] | Half-open `[start, end)` window with `start < end` |
//! | [`PriceSeries`] | Date-ordered adjusted closes for one symbol |
//! | [`PriceTable`] | Two series inner-joined on shared dates |
//!
//! All types enforce their invariants at construction time and return
//! [`ValidationError`](crate::ValidationError) otherwise.

mod series;
mod symbol;
mod trade_date;

pub use series::{PricePoint, PriceRow, PriceSeries, PriceTable};
pub use symbol::Symbol;
pub use trade_date::{DateRange, TradeDate};
