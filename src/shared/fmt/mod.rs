//! Human-readable formatting for prices, rates and KRW amounts.

pub mod num;

pub use num::{abbreviate_krw, format_index_level, format_price, format_rate, group_thousands};
