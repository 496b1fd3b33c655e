//! Data models for trades and account identifiers.

mod trade;

pub use trade::{parse_trade_date, AccountData, Trade, TradePage, TRADE_DATE_FORMAT, TRADE_DATE_KEY};
