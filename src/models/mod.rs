//! Data models for sizing requests and their derived results.

mod trade;

pub use trade::{TradeInput, TradeOutput, TradeSide};
