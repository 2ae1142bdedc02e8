//! Sizing logic: single-trade calculator, multi-level risk table, configuration.

mod calculator;
mod config;
mod error;
mod risk_table;

pub use calculator::RiskCalculator;
pub use config::SizingConfig;
pub use error::{Field, ValidationError};
pub use risk_table::{
    parse_risk_levels, RiskTable, TableRequest, MAX_LEVERAGE, MIN_LEVERAGE,
    MIN_STOP_LOSS_PERCENT,
};
