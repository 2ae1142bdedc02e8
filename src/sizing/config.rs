//! Sizing defaults, overridable from the environment.

use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Defaults used when the CLI is not given a value explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Account capital in USD
    pub capital: Decimal,

    /// Stop-loss distance as a percentage of entry, for the risk table
    pub stop_loss_percent: Decimal,

    /// Comma-separated risk percentages for the risk table
    pub risk_levels: String,

    /// Leverage multiplier for the risk table (1 = no leverage)
    pub leverage: Decimal,

    /// Decimal places shown when printing results
    pub display_decimals: u32,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            capital: dec!(1000),
            stop_loss_percent: dec!(1.5),
            risk_levels: "0.25, 0.5, 1, 2".to_string(),
            leverage: Decimal::ONE,
            display_decimals: 2,
        }
    }
}

impl SizingConfig {
    /// Load defaults, overriding from environment variables (and `.env`):
    /// - RISKCALC_CAPITAL
    /// - RISKCALC_STOP_LOSS_PERCENT
    /// - RISKCALC_RISK_LEVELS
    /// - RISKCALC_LEVERAGE
    /// - RISKCALC_DISPLAY_DECIMALS
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("RISKCALC_CAPITAL") {
            config.capital = Decimal::from_str(v.trim()).context("Invalid RISKCALC_CAPITAL")?;
        }
        if let Some(v) = lookup("RISKCALC_STOP_LOSS_PERCENT") {
            config.stop_loss_percent =
                Decimal::from_str(v.trim()).context("Invalid RISKCALC_STOP_LOSS_PERCENT")?;
        }
        if let Some(v) = lookup("RISKCALC_RISK_LEVELS") {
            config.risk_levels = v;
        }
        if let Some(v) = lookup("RISKCALC_LEVERAGE") {
            config.leverage = Decimal::from_str(v.trim()).context("Invalid RISKCALC_LEVERAGE")?;
        }
        if let Some(v) = lookup("RISKCALC_DISPLAY_DECIMALS") {
            config.display_decimals = v
                .trim()
                .parse()
                .context("Invalid RISKCALC_DISPLAY_DECIMALS")?;
        }

        Ok(config)
    }
}
