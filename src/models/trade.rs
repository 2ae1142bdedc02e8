//! Trade input and the sizing result derived from it.

use serde::{Deserialize, Serialize};

/// Direction implied by where the stop sits relative to entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    /// Stop below entry
    Long,
    /// Stop above entry
    Short,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Long => "LONG",
            TradeSide::Short => "SHORT",
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four numbers a trader supplies for one sizing calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeInput {
    /// Total trading account value
    pub capital: f64,

    /// Percentage of capital to lose if the stop is hit, in (0, 100]
    pub risk_percent: f64,

    /// Intended entry price of the instrument
    pub entry_price: f64,

    /// Price at which the position is closed for a loss
    pub stop_price: f64,
}

impl TradeInput {
    pub fn new(capital: f64, risk_percent: f64, entry_price: f64, stop_price: f64) -> Self {
        Self {
            capital,
            risk_percent,
            entry_price,
            stop_price,
        }
    }
}

/// Sizing result for a validated [`TradeInput`].
///
/// Values are unrounded; rounding for display happens in the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeOutput {
    /// Maximum loss accepted on the trade, in account currency
    pub risk_amount: f64,

    /// Absolute distance between entry and stop (always > 0)
    pub stop_distance: f64,

    /// Units of the instrument to trade
    pub position_size: f64,

    /// Notional exposure at the entry price
    pub position_value: f64,

    /// Long or short, from the stop placement
    pub side: TradeSide,

    /// Stop distance as a percentage of the entry price
    pub stop_loss_percent: f64,
}

impl TradeOutput {
    /// Fraction of capital the notional exposure represents (1.0 = fully invested).
    pub fn exposure_ratio(&self, capital: f64) -> f64 {
        if capital > 0.0 {
            self.position_value / capital
        } else {
            0.0
        }
    }

    /// Whether the position needs more than the account's capital.
    pub fn requires_leverage(&self, capital: f64) -> bool {
        self.position_value > capital
    }
}
