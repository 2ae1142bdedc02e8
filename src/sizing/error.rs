//! Validation errors for sizing inputs.

use thiserror::Error;

/// Input field a validation rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Capital,
    RiskPercent,
    EntryPrice,
    StopPrice,
    StopLossPercent,
    Leverage,
    RiskLevels,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Capital => "capital",
            Field::RiskPercent => "risk_percent",
            Field::EntryPrice => "entry_price",
            Field::StopPrice => "stop_price",
            Field::StopLossPercent => "stop_loss_percent",
            Field::Leverage => "leverage",
            Field::RiskLevels => "risk_levels",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An input constraint was violated. Nothing is computed when this is returned.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
