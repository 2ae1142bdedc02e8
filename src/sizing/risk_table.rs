//! Risk table: dollar risk, notional position size and margin for several
//! risk levels at once, given a stop-loss expressed as a percentage.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Field, ValidationError};

pub const MIN_LEVERAGE: u32 = 1;
pub const MAX_LEVERAGE: u32 = 125;

/// Smallest stop-loss percentage accepted by the table.
pub const MIN_STOP_LOSS_PERCENT: Decimal = dec!(0.01);

/// Parse a comma-separated list of risk percentages.
///
/// Accepts `,` and the Arabic comma `،` as separators and skips empty
/// entries. Scientific notation (`1e-1`) is accepted. The result is sorted ascending with duplicates removed.
pub fn parse_risk_levels(input: &str) -> Result<Vec<Decimal>, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::new(
            Field::RiskLevels,
            "enter at least one risk level",
        ));
    }

    let mut levels = input
        .replace('،', ",")
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            Decimal::from_str(part)
                .or_else(|_| Decimal::from_scientific(part))
                .map(|d| d.normalize())
                .map_err(|_| {
                    ValidationError::new(
                        Field::RiskLevels,
                        format!("invalid risk level format: {:?}", part),
                    )
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    levels.sort();
    levels.dedup();

    Ok(levels)
}

/// Inputs for a risk table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRequest {
    /// Total account capital in USD
    pub capital: Decimal,

    /// Distance to the stop as a percentage of entry, in [0.01, 100)
    pub stop_loss_percent: Decimal,

    /// Risk percentages to tabulate, each in (0, 100)
    pub risk_levels: Vec<Decimal>,

    /// Leverage multiplier, 1 to 125
    pub leverage: Decimal,
}

/// One column of the table: figures for a single risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRow {
    pub risk_percent: Decimal,

    /// Maximum loss at this risk level
    pub dollar_risk: Decimal,

    /// Notional position size in USD
    pub position_size: Decimal,

    /// Margin at the requested leverage; absent when leverage is 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_required: Option<Decimal>,
}

/// Position sizes for each requested risk level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskTable {
    pub capital: Decimal,
    pub stop_loss_percent: Decimal,
    pub leverage: Decimal,
    pub rows: Vec<RiskRow>,
}

impl RiskTable {
    /// Validate the request and compute one row per risk level.
    ///
    /// Capital large enough to overflow the decimal range is rejected on
    /// `capital` rather than producing a partial table.
    pub fn build(request: &TableRequest) -> Result<Self, ValidationError> {
        Self::validate(request)?;

        let sl_factor = request.stop_loss_percent / dec!(100);
        let leveraged = request.leverage > Decimal::ONE;

        let rows = request
            .risk_levels
            .iter()
            .map(|&risk_percent| -> Result<RiskRow, ValidationError> {
                let dollar_risk = request
                    .capital
                    .checked_mul(risk_percent)
                    .and_then(|v| v.checked_div(dec!(100)))
                    .ok_or_else(too_large)?;
                let position_size = dollar_risk.checked_div(sl_factor).ok_or_else(too_large)?;
                let margin_required = if leveraged {
                    Some(position_size.checked_div(request.leverage).ok_or_else(too_large)?)
                } else {
                    None
                };

                Ok(RiskRow {
                    risk_percent,
                    dollar_risk,
                    position_size,
                    margin_required,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        debug!(
            capital = %request.capital,
            stop_loss_percent = %request.stop_loss_percent,
            leverage = %request.leverage,
            levels = rows.len(),
            "Built risk table"
        );

        Ok(Self {
            capital: request.capital,
            stop_loss_percent: request.stop_loss_percent,
            leverage: request.leverage,
            rows,
        })
    }

    /// Whether rows carry a margin figure.
    pub fn has_margin(&self) -> bool {
        self.leverage > Decimal::ONE
    }

    fn validate(request: &TableRequest) -> Result<(), ValidationError> {
        if request.capital <= Decimal::ZERO {
            return Err(ValidationError::new(Field::Capital, "must be greater than zero"));
        }

        if request.stop_loss_percent < MIN_STOP_LOSS_PERCENT {
            return Err(ValidationError::new(
                Field::StopLossPercent,
                format!("cannot be less than {}%", MIN_STOP_LOSS_PERCENT),
            ));
        }
        if request.stop_loss_percent >= dec!(100) {
            return Err(ValidationError::new(
                Field::StopLossPercent,
                "must be less than 100%",
            ));
        }

        if request.leverage < Decimal::from(MIN_LEVERAGE)
            || request.leverage > Decimal::from(MAX_LEVERAGE)
        {
            return Err(ValidationError::new(
                Field::Leverage,
                format!("must be between {} and {}", MIN_LEVERAGE, MAX_LEVERAGE),
            ));
        }

        if request.risk_levels.is_empty() {
            return Err(ValidationError::new(
                Field::RiskLevels,
                "enter at least one risk level",
            ));
        }

        if let Some(bad) = request
            .risk_levels
            .iter()
            .find(|&&r| r <= Decimal::ZERO || r >= dec!(100))
        {
            return Err(ValidationError::new(
                Field::RiskLevels,
                format!("each risk level must be between 0 and 100 (got {})", bad),
            ));
        }

        Ok(())
    }
}

fn too_large() -> ValidationError {
    ValidationError::new(Field::Capital, "too large to size at this stop-loss")
}
