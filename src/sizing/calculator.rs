//! Risk-based position sizing for a single trade.
//!
//! risk_amount   = capital * risk_percent / 100
//! stop_distance = |entry - stop|
//! position_size = risk_amount / stop_distance
//! position_value = position_size * entry

use tracing::debug;

use crate::models::{TradeInput, TradeOutput, TradeSide};
use super::risk_table::{MAX_LEVERAGE, MIN_LEVERAGE};
use super::{Field, ValidationError};

/// Stateless calculator turning a [`TradeInput`] into a [`TradeOutput`].
pub struct RiskCalculator;

impl RiskCalculator {
    /// Validate the input and compute the position size.
    ///
    /// Checks run in field order (capital, risk percent, entry, stop) and the
    /// first violation is returned. Equal entry and stop prices are reported
    /// against `stop_price`. Results that overflow `f64` are reported against
    /// `capital`.
    pub fn compute(input: &TradeInput) -> Result<TradeOutput, ValidationError> {
        Self::validate(input)?;

        let risk_amount = input.capital * input.risk_percent / 100.0;
        let stop_distance = (input.entry_price - input.stop_price).abs();
        let position_size = risk_amount / stop_distance;
        let position_value = position_size * input.entry_price;

        if !(risk_amount.is_finite() && position_size.is_finite() && position_value.is_finite()) {
            return Err(ValidationError::new(
                Field::Capital,
                "too large to size at this stop distance",
            ));
        }

        let side = if input.stop_price < input.entry_price {
            TradeSide::Long
        } else {
            TradeSide::Short
        };

        debug!(
            risk_amount,
            stop_distance,
            position_size,
            position_value,
            side = %side,
            "Computed position size"
        );

        Ok(TradeOutput {
            risk_amount,
            stop_distance,
            position_size,
            position_value,
            side,
            stop_loss_percent: stop_distance / input.entry_price * 100.0,
        })
    }

    /// Margin needed to open the position at the given leverage.
    pub fn margin_required(output: &TradeOutput, leverage: f64) -> Result<f64, ValidationError> {
        if !leverage.is_finite()
            || leverage < f64::from(MIN_LEVERAGE)
            || leverage > f64::from(MAX_LEVERAGE)
        {
            return Err(ValidationError::new(
                Field::Leverage,
                format!("must be between {} and {}", MIN_LEVERAGE, MAX_LEVERAGE),
            ));
        }
        Ok(output.position_value / leverage)
    }

    /// Margin for an optional leverage. `None` or a leverage of exactly 1
    /// yields no margin figure; any other value is validated.
    pub fn margin_at(
        output: &TradeOutput,
        leverage: Option<f64>,
    ) -> Result<Option<f64>, ValidationError> {
        match leverage {
            None => Ok(None),
            Some(l) => {
                let margin = Self::margin_required(output, l)?;
                Ok((l > 1.0).then_some(margin))
            }
        }
    }

    fn validate(input: &TradeInput) -> Result<(), ValidationError> {
        require_positive(input.capital, Field::Capital)?;

        require_positive(input.risk_percent, Field::RiskPercent)?;
        if input.risk_percent > 100.0 {
            return Err(ValidationError::new(Field::RiskPercent, "cannot exceed 100"));
        }

        require_positive(input.entry_price, Field::EntryPrice)?;
        require_positive(input.stop_price, Field::StopPrice)?;

        // Zero stop distance would divide by zero
        if input.entry_price == input.stop_price {
            return Err(ValidationError::new(
                Field::StopPrice,
                "must differ from entry_price",
            ));
        }

        Ok(())
    }
}

fn require_positive(value: f64, field: Field) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(ValidationError::new(field, "must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_stock_example() {
        let out = RiskCalculator::compute(&TradeInput::new(10000.0, 2.0, 100.0, 95.0)).unwrap();

        assert_eq!(out.risk_amount, 200.0);
        assert_eq!(out.stop_distance, 5.0);
        assert_eq!(out.position_size, 40.0);
        assert_eq!(out.position_value, 4000.0);
        assert_eq!(out.side, TradeSide::Long);
        assert_eq!(out.stop_loss_percent, 5.0);
    }

    #[test]
    fn test_forex_example() {
        let out = RiskCalculator::compute(&TradeInput::new(5000.0, 1.0, 1.2000, 1.1950)).unwrap();

        assert_close(out.risk_amount, 50.0);
        assert_close(out.stop_distance, 0.005);
        assert_close(out.position_size, 10000.0);
        assert_close(out.position_value, 12000.0);
    }

    #[test]
    fn test_short_side() {
        let out = RiskCalculator::compute(&TradeInput::new(10000.0, 1.0, 50.0, 52.0)).unwrap();

        assert_eq!(out.side, TradeSide::Short);
        assert_eq!(out.stop_distance, 2.0);
        assert_eq!(out.position_size, 50.0);
    }

    #[test]
    fn test_size_times_distance_equals_risk() {
        let inputs = [
            TradeInput::new(10000.0, 2.0, 100.0, 95.0),
            TradeInput::new(123456.78, 0.37, 17.31, 16.02),
            TradeInput::new(250.0, 100.0, 0.0042, 0.0051),
            TradeInput::new(1e7, 0.01, 64250.5, 63100.0),
        ];

        for input in inputs {
            let out = RiskCalculator::compute(&input).unwrap();
            assert_close(out.position_size * out.stop_distance, out.risk_amount);
            assert_close(out.position_value, out.position_size * input.entry_price);
        }
    }

    #[test]
    fn test_deterministic() {
        let input = TradeInput::new(7321.5, 1.75, 42.13, 40.9);
        let first = RiskCalculator::compute(&input).unwrap();
        for _ in 0..10 {
            assert_eq!(RiskCalculator::compute(&input).unwrap(), first);
        }
    }

    #[test]
    fn test_full_risk_equals_capital() {
        let out = RiskCalculator::compute(&TradeInput::new(8000.0, 100.0, 20.0, 18.0)).unwrap();
        assert_eq!(out.risk_amount, 8000.0);
    }

    #[test]
    fn test_equal_entry_and_stop_rejected() {
        let err = RiskCalculator::compute(&TradeInput::new(10000.0, 2.0, 100.0, 100.0)).unwrap_err();
        assert_eq!(err.field, Field::StopPrice);
    }

    #[test]
    fn test_each_field_rejected() {
        let cases = [
            (TradeInput::new(0.0, 2.0, 100.0, 95.0), Field::Capital),
            (TradeInput::new(-5.0, 2.0, 100.0, 95.0), Field::Capital),
            (TradeInput::new(10000.0, 0.0, 100.0, 95.0), Field::RiskPercent),
            (TradeInput::new(10000.0, -1.0, 100.0, 95.0), Field::RiskPercent),
            (TradeInput::new(10000.0, 100.5, 100.0, 95.0), Field::RiskPercent),
            (TradeInput::new(10000.0, 2.0, 0.0, 95.0), Field::EntryPrice),
            (TradeInput::new(10000.0, 2.0, -100.0, 95.0), Field::EntryPrice),
            (TradeInput::new(10000.0, 2.0, 100.0, 0.0), Field::StopPrice),
            (TradeInput::new(10000.0, 2.0, 100.0, -95.0), Field::StopPrice),
        ];

        for (input, field) in cases {
            let err = RiskCalculator::compute(&input).unwrap_err();
            assert_eq!(err.field, field, "input {:?}", input);
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = RiskCalculator::compute(&TradeInput::new(f64::NAN, 2.0, 100.0, 95.0)).unwrap_err();
        assert_eq!(err.field, Field::Capital);

        let err =
            RiskCalculator::compute(&TradeInput::new(1000.0, 2.0, f64::INFINITY, 95.0)).unwrap_err();
        assert_eq!(err.field, Field::EntryPrice);
    }

    #[test]
    fn test_first_violation_wins() {
        let err = RiskCalculator::compute(&TradeInput::new(0.0, 0.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err.field, Field::Capital);
    }

    #[test]
    fn test_overflowing_result_rejected() {
        let err =
            RiskCalculator::compute(&TradeInput::new(1e300, 100.0, 1e-10, 2e-10)).unwrap_err();
        assert_eq!(err.field, Field::Capital);

        let err = RiskCalculator::compute(&TradeInput::new(f64::MAX, 100.0, 10.0, 9.0)).unwrap_err();
        assert_eq!(err.field, Field::Capital);
    }

    #[test]
    fn test_margin_at_optional_leverage() {
        let out = RiskCalculator::compute(&TradeInput::new(10000.0, 2.0, 100.0, 95.0)).unwrap();

        assert_eq!(RiskCalculator::margin_at(&out, None).unwrap(), None);
        assert_eq!(RiskCalculator::margin_at(&out, Some(1.0)).unwrap(), None);
        assert_eq!(RiskCalculator::margin_at(&out, Some(4.0)).unwrap(), Some(1000.0));
        assert_eq!(
            RiskCalculator::margin_at(&out, Some(200.0)).unwrap_err().field,
            Field::Leverage
        );
    }

    #[test]
    fn test_margin_required() {
        let out = RiskCalculator::compute(&TradeInput::new(10000.0, 2.0, 100.0, 95.0)).unwrap();

        assert_eq!(RiskCalculator::margin_required(&out, 1.0).unwrap(), 4000.0);
        assert_eq!(RiskCalculator::margin_required(&out, 10.0).unwrap(), 400.0);

        let err = RiskCalculator::margin_required(&out, 0.5).unwrap_err();
        assert_eq!(err.field, Field::Leverage);
        assert!(RiskCalculator::margin_required(&out, 126.0).is_err());
    }
}
