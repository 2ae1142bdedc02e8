//! Presentation helpers: money formatting and printable reports.
//!
//! All rounding happens here; the sizing types keep full precision.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{TradeInput, TradeOutput};
use crate::sizing::RiskTable;

/// Format a decimal amount as `$1,234.56`.
pub fn format_money(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.*}", decimals as usize, rounded.abs());
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&digits))
}

/// Format a float amount as `$1,234.56`.
pub fn format_money_f64(value: f64, decimals: u32) -> String {
    let digits = format!("{:.*}", decimals as usize, value.abs());
    let sign = if value < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{}${}", sign, group_thousands(&digits))
}

/// Format a plain quantity with thousand separators, e.g. `10,000.00`.
pub fn format_quantity(value: f64, decimals: u32) -> String {
    let digits = format!("{:.*}", decimals as usize, value.abs());
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(&digits))
}

/// Label for a risk level column, e.g. `0.25%`.
pub fn format_level(level: Decimal) -> String {
    format!("{}%", level.normalize())
}

/// Insert `,` every three digits in the integer part of an unsigned number.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

/// Single-trade sizing result ready for printing.
pub struct SizingReport<'a> {
    pub input: &'a TradeInput,
    pub output: &'a TradeOutput,
    pub leverage: f64,
    pub margin_required: Option<f64>,
    pub decimals: u32,
}

impl std::fmt::Display for SizingReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = self.decimals;
        writeln!(f, "\n{:=^50}", " POSITION SIZE ")?;
        writeln!(f)?;
        writeln!(f, "--- Input ---")?;
        writeln!(f, "Capital:          {}", format_money_f64(self.input.capital, d))?;
        writeln!(f, "Risk:             {}%", self.input.risk_percent)?;
        writeln!(f, "Entry Price:      {}", self.input.entry_price)?;
        writeln!(f, "Stop Price:       {}", self.input.stop_price)?;
        writeln!(f)?;
        writeln!(f, "--- Result ---")?;
        writeln!(f, "Side:             {}", self.output.side)?;
        writeln!(f, "Risk Amount:      {}", format_money_f64(self.output.risk_amount, d))?;
        writeln!(f, "Stop Distance:    {} ({:.2}%)",
            self.output.stop_distance, self.output.stop_loss_percent)?;
        writeln!(f, "Position Size:    {} units", format_quantity(self.output.position_size, d))?;
        writeln!(f, "Position Value:   {}", format_money_f64(self.output.position_value, d))?;
        if let Some(margin) = self.margin_required {
            writeln!(f, "Margin ({}x):     {}", self.leverage, format_money_f64(margin, d))?;
        }
        writeln!(f, "{:=^50}", "")?;
        Ok(())
    }
}

/// Risk table laid out with one column per risk level.
pub struct TableReport<'a> {
    pub table: &'a RiskTable,
    pub decimals: u32,
}

impl TableReport<'_> {
    fn row_labels(&self) -> Vec<&'static str> {
        let mut labels = vec!["Risk ($)", "Position Size ($)"];
        if self.table.has_margin() {
            labels.push("Margin Required ($)");
        }
        labels
    }

    fn cells(&self) -> Vec<Vec<String>> {
        let d = self.decimals;
        let mut cells = vec![
            self.table.rows.iter().map(|r| format_money(r.dollar_risk, d)).collect::<Vec<_>>(),
            self.table.rows.iter().map(|r| format_money(r.position_size, d)).collect(),
        ];
        if self.table.has_margin() {
            cells.push(
                self.table
                    .rows
                    .iter()
                    .map(|r| r.margin_required.map(|m| format_money(m, d)).unwrap_or_default())
                    .collect(),
            );
        }
        cells
    }
}

impl std::fmt::Display for TableReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels = self.row_labels();
        let cells = self.cells();
        let headers: Vec<String> = self.table.rows.iter().map(|r| format_level(r.risk_percent)).collect();

        let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(col, h)| {
                cells
                    .iter()
                    .map(|row| row[col].len())
                    .chain(std::iter::once(h.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let total_width = label_width + widths.iter().map(|w| w + 2).sum::<usize>();

        writeln!(f, "\n{:=^width$}", " RISK TABLE ", width = total_width.max(30))?;
        writeln!(f, "Capital: {} | Stop Loss: {}% | Leverage: {}x",
            format_money(self.table.capital, self.decimals),
            self.table.stop_loss_percent.normalize(),
            self.table.leverage.normalize())?;
        writeln!(f)?;

        write!(f, "{:<label_width$}", "")?;
        for (h, w) in headers.iter().zip(&widths) {
            write!(f, "  {:>w$}", h, w = w)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(total_width))?;

        for (label, row) in labels.iter().zip(&cells) {
            write!(f, "{:<label_width$}", label)?;
            for (cell, w) in row.iter().zip(&widths) {
                write!(f, "  {:>w$}", cell, w = w)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{:=^width$}", "", width = total_width.max(30))?;
        Ok(())
    }
}

/// JSON output wrapper stamped with the generation time.
#[derive(Debug, Serialize)]
pub struct JsonReport<T: Serialize> {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> JsonReport<T> {
    pub fn new(data: T) -> Self {
        Self {
            generated_at: Utc::now(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::{RiskCalculator, TableRequest};
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(0), 2), "$0.00");
        assert_eq!(format_money(dec!(2.5), 2), "$2.50");
        assert_eq!(format_money(dec!(1333.3333333), 2), "$1,333.33");
        assert_eq!(format_money(dec!(1234567.891), 2), "$1,234,567.89");
        assert_eq!(format_money(dec!(166.665), 2), "$166.67");
        assert_eq!(format_money(dec!(-1500), 2), "-$1,500.00");
        assert_eq!(format_money(dec!(999999.999), 2), "$1,000,000.00");
    }

    #[test]
    fn test_format_money_f64() {
        assert_eq!(format_money_f64(4000.0, 2), "$4,000.00");
        assert_eq!(format_money_f64(200.0, 0), "$200");
        assert_eq!(format_money_f64(-0.001, 2), "$0.00");
        assert_eq!(format_money_f64(-12.5, 2), "-$12.50");
    }

    #[test]
    fn test_format_quantity_and_level() {
        assert_eq!(format_quantity(10000.0, 2), "10,000.00");
        assert_eq!(format_quantity(40.0, 0), "40");
        assert_eq!(format_level(dec!(0.250)), "0.25%");
        assert_eq!(format_level(dec!(2)), "2%");
    }

    #[test]
    fn test_sizing_report() {
        let input = TradeInput::new(10000.0, 2.0, 100.0, 95.0);
        let output = RiskCalculator::compute(&input).unwrap();
        let report = SizingReport {
            input: &input,
            output: &output,
            leverage: 1.0,
            margin_required: None,
            decimals: 2,
        }
        .to_string();

        assert!(report.contains("Risk Amount:      $200.00"));
        assert!(report.contains("Position Size:    40.00 units"));
        assert!(report.contains("Position Value:   $4,000.00"));
        assert!(!report.contains("Margin"));
    }

    #[test]
    fn test_table_report_margin_row() {
        let table = RiskTable::build(&TableRequest {
            capital: dec!(1000),
            stop_loss_percent: dec!(1.5),
            risk_levels: vec![dec!(0.5), dec!(1)],
            leverage: dec!(10),
        })
        .unwrap();

        let text = TableReport { table: &table, decimals: 2 }.to_string();
        assert!(text.contains("0.5%"));
        assert!(text.contains("$666.67"));
        assert!(text.contains("Margin Required ($)"));
        assert!(text.contains("$66.67"));
    }

    #[test]
    fn test_json_report_flattens() {
        let input = TradeInput::new(10000.0, 2.0, 100.0, 95.0);
        let output = RiskCalculator::compute(&input).unwrap();
        let value = serde_json::to_value(JsonReport::new(output)).unwrap();

        assert_eq!(value["position_size"], 40.0);
        assert_eq!(value["side"], "LONG");
        assert!(value.get("generated_at").is_some());
    }
}
