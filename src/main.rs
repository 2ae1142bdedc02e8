//! Position Size Calculator
//!
//! Turns account capital, risk percentage and a stop-loss into a position
//! size, either for a single trade (entry and stop prices) or as a table
//! across several risk levels (stop-loss percentage, optional leverage).

mod display;
mod models;
mod sizing;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::display::{JsonReport, SizingReport, TableReport};
use crate::models::TradeInput;
use crate::sizing::{parse_risk_levels, RiskCalculator, RiskTable, SizingConfig, TableRequest};

/// Position size calculator CLI.
#[derive(Parser)]
#[command(name = "riskcalc")]
#[command(about = "Size positions from capital, risk percentage and stop-loss", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", env = "RISKCALC_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size a single trade from entry and stop prices
    Size {
        /// Account capital (defaults to RISKCALC_CAPITAL or 1000)
        #[arg(short, long)]
        capital: Option<f64>,

        /// Percentage of capital to risk (0-100]
        #[arg(short, long)]
        risk: f64,

        /// Entry price
        #[arg(short, long)]
        entry: f64,

        /// Stop-loss price
        #[arg(short, long)]
        stop: f64,

        /// Leverage multiplier (1-125), shows the margin required when above 1
        #[arg(long)]
        leverage: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Tabulate position sizes for several risk levels at a stop-loss percentage
    Table {
        /// Account capital in USD
        #[arg(short, long)]
        capital: Option<f64>,

        /// Stop-loss distance as a percentage of entry
        #[arg(short, long)]
        stop_loss: Option<f64>,

        /// Comma-separated risk percentages, e.g. "0.25, 0.5, 1, 2"
        #[arg(short, long)]
        risks: Option<String>,

        /// Leverage multiplier (1-125)
        #[arg(long)]
        leverage: Option<f64>,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective default configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = SizingConfig::from_env()?;

    match cli.command {
        Commands::Size {
            capital,
            risk,
            entry,
            stop,
            leverage,
            json,
        } => {
            let capital = match capital {
                Some(c) => c,
                None => config
                    .capital
                    .to_f64()
                    .context("Configured capital is out of range")?,
            };

            info!(capital, risk, entry, stop, "Sizing trade");

            let input = TradeInput::new(capital, risk, entry, stop);
            let output = RiskCalculator::compute(&input).context("Invalid trade input")?;

            let margin_required =
                RiskCalculator::margin_at(&output, leverage).context("Invalid leverage")?;
            let leverage = leverage.unwrap_or(1.0);
            if margin_required.is_some() {
                warn!(leverage, "Leverage multiplies exposure; the stop must hold to cap the loss");
            }

            if json {
                let report = JsonReport::new(serde_json::json!({
                    "input": input,
                    "output": output,
                    "leverage": leverage,
                    "margin_required": margin_required,
                }));
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let report = SizingReport {
                    input: &input,
                    output: &output,
                    leverage,
                    margin_required,
                    decimals: config.display_decimals,
                };
                println!("{}", report);

                if output.requires_leverage(capital) {
                    println!(
                        "Note: position value is {:.1}x your capital.",
                        output.exposure_ratio(capital)
                    );
                }
            }
        }

        Commands::Table {
            capital,
            stop_loss,
            risks,
            leverage,
            json,
        } => {
            let request = TableRequest {
                capital: decimal_or(capital, config.capital).context("Invalid capital")?,
                stop_loss_percent: decimal_or(stop_loss, config.stop_loss_percent)
                    .context("Invalid stop-loss percentage")?,
                risk_levels: parse_risk_levels(risks.as_deref().unwrap_or(&config.risk_levels))
                    .context("Invalid risk levels")?,
                leverage: decimal_or(leverage, config.leverage).context("Invalid leverage")?,
            };

            info!(
                capital = %request.capital,
                stop_loss = %request.stop_loss_percent,
                levels = request.risk_levels.len(),
                "Building risk table"
            );

            let table = RiskTable::build(&request).context("Invalid table input")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&JsonReport::new(&table))?);
            } else {
                if table.has_margin() {
                    println!(
                        "Warning: with {}x leverage your risk grows by the same factor.",
                        table.leverage.normalize()
                    );
                }
                println!(
                    "{}",
                    TableReport {
                        table: &table,
                        decimals: config.display_decimals,
                    }
                );
                println!("The first row is the maximum loss allowed per trade.");
            }
        }

        Commands::Config => {
            println!("\n=== Sizing Configuration ===\n");
            println!("Defaults:");
            println!("  Capital:              ${}", config.capital);
            println!("  Stop Loss:            {}%", config.stop_loss_percent);
            println!("  Risk Levels:          {}", config.risk_levels);
            println!("  Leverage:             {}x", config.leverage);
            println!("  Display Decimals:     {}", config.display_decimals);

            println!("\nLimits:");
            println!("  Risk Percent:         (0, 100]");
            println!("  Min Stop Loss:        {}%", sizing::MIN_STOP_LOSS_PERCENT);
            println!("  Leverage:             {}-{}x", sizing::MIN_LEVERAGE, sizing::MAX_LEVERAGE);
        }
    }

    Ok(())
}

/// Use the CLI value when given, otherwise the configured default.
fn decimal_or(value: Option<f64>, default: Decimal) -> Result<Decimal> {
    match value {
        Some(v) => Ok(Decimal::try_from(v)?),
        None => Ok(default),
    }
}
