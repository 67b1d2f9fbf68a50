//! Session runner configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use dishcart::{
    orders::OrderPricing,
    parse::{ParseError, parse_fee, parse_tax_rate},
};
use rusty_money::{Money, iso::Currency};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Dishcart session runner configuration
#[derive(Debug, Parser)]
#[command(name = "dishcart", about = "Run a scripted cart session", long_about = None)]
pub struct Config {
    /// Menu YAML file
    #[arg(short, long, env = "MENU_PATH", default_value = "fixtures/menus/demo.yaml")]
    pub menu: PathBuf,

    /// Session YAML file
    #[arg(short, long, env = "SESSION_PATH", default_value = "fixtures/sessions/demo.yaml")]
    pub session: PathBuf,

    /// Tax rate applied to placed orders ("10%" or "0.1")
    #[arg(long, env = "TAX_RATE", default_value = "10%")]
    pub tax_rate: String,

    /// Flat delivery fee, e.g. "5.00 GBP"; defaults to 5.00 in the menu currency
    #[arg(long, env = "DELIVERY_FEE")]
    pub delivery_fee: Option<String>,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Build the order pricing policy for a menu priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the tax rate or delivery fee is malformed or negative, or if
    /// the fee is not in `currency`.
    pub fn pricing(&self, currency: &'static Currency) -> Result<OrderPricing, ParseError> {
        let tax_rate = parse_tax_rate(&self.tax_rate)?;
        let delivery_fee = match &self.delivery_fee {
            Some(fee) => parse_fee(fee, currency)?,
            None => Money::from_minor(5_00, currency),
        };

        Ok(OrderPricing::new(tax_rate, delivery_fee))
    }
}
