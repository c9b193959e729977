//! Storefront Config

use std::{path::PathBuf, time::Duration};

use clap::Args;
use decimal_percentage::Percentage;
use masala::{
    prices::{Price, parse_price, store_currency},
    pricing::PricingPolicy,
};
use rusty_money::Money;

const DEFAULT_TAX_RATE: f64 = 0.18;
const DEFAULT_FREE_SHIPPING_MINOR: i64 = 49_900;
const DEFAULT_SHIPPING_CHARGE_MINOR: i64 = 5_000;
const DEFAULT_LATENCY_MS: u64 = 2_000;

/// Where the catalog and admin orders are loaded from.
#[derive(Debug, Clone, Default, Args)]
pub struct CatalogConfig {
    /// Catalog YAML file; the bundled spice list is used when omitted
    #[arg(long, env = "MASALA_CATALOG", global = true)]
    pub catalog_path: Option<PathBuf>,

    /// Seed orders YAML file; the bundled admin orders are used when omitted
    #[arg(long, env = "MASALA_ORDERS", global = true)]
    pub orders_path: Option<PathBuf>,
}

/// Tax and shipping settings.
#[derive(Debug, Clone, Args)]
pub struct PricingConfig {
    /// GST rate as a fraction of the subtotal
    #[arg(
        long,
        env = "MASALA_TAX_RATE",
        default_value_t = DEFAULT_TAX_RATE,
        value_parser = parse_rate,
        global = true
    )]
    pub tax_rate: f64,

    /// Subtotal from which shipping is free, e.g. "499 INR"
    #[arg(
        long,
        env = "MASALA_FREE_SHIPPING_THRESHOLD",
        default_value = "499 INR",
        value_parser = parse_price,
        global = true
    )]
    pub free_shipping_threshold: Price,

    /// Flat shipping charge below the threshold, e.g. "50 INR"
    #[arg(
        long,
        env = "MASALA_SHIPPING_CHARGE",
        default_value = "50 INR",
        value_parser = parse_price,
        global = true
    )]
    pub shipping_charge: Price,
}

impl PricingConfig {
    /// Pricing policy described by these settings.
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            tax_rate: Percentage::from(self.tax_rate),
            free_shipping_threshold: self.free_shipping_threshold,
            shipping_charge: self.shipping_charge,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            free_shipping_threshold: Money::from_minor(
                DEFAULT_FREE_SHIPPING_MINOR,
                store_currency(),
            ),
            shipping_charge: Money::from_minor(DEFAULT_SHIPPING_CHARGE_MINOR, store_currency()),
        }
    }
}

/// Simulated order service settings.
#[derive(Debug, Clone, Args)]
pub struct PlacementConfig {
    /// Simulated order processing time in milliseconds
    #[arg(
        long,
        env = "MASALA_PLACEMENT_LATENCY_MS",
        default_value_t = DEFAULT_LATENCY_MS,
        global = true
    )]
    pub placement_latency_ms: u64,

    /// Probability in [0, 1] that a simulated order is declined
    #[arg(
        long,
        env = "MASALA_PLACEMENT_FAILURE_RATE",
        default_value_t = 0.0,
        value_parser = parse_rate,
        global = true
    )]
    pub placement_failure_rate: f64,
}

impl PlacementConfig {
    /// Simulated processing time.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.placement_latency_ms)
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            placement_latency_ms: DEFAULT_LATENCY_MS,
            placement_failure_rate: 0.0,
        }
    }
}

/// Parse a fraction in `[0, 1]`.
fn parse_rate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw
        .trim()
        .parse()
        .map_err(|error| format!("invalid rate {raw:?}: {error}"))?;

    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("rate must be between 0 and 1, got {raw}"))
    }
}
