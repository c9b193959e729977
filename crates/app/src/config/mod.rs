//! Storefront configuration module

use clap::Args;

use crate::config::{
    logging::LoggingConfig,
    storefront::{CatalogConfig, PlacementConfig, PricingConfig},
};

pub mod logging;
pub mod storefront;

pub use logging::LogFormat;

/// Masala storefront configuration, shared by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct AppConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Catalog and order fixture settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Tax and shipping settings.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Simulated order service settings.
    #[command(flatten)]
    pub placement: PlacementConfig,
}
