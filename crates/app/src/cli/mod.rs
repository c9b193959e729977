use clap::{Parser, Subcommand};
use masala_app::config::AppConfig;

mod catalog;
mod checkout;
mod orders;
mod track;

#[derive(Debug, Parser)]
#[command(name = "masala", about = "Masala storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products
    Catalog(catalog::CatalogArgs),

    /// Fill a cart and place an order
    Checkout(Box<checkout::CheckoutArgs>),

    /// List admin orders
    Orders(orders::OrdersArgs),

    /// Show an order's tracking timeline
    Track(track::TrackArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Catalog(args) => catalog::run(&self.config, &args),
            Commands::Checkout(args) => checkout::run(&self.config, &args).await,
            Commands::Orders(args) => orders::run(&self.config, args).await,
            Commands::Track(args) => track::run(&self.config, &args).await,
        }
    }
}
