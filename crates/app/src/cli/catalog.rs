use std::io;

use clap::{Args, ValueEnum};
use masala::catalog::{CatalogQuery, SortOrder};
use masala_app::{config::AppConfig, display, session::StorefrontSession};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Price,
    Featured,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Name => SortOrder::Name,
            SortArg::Price => SortOrder::Price,
            SortArg::Featured => SortOrder::Featured,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Only products whose name contains this text
    #[arg(long, default_value = "")]
    search: String,

    /// Only products on this shelf (powder, blend, whole)
    #[arg(long)]
    category: Option<String>,

    /// Listing order
    #[arg(long, value_enum, default_value_t = SortArg::Name)]
    sort: SortArg,
}

pub(crate) fn run(config: &AppConfig, args: &CatalogArgs) -> Result<(), String> {
    let session = StorefrontSession::open(config)
        .map_err(|error| format!("failed to open storefront: {error}"))?;

    let listing = session.catalog().browse(&CatalogQuery {
        search: args.search.clone(),
        category: args.category.clone(),
        sort: args.sort.into(),
    });

    if listing.is_empty() {
        return Err("no products match".to_string());
    }

    display::write_products(io::stdout().lock(), listing)
        .map_err(|error| format!("failed to write catalog: {error}"))
}
