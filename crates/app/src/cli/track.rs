use std::io;

use clap::Args;
use masala::orders::OrderId;
use masala_app::{config::AppConfig, display, session::StorefrontSession};

#[derive(Debug, Args)]
pub(crate) struct TrackArgs {
    /// Order number, e.g. ORD002
    order_id: OrderId,
}

pub(crate) async fn run(config: &AppConfig, args: &TrackArgs) -> Result<(), String> {
    let session = StorefrontSession::open(config)
        .map_err(|error| format!("failed to open storefront: {error}"))?;

    let tracking = session
        .track(&args.order_id)
        .await
        .map_err(|error| format!("failed to track order: {error}"))?;

    display::write_tracking(io::stdout().lock(), &tracking)
        .map_err(|error| format!("failed to write tracking: {error}"))
}
