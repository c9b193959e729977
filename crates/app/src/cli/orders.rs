use std::{io, str::FromStr};

use clap::Args;
use masala::orders::{OrderFilter, OrderId, OrderStatus};
use masala_app::{config::AppConfig, display, session::StorefrontSession};

/// `ORDER_ID=STATUS`
#[derive(Debug, Clone)]
struct StatusUpdate {
    id: OrderId,
    status: OrderStatus,
}

impl FromStr for StatusUpdate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, status) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ORDER_ID=STATUS, got {s:?}"))?;

        Ok(Self {
            id: id.parse::<OrderId>().map_err(|error| error.to_string())?,
            status: status.parse::<OrderStatus>().map_err(|error| error.to_string())?,
        })
    }
}

#[derive(Debug, Args)]
pub(crate) struct OrdersArgs {
    /// Customer name or order id fragment
    #[arg(long, default_value = "")]
    search: String,

    /// Only orders in this status, e.g. "shipped" or "out-for-delivery"
    #[arg(long)]
    status: Option<OrderStatus>,

    /// Move an order to a new status before listing, as ORDER_ID=STATUS; repeatable
    #[arg(long = "set-status", value_name = "ORDER_ID=STATUS")]
    updates: Vec<StatusUpdate>,
}

pub(crate) async fn run(config: &AppConfig, args: OrdersArgs) -> Result<(), String> {
    let session = StorefrontSession::open(config)
        .map_err(|error| format!("failed to open storefront: {error}"))?;

    for update in &args.updates {
        session
            .update_order_status(&update.id, update.status)
            .await
            .map_err(|error| format!("failed to update {}: {error}", update.id))?;
    }

    let orders = session
        .admin_orders(&OrderFilter {
            search: args.search,
            status: args.status,
        })
        .await;

    display::write_orders(io::stdout().lock(), &orders)
        .map_err(|error| format!("failed to write orders: {error}"))
}
