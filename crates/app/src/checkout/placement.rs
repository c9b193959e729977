//! Order placement service.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use jiff::{Zoned, civil::Date};
use masala::{
    cart::CartLine,
    checkout::CheckoutForm,
    orders::{Order, OrderError, OrderId, OrderLedger, OrderStatus},
    pricing::OrderTotals,
};
use mockall::automock;
use rand::{Rng, distributions::Alphanumeric};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::storefront::PlacementConfig;

const ORDER_ID_SUFFIX_LEN: usize = 9;

/// Errors returned by an order placement service.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// The payment was not accepted.
    #[error("payment was declined")]
    Declined,

    /// The order service could not be reached.
    #[error("order service unavailable: {0}")]
    Unavailable(String),

    /// The order could not be recorded.
    #[error(transparent)]
    Ledger(#[from] OrderError),
}

/// Everything the order service needs to place an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Contact, address and payment details
    pub form: CheckoutForm,

    /// Cart lines at the time of submission
    pub lines: Vec<CartLine>,

    /// Amounts charged
    pub totals: OrderTotals,
}

impl OrderRequest {
    /// Total units ordered.
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// Acknowledgement of a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Order number to show the shopper
    pub order_id: OrderId,

    /// Date the order was accepted
    pub placed_on: Date,
}

/// Places orders with the back office.
#[automock]
#[async_trait]
pub trait OrderPlacement: Send + Sync {
    /// Submit an order. Either the order is placed or nothing happens.
    async fn place_order(&self, request: OrderRequest)
    -> Result<OrderConfirmation, PlacementError>;
}

/// Order service stand-in: waits, may decline, and records accepted orders in the ledger.
#[derive(Debug, Clone)]
pub struct SimulatedOrderPlacement {
    latency: Duration,
    failure_rate: f64,
    ledger: Arc<Mutex<OrderLedger>>,
}

impl SimulatedOrderPlacement {
    /// Create a simulated service writing to `ledger`.
    #[must_use]
    pub fn new(config: &PlacementConfig, ledger: Arc<Mutex<OrderLedger>>) -> Self {
        Self {
            latency: config.latency(),
            failure_rate: config.placement_failure_rate,
            ledger,
        }
    }

    fn roll(&self) -> (bool, String) {
        let mut rng = rand::thread_rng();

        let declined = rng.gen_range(0.0..1.0) < self.failure_rate;
        let suffix = (0..ORDER_ID_SUFFIX_LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();

        (declined, suffix)
    }
}

#[async_trait]
impl OrderPlacement for SimulatedOrderPlacement {
    async fn place_order(
        &self,
        request: OrderRequest,
    ) -> Result<OrderConfirmation, PlacementError> {
        debug!(latency_ms = self.latency.as_millis(), "simulating order processing");

        tokio::time::sleep(self.latency).await;

        let (declined, suffix) = self.roll();

        if declined {
            warn!("simulated payment declined");
            return Err(PlacementError::Declined);
        }

        let order_id = OrderId::from_suffix(&suffix)?;
        let placed_on = Zoned::now().date();

        let order = Order {
            id: order_id.clone(),
            customer: request.form.full_name(),
            email: request.form.email.trim().to_string(),
            total: request.totals.total,
            status: OrderStatus::Pending,
            placed_on,
            items: request.unit_count(),
            address: format!(
                "{}, {}",
                request.form.city.trim(),
                request.form.state.trim()
            ),
        };

        self.ledger.lock().await.insert(order)?;

        info!(order_id = %order_id, "order placed");

        Ok(OrderConfirmation {
            order_id,
            placed_on,
        })
    }
}
