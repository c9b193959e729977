//! Storefront session.
//!
//! One shopper's view of the store: the catalog, their cart, the checkout flow and the
//! order ledger behind the tracking and admin pages.

use std::{num::NonZeroU32, sync::Arc};

use jiff::civil::Date;
use masala::{
    cart::{Cart, CartChange, CartError, NewCartItem},
    catalog::{Catalog, CatalogError},
    checkout::CheckoutForm,
    orders::{
        Order, OrderError, OrderFilter, OrderId, OrderLedger, OrderStatus, TrackingStep,
        estimated_delivery, tracking_timeline,
    },
    pricing::{OrderTotals, PricingError, PricingPolicy},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    checkout::{
        CheckoutOrchestrator, CheckoutOutcome, CheckoutState, Navigator, Notifier, OrderPlacement,
        SharedCart, SimulatedOrderPlacement, TracingNavigator, TracingNotifier,
    },
    config::AppConfig,
};

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Orders could not be loaded or tracked.
    #[error(transparent)]
    Orders(#[from] OrderError),

    /// The cart rejected a change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Totals could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// No product with this id.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// No order with this id.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),
}

/// Tracking page contents.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTracking {
    /// The tracked order
    pub order: Order,

    /// Milestones, oldest first
    pub steps: Vec<TrackingStep>,

    /// Expected delivery date
    pub estimated_delivery: Date,
}

/// Services a session hands to its checkout orchestrator.
#[derive(Clone)]
pub struct SessionServices {
    /// Order service
    pub placement: Arc<dyn OrderPlacement>,

    /// Toast surface
    pub notifier: Arc<dyn Notifier>,

    /// View transitions
    pub navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for SessionServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionServices").finish_non_exhaustive()
    }
}

/// Storefront session.
#[derive(Debug)]
pub struct StorefrontSession {
    catalog: Catalog,
    cart: SharedCart,
    ledger: Arc<Mutex<OrderLedger>>,
    policy: PricingPolicy,
    orchestrator: CheckoutOrchestrator,
}

impl StorefrontSession {
    /// Open a session with the simulated order service and log-backed notifications.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the catalog or seed orders cannot be loaded.
    pub fn open(config: &AppConfig) -> Result<Self, SessionError> {
        let catalog = match &config.catalog.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::bundled()?,
        };

        let ledger = match &config.catalog.orders_path {
            Some(path) => OrderLedger::from_path(path)?,
            None => OrderLedger::seeded()?,
        };

        let ledger = Arc::new(Mutex::new(ledger));

        let services = SessionServices {
            placement: Arc::new(SimulatedOrderPlacement::new(
                &config.placement,
                ledger.clone(),
            )),
            notifier: Arc::new(TracingNotifier),
            navigator: Arc::new(TracingNavigator),
        };

        Ok(Self::with_services(
            catalog,
            ledger,
            config.pricing.policy(),
            services,
        ))
    }

    /// Open a session over explicit services.
    pub fn with_services(
        catalog: Catalog,
        ledger: Arc<Mutex<OrderLedger>>,
        policy: PricingPolicy,
        services: SessionServices,
    ) -> Self {
        let cart: SharedCart = Arc::new(Mutex::new(Cart::new(catalog.currency())));

        let orchestrator = CheckoutOrchestrator::new(
            cart.clone(),
            policy,
            services.placement,
            services.notifier,
            services.navigator,
        );

        info!(products = catalog.len(), "storefront session opened");

        Self {
            catalog,
            cart,
            ledger,
            policy,
            orchestrator,
        }
    }

    /// The product catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The checkout orchestrator.
    pub fn orchestrator(&self) -> &CheckoutOrchestrator {
        &self.orchestrator
    }

    /// Add a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownProduct`] if the id is not in the catalog.
    pub async fn add_to_cart(
        &self,
        id: &str,
        quantity: NonZeroU32,
    ) -> Result<CartChange, SessionError> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| SessionError::UnknownProduct(id.to_string()))?;

        let change = self
            .cart
            .lock()
            .await
            .add_item(NewCartItem::from(product), quantity)?;

        debug!(product = %product.id, quantity = quantity.get(), ?change, "cart updated");

        Ok(change)
    }

    /// Set a line's quantity; zero or less removes it.
    pub async fn update_quantity(&self, id: &str, quantity: i64) -> CartChange {
        self.cart.lock().await.update_quantity(id, quantity)
    }

    /// Remove a line from the cart.
    pub async fn remove_from_cart(&self, id: &str) -> CartChange {
        self.cart.lock().await.remove_item(id)
    }

    /// Copy of the cart as it stands.
    pub async fn cart(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Totals for the cart as it stands.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Pricing`] if the totals cannot be calculated.
    pub async fn totals(&self) -> Result<OrderTotals, SessionError> {
        let cart = self.cart.lock().await;

        Ok(OrderTotals::for_cart(&cart, &self.policy)?)
    }

    /// Run checkout for the current cart.
    pub async fn checkout(&self, form: &CheckoutForm) -> CheckoutOutcome {
        self.orchestrator.submit(form).await
    }

    /// Tracking page for an order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::OrderNotFound`] for unknown ids.
    pub async fn track(&self, id: &OrderId) -> Result<OrderTracking, SessionError> {
        let order = self
            .ledger
            .lock()
            .await
            .find(id)
            .cloned()
            .ok_or_else(|| SessionError::OrderNotFound(id.clone()))?;

        Ok(OrderTracking {
            steps: tracking_timeline(&order)?,
            estimated_delivery: estimated_delivery(&order)?,
            order,
        })
    }

    /// Admin order list.
    pub async fn admin_orders(&self, filter: &OrderFilter) -> Vec<Order> {
        self.ledger
            .lock()
            .await
            .filter(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Move an order to `status` from the admin page and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::OrderNotFound`] for unknown ids.
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, SessionError> {
        let mut ledger = self.ledger.lock().await;

        ledger.update_status(id, status).map_err(|error| match error {
            OrderError::NotFound(id) => SessionError::OrderNotFound(id),
            other => SessionError::Orders(other),
        })?;

        info!(order_id = %id, %status, "order status updated");

        ledger
            .find(id)
            .cloned()
            .ok_or_else(|| SessionError::OrderNotFound(id.clone()))
    }

    /// End the session.
    pub async fn close(self) {
        let cart = self.cart.lock().await;
        let state = self.orchestrator.state();

        info!(
            cart_lines = cart.len(),
            cart_items = cart.total_items(),
            placed = matches!(state, CheckoutState::Succeeded(_)),
            "storefront session closed"
        );
    }
}
