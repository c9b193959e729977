//! Navigation

use std::fmt;

use masala::orders::OrderId;
use mockall::automock;
use tracing::info;

/// Storefront views the checkout flow can send the shopper to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Product listing
    Products,

    /// Cart page
    Cart,

    /// Order confirmation for a placed order
    OrderSuccess(OrderId),

    /// Tracking page
    TrackOrder,
}

impl Route {
    /// URL path for the view.
    pub fn path(&self) -> String {
        match self {
            Route::Products => "/products".to_string(),
            Route::Cart => "/cart".to_string(),
            Route::OrderSuccess(id) => format!("/order-success/{id}"),
            Route::TrackOrder => "/track-order".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Fire-and-forget view transitions.
#[automock]
pub trait Navigator: Send + Sync {
    /// Move the shopper to `route`.
    fn navigate(&self, route: Route);
}

/// Navigator that records transitions in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: Route) {
        info!(%route, "navigate");
    }
}
