//! Checkout flow: the orchestrator and the services it drives.

pub mod navigation;
pub mod notify;
pub mod orchestrator;
pub mod placement;

pub use navigation::{MockNavigator, Navigator, Route, TracingNavigator};
pub use notify::{MockNotifier, Notification, NotificationKind, Notifier, TracingNotifier};
pub use orchestrator::{
    CheckoutError, CheckoutOrchestrator, CheckoutOutcome, CheckoutState, SharedCart,
};
pub use placement::{
    MockOrderPlacement, OrderConfirmation, OrderPlacement, OrderRequest, PlacementError,
    SimulatedOrderPlacement,
};
