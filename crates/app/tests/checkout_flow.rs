//! End-to-end checkout through a storefront session with the simulated order service.

use std::{num::NonZeroU32, sync::Arc};

use testresult::TestResult;
use tokio::sync::Mutex;

use masala::{
    catalog::Catalog,
    checkout::{CheckoutForm, Field},
    orders::{OrderFilter, OrderLedger, OrderStatus},
    pricing::PricingPolicy,
};
use masala_app::{
    checkout::{
        CheckoutOutcome, CheckoutState, MockNavigator, MockNotifier, NotificationKind, Route,
        SimulatedOrderPlacement,
    },
    config::storefront::PlacementConfig,
    session::{SessionServices, StorefrontSession},
};

fn form() -> CheckoutForm {
    CheckoutForm {
        email: "kabir@example.com".to_string(),
        phone: "7012345678".to_string(),
        first_name: "Kabir".to_string(),
        last_name: "Shah".to_string(),
        address: "22 Lake Road".to_string(),
        city: "Udaipur".to_string(),
        state: "Rajasthan".to_string(),
        pincode: "313001".to_string(),
        ..CheckoutForm::default()
    }
}

fn session(
    failure_rate: f64,
    notifier: MockNotifier,
    navigator: MockNavigator,
) -> TestResult<StorefrontSession> {
    let catalog = Catalog::bundled()?;
    let policy = PricingPolicy::standard(catalog.currency());
    let ledger = Arc::new(Mutex::new(OrderLedger::seeded()?));

    let placement = SimulatedOrderPlacement::new(
        &PlacementConfig {
            placement_latency_ms: 0,
            placement_failure_rate: failure_rate,
        },
        ledger.clone(),
    );

    Ok(StorefrontSession::with_services(
        catalog,
        ledger,
        policy,
        SessionServices {
            placement: Arc::new(placement),
            notifier: Arc::new(notifier),
            navigator: Arc::new(navigator),
        },
    ))
}

fn one() -> NonZeroU32 {
    NonZeroU32::MIN
}

#[tokio::test]
async fn test_placed_order_is_trackable_and_listed() -> TestResult {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .once()
        .withf(|n| n.kind == NotificationKind::Success)
        .return_const(());

    let mut navigator = MockNavigator::new();
    navigator
        .expect_navigate()
        .once()
        .withf(|route| matches!(route, Route::OrderSuccess(_)))
        .return_const(());

    let session = session(0.0, notifier, navigator)?;

    session.add_to_cart("10", one()).await?;
    session.add_to_cart("4", one()).await?;

    let total = session.totals().await?.total;

    let CheckoutOutcome::Placed(confirmation) = session.checkout(&form()).await else {
        return Err("order was not placed".into());
    };

    assert!(session.cart().await.is_empty());
    assert_eq!(
        session.orchestrator().state(),
        CheckoutState::Succeeded(confirmation.clone())
    );

    let tracking = session.track(&confirmation.order_id).await?;

    assert_eq!(tracking.order.status, OrderStatus::Pending);
    assert_eq!(tracking.order.total, total);
    assert_eq!(tracking.order.items, 2);
    assert_eq!(tracking.steps.iter().filter(|s| s.completed).count(), 1);

    let kabirs = session
        .admin_orders(&OrderFilter {
            search: "kabir".to_string(),
            status: Some(OrderStatus::Pending),
        })
        .await;

    assert_eq!(kabirs.len(), 1);
    assert_eq!(session.admin_orders(&OrderFilter::default()).await.len(), 5);

    session.close().await;

    Ok(())
}

#[tokio::test]
async fn test_declined_order_keeps_cart_and_ledger() -> TestResult {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .once()
        .withf(|n| n.kind == NotificationKind::Error)
        .return_const(());

    let mut navigator = MockNavigator::new();
    navigator.expect_navigate().never();

    let session = session(1.0, notifier, navigator)?;

    session.add_to_cart("1", one()).await?;

    let before = session.cart().await;

    assert!(matches!(
        session.checkout(&form()).await,
        CheckoutOutcome::Failed(_)
    ));
    assert_eq!(session.cart().await, before);
    assert_eq!(session.admin_orders(&OrderFilter::default()).await.len(), 4);

    Ok(())
}

#[tokio::test]
async fn test_invalid_form_reports_every_field() -> TestResult {
    let mut notifier = MockNotifier::new();
    notifier.expect_notify().once().return_const(());

    let mut navigator = MockNavigator::new();
    navigator.expect_navigate().never();

    let session = session(0.0, notifier, navigator)?;

    session.add_to_cart("5", one()).await?;

    let CheckoutOutcome::Invalid(errors) = session.checkout(&CheckoutForm::default()).await else {
        return Err("form should have been rejected".into());
    };

    assert_eq!(errors.len(), Field::ALL.len());
    assert_eq!(session.cart().await.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_empty_cart_goes_back_to_products() -> TestResult {
    let mut notifier = MockNotifier::new();
    notifier.expect_notify().once().return_const(());

    let mut navigator = MockNavigator::new();
    navigator
        .expect_navigate()
        .once()
        .withf(|route| *route == Route::Products)
        .return_const(());

    let session = session(0.0, notifier, navigator)?;

    assert!(matches!(
        session.checkout(&form()).await,
        CheckoutOutcome::EmptyCart
    ));

    Ok(())
}
