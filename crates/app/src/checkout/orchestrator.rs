//! Checkout orchestrator.
//!
//! Runs one checkout attempt at a time: validate the form, submit the order, then clear
//! the cart and move the shopper on. Each step reports through the notifier and the
//! navigator, and the current step is published on a watch channel.

use std::{fmt, sync::Arc};

use masala::{
    cart::Cart,
    checkout::{CheckoutForm, FieldErrors, validate},
    pricing::{OrderTotals, PricingError, PricingPolicy},
};
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::checkout::{
    navigation::{Navigator, Route},
    notify::{Notification, Notifier},
    placement::{OrderConfirmation, OrderPlacement, OrderRequest, PlacementError},
};

/// Cart shared between the session and the orchestrator.
pub type SharedCart = Arc<Mutex<Cart>>;

/// Where a checkout attempt is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// Nothing submitted yet
    #[default]
    Idle,

    /// Checking the form
    Validating,

    /// The form was rejected
    Invalid(FieldErrors),

    /// Waiting on the order service
    Submitting,

    /// The order was placed
    Succeeded(OrderConfirmation),

    /// The order service failed; the message is shopper-facing
    Failed(String),
}

impl CheckoutState {
    /// Whether a submission is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, CheckoutState::Validating | CheckoutState::Submitting)
    }
}

/// Why a submitted checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Totals could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The order service failed.
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Result of one call to [`CheckoutOrchestrator::submit`].
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// The order was placed and the cart cleared.
    Placed(OrderConfirmation),

    /// The form has errors; nothing was submitted.
    Invalid(FieldErrors),

    /// There was nothing to check out.
    EmptyCart,

    /// The order was not placed; cart and form are unchanged.
    Failed(CheckoutError),

    /// Another submission is already in flight.
    Ignored,
}

/// Failure message left behind when a submission is dropped before it finishes.
pub const INTERRUPTED: &str = "checkout interrupted";

/// Frees the submission slot if a `submit` future is dropped while still busy.
struct SubmissionSlot<'a> {
    state: &'a watch::Sender<CheckoutState>,
}

impl Drop for SubmissionSlot<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if !state.is_busy() {
                return false;
            }

            warn!(from = ?state, "checkout dropped before completing");

            *state = CheckoutState::Failed(INTERRUPTED.to_string());
            true
        });
    }
}

/// Sequences validation, submission, cart clearing and navigation.
pub struct CheckoutOrchestrator {
    cart: SharedCart,
    policy: PricingPolicy,
    placement: Arc<dyn OrderPlacement>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<CheckoutState>,
}

impl fmt::Debug for CheckoutOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutOrchestrator")
            .field("policy", &self.policy)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl CheckoutOrchestrator {
    /// Create an orchestrator for `cart`.
    pub fn new(
        cart: SharedCart,
        policy: PricingPolicy,
        placement: Arc<dyn OrderPlacement>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(CheckoutState::Idle);

        Self {
            cart,
            policy,
            placement,
            notifier,
            navigator,
            state,
        }
    }

    /// Current state.
    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    /// Return to `Idle` from a resting state. Has no effect while a submission is in flight.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            if state.is_busy() || *state == CheckoutState::Idle {
                return false;
            }

            *state = CheckoutState::Idle;
            true
        });
    }

    /// Attempt to place an order for the current cart with `form`.
    pub async fn submit(&self, form: &CheckoutForm) -> CheckoutOutcome {
        if !self.claim() {
            debug!("checkout already in progress; ignoring submit");
            return CheckoutOutcome::Ignored;
        }

        let _slot = SubmissionSlot { state: &self.state };

        let priced = {
            let cart = self.cart.lock().await;

            (!cart.is_empty()).then(|| {
                OrderTotals::for_cart(&cart, &self.policy).map(|totals| (cart.snapshot(), totals))
            })
        };

        let (lines, totals) = match priced {
            None => return self.reject_empty_cart(),
            Some(Err(error)) => return self.fail(error.into()),
            Some(Ok(priced)) => priced,
        };

        let errors = validate(form);

        if !errors.is_empty() {
            return self.reject_invalid(errors);
        }

        self.set_state(CheckoutState::Submitting);

        info!(lines = lines.len(), total = %totals.total, "submitting order");

        let request = OrderRequest {
            form: form.clone(),
            lines,
            totals,
        };

        match self.placement.place_order(request).await {
            Ok(confirmation) => self.complete(confirmation).await,
            Err(error) => self.fail(error.into()),
        }
    }

    /// Move to `Validating` unless a submission is already in flight.
    fn claim(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_busy() {
                return false;
            }

            *state = CheckoutState::Validating;
            true
        })
    }

    fn set_state(&self, state: CheckoutState) {
        self.state.send_replace(state);
    }

    fn reject_empty_cart(&self) -> CheckoutOutcome {
        debug!("checkout attempted with an empty cart");

        self.set_state(CheckoutState::Idle);
        self.notifier.notify(Notification::error(
            "No Items to Checkout",
            "Your cart is empty. Add some spices to proceed with checkout.",
        ));
        self.navigator.navigate(Route::Products);

        CheckoutOutcome::EmptyCart
    }

    fn reject_invalid(&self, errors: FieldErrors) -> CheckoutOutcome {
        debug!(errors = errors.len(), %errors, "checkout form rejected");

        self.set_state(CheckoutState::Invalid(errors.clone()));
        self.notifier.notify(Notification::error(
            "Please check your details",
            "Some fields need your attention before we can place your order.",
        ));

        CheckoutOutcome::Invalid(errors)
    }

    async fn complete(&self, confirmation: OrderConfirmation) -> CheckoutOutcome {
        self.cart.lock().await.clear();

        info!(order_id = %confirmation.order_id, "order placed; cart cleared");

        self.set_state(CheckoutState::Succeeded(confirmation.clone()));
        self.notifier.notify(Notification::success(
            "Order placed successfully!",
            format!(
                "Order {} confirmed. You will receive a confirmation email shortly.",
                confirmation.order_id
            ),
        ));
        self.navigator
            .navigate(Route::OrderSuccess(confirmation.order_id.clone()));

        CheckoutOutcome::Placed(confirmation)
    }

    fn fail(&self, error: CheckoutError) -> CheckoutOutcome {
        warn!(%error, "order placement failed");

        self.set_state(CheckoutState::Failed(error.to_string()));
        self.notifier.notify(Notification::error(
            "Order failed",
            "We could not place your order. Your cart has been kept, please try again.",
        ));

        CheckoutOutcome::Failed(error)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };

    use jiff::civil::date;
    use masala::{
        cart::NewCartItem,
        checkout::Field,
        orders::OrderId,
        products::ProductId,
    };
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;
    use tokio::sync::Notify;

    use super::*;
    use crate::checkout::{
        navigation::MockNavigator,
        notify::{MockNotifier, NotificationKind},
        placement::MockOrderPlacement,
    };

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            email: "priya@example.com".to_string(),
            phone: "98765 43210".to_string(),
            first_name: "Priya".to_string(),
            last_name: "Nair".to_string(),
            address: "12 MG Road".to_string(),
            city: "Kochi".to_string(),
            state: "Kerala".to_string(),
            pincode: "682001".to_string(),
            ..CheckoutForm::default()
        }
    }

    fn item(id: &str, minor: i64) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            name: format!("Spice {id}"),
            price: Money::from_minor(minor, INR),
            image: String::new(),
            variant: None,
        }
    }

    fn stocked_cart() -> TestResult<SharedCart> {
        let mut cart = Cart::default();

        cart.add_one(item("a", 10_000))?;
        cart.add_one(item("a", 10_000))?;
        cart.add_one(item("b", 5_000))?;

        Ok(Arc::new(Mutex::new(cart)))
    }

    fn confirmation() -> TestResult<OrderConfirmation> {
        Ok(OrderConfirmation {
            order_id: OrderId::parse("ORDTEST12345")?,
            placed_on: date(2024, 5, 24),
        })
    }

    fn orchestrator(
        cart: SharedCart,
        placement: impl OrderPlacement + 'static,
        notifier: MockNotifier,
        navigator: MockNavigator,
    ) -> CheckoutOrchestrator {
        CheckoutOrchestrator::new(
            cart,
            PricingPolicy::standard(INR),
            Arc::new(placement),
            Arc::new(notifier),
            Arc::new(navigator),
        )
    }

    #[tokio::test]
    async fn successful_checkout_clears_cart_and_navigates() -> TestResult {
        let cart = stocked_cart()?;
        let confirmed = confirmation()?;
        let expected_route = Route::OrderSuccess(confirmed.order_id.clone());

        let mut placement = MockOrderPlacement::new();
        let returned = confirmed.clone();

        placement
            .expect_place_order()
            .once()
            .withf(|request| {
                request.lines.len() == 2
                    && request.totals.total.to_minor_units() == 34_500
                    && request.form.first_name == "Priya"
            })
            .return_once(move |_| Ok(returned));

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
            .withf(move |route| *route == expected_route)
            .return_const(());

        let orchestrator = orchestrator(cart.clone(), placement, notifier, navigator);

        let outcome = orchestrator.submit(&valid_form()).await;

        assert!(matches!(outcome, CheckoutOutcome::Placed(ref c) if *c == confirmed));
        assert!(cart.lock().await.is_empty());
        assert_eq!(orchestrator.state(), CheckoutState::Succeeded(confirmed));

        Ok(())
    }

    #[tokio::test]
    async fn invalid_form_is_not_submitted() -> TestResult {
        let cart = stocked_cart()?;
        let before = cart.lock().await.clone();

        let mut placement = MockOrderPlacement::new();
        placement.expect_place_order().never();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(|n| n.kind == NotificationKind::Error)
            .return_const(());

        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();

        let orchestrator = orchestrator(cart.clone(), placement, notifier, navigator);

        let form = CheckoutForm {
            phone: "12345".to_string(),
            ..valid_form()
        };

        let outcome = orchestrator.submit(&form).await;

        let CheckoutOutcome::Invalid(errors) = outcome else {
            return Err("expected invalid outcome".into());
        };

        assert_eq!(errors.len(), 1);
        assert!(errors.contains(Field::Phone));
        assert_eq!(*cart.lock().await, before);
        assert!(matches!(orchestrator.state(), CheckoutState::Invalid(_)));

        Ok(())
    }

    #[tokio::test]
    async fn failed_placement_preserves_cart() -> TestResult {
        let cart = stocked_cart()?;
        let before = cart.lock().await.clone();

        let mut placement = MockOrderPlacement::new();
        placement
            .expect_place_order()
            .once()
            .return_once(|_| Err(PlacementError::Unavailable("timeout".to_string())));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(|n| n.kind == NotificationKind::Error && n.title == "Order failed")
            .return_const(());

        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();

        let orchestrator = orchestrator(cart.clone(), placement, notifier, navigator);

        let outcome = orchestrator.submit(&valid_form()).await;

        assert!(matches!(
            outcome,
            CheckoutOutcome::Failed(CheckoutError::Placement(PlacementError::Unavailable(_)))
        ));
        assert_eq!(*cart.lock().await, before);
        assert!(matches!(orchestrator.state(), CheckoutState::Failed(_)));

        Ok(())
    }

    #[tokio::test]
    async fn failed_checkout_can_be_retried() -> TestResult {
        let cart = stocked_cart()?;
        let confirmed = confirmation()?;

        let mut placement = MockOrderPlacement::new();
        let mut sequence = mockall::Sequence::new();

        placement
            .expect_place_order()
            .once()
            .in_sequence(&mut sequence)
            .return_once(|_| Err(PlacementError::Declined));

        let returned = confirmed.clone();

        placement
            .expect_place_order()
            .once()
            .in_sequence(&mut sequence)
            .return_once(move |_| Ok(returned));

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(2).return_const(());

        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().once().return_const(());

        let orchestrator = orchestrator(cart.clone(), placement, notifier, navigator);

        assert!(matches!(
            orchestrator.submit(&valid_form()).await,
            CheckoutOutcome::Failed(_)
        ));
        assert!(matches!(
            orchestrator.submit(&valid_form()).await,
            CheckoutOutcome::Placed(_)
        ));
        assert!(cart.lock().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_redirects_to_products() -> TestResult {
        let cart: SharedCart = Arc::new(Mutex::new(Cart::default()));

        let mut placement = MockOrderPlacement::new();
        placement.expect_place_order().never();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(|n| n.title == "No Items to Checkout")
            .return_const(());

        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .once()
            .withf(|route| *route == Route::Products)
            .return_const(());

        let orchestrator = orchestrator(cart, placement, notifier, navigator);

        assert!(matches!(
            orchestrator.submit(&valid_form()).await,
            CheckoutOutcome::EmptyCart
        ));
        assert_eq!(orchestrator.state(), CheckoutState::Idle);

        Ok(())
    }

    /// Placement that waits for the test to release it.
    struct GatedPlacement {
        gate: Arc<Notify>,
        confirmation: OrderConfirmation,
    }

    #[async_trait::async_trait]
    impl OrderPlacement for GatedPlacement {
        async fn place_order(
            &self,
            _request: OrderRequest,
        ) -> Result<OrderConfirmation, PlacementError> {
            self.gate.notified().await;

            Ok(self.confirmation.clone())
        }
    }

    #[tokio::test]
    async fn submit_while_submitting_is_ignored() -> TestResult {
        let cart = stocked_cart()?;
        let gate = Arc::new(Notify::new());

        let placement = GatedPlacement {
            gate: gate.clone(),
            confirmation: confirmation()?,
        };

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().once().return_const(());

        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().once().return_const(());

        let orchestrator = orchestrator(cart.clone(), placement, notifier, navigator);
        let mut states = orchestrator.subscribe();
        let form = valid_form();

        let (first, second) = tokio::join!(orchestrator.submit(&form), async {
            states
                .wait_for(|state| *state == CheckoutState::Submitting)
                .await
                .map(|_| ())?;

            let second = orchestrator.submit(&form).await;

            gate.notify_one();

            Ok::<_, watch::error::RecvError>(second)
        });

        assert!(matches!(first, CheckoutOutcome::Placed(_)));
        assert!(matches!(second?, CheckoutOutcome::Ignored));
        assert!(cart.lock().await.is_empty());

        Ok(())
    }

    /// Placement whose first call never resolves.
    struct StallsOncePlacement {
        stalled: AtomicBool,
        confirmation: OrderConfirmation,
    }

    #[async_trait::async_trait]
    impl OrderPlacement for StallsOncePlacement {
        async fn place_order(
            &self,
            _request: OrderRequest,
        ) -> Result<OrderConfirmation, PlacementError> {
            if !self.stalled.swap(true, Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }

            Ok(self.confirmation.clone())
        }
    }

    #[tokio::test]
    async fn dropped_submit_frees_the_slot() -> TestResult {
        let cart = stocked_cart()?;

        let placement = StallsOncePlacement {
            stalled: AtomicBool::new(false),
            confirmation: confirmation()?,
        };

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(|n| n.kind == NotificationKind::Success)
            .return_const(());

        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().once().return_const(());

        let orchestrator = orchestrator(cart.clone(), placement, notifier, navigator);
        let form = valid_form();

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), orchestrator.submit(&form)).await;

        assert!(timed_out.is_err());
        assert_eq!(
            orchestrator.state(),
            CheckoutState::Failed(INTERRUPTED.to_string())
        );
        assert_eq!(cart.lock().await.len(), 2);

        assert!(matches!(
            orchestrator.submit(&form).await,
            CheckoutOutcome::Placed(_)
        ));
        assert!(cart.lock().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn dropped_submit_can_be_reset() -> TestResult {
        let placement = StallsOncePlacement {
            stalled: AtomicBool::new(false),
            confirmation: confirmation()?,
        };

        let orchestrator = orchestrator(
            stocked_cart()?,
            placement,
            MockNotifier::new(),
            MockNavigator::new(),
        );

        let form = valid_form();
        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), orchestrator.submit(&form)).await;

        assert!(timed_out.is_err());
        assert!(!orchestrator.state().is_busy());

        orchestrator.reset();

        assert_eq!(orchestrator.state(), CheckoutState::Idle);

        Ok(())
    }

    #[tokio::test]
    async fn reset_returns_to_idle_from_rest() -> TestResult {
        let cart = stocked_cart()?;

        let mut placement = MockOrderPlacement::new();
        placement.expect_place_order().never();

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().return_const(());

        let orchestrator = orchestrator(cart, placement, notifier, MockNavigator::new());

        orchestrator.submit(&CheckoutForm::default()).await;
        assert!(matches!(orchestrator.state(), CheckoutState::Invalid(_)));

        orchestrator.reset();
        assert_eq!(orchestrator.state(), CheckoutState::Idle);

        Ok(())
    }
}
