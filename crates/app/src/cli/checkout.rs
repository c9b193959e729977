use std::{
    io::{self, Write},
    num::NonZeroU32,
    str::FromStr,
};

use clap::{Args, ValueEnum};
use masala::{
    cart::{Cart, CartLine},
    checkout::{CheckoutForm, PaymentMethod},
    pricing::{OrderTotals, OrderTotalsMinor},
    receipt,
};
use masala_app::{
    checkout::{CheckoutOutcome, OrderConfirmation},
    config::AppConfig,
    display,
    session::{OrderTracking, StorefrontSession},
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaymentArg {
    Card,
    Upi,
    Cod,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(payment: PaymentArg) -> Self {
        match payment {
            PaymentArg::Card => PaymentMethod::Card,
            PaymentArg::Upi => PaymentMethod::Upi,
            PaymentArg::Cod => PaymentMethod::Cod,
        }
    }
}

/// `ID` or `ID=QTY`
#[derive(Debug, Clone)]
struct ItemArg {
    id: String,
    quantity: NonZeroU32,
}

impl FromStr for ItemArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = match s.split_once('=') {
            Some((id, quantity)) => (
                id,
                quantity
                    .trim()
                    .parse::<NonZeroU32>()
                    .map_err(|error| format!("invalid quantity in {s:?}: {error}"))?,
            ),
            None => (s, NonZeroU32::MIN),
        };

        let id = id.trim();

        if id.is_empty() {
            return Err(format!("missing product id in {s:?}"));
        }

        Ok(Self {
            id: id.to_string(),
            quantity,
        })
    }
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Product to buy, as ID or ID=QTY; repeat for more lines
    #[arg(long = "item", required = true)]
    items: Vec<ItemArg>,

    /// Contact email
    #[arg(long, default_value = "")]
    email: String,

    /// 10-digit mobile number
    #[arg(long, default_value = "")]
    phone: String,

    /// First name
    #[arg(long, default_value = "")]
    first_name: String,

    /// Last name
    #[arg(long, default_value = "")]
    last_name: String,

    /// Street address
    #[arg(long, default_value = "")]
    address: String,

    /// City
    #[arg(long, default_value = "")]
    city: String,

    /// State
    #[arg(long, default_value = "")]
    state: String,

    /// 6-digit PIN code
    #[arg(long, default_value = "")]
    pincode: String,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentArg::Card)]
    payment: PaymentArg,

    /// Print the placed order as JSON instead of a receipt
    #[arg(long)]
    json: bool,
}

impl CheckoutArgs {
    fn form(&self) -> CheckoutForm {
        CheckoutForm {
            email: self.email.clone(),
            phone: self.phone.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            pincode: self.pincode.clone(),
            payment_method: self.payment.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PlacedOrder {
    order_id: String,
    placed_on: String,
    estimated_delivery: String,
    lines: Vec<CartLine>,
    totals: OrderTotalsMinor,
}

pub(crate) async fn run(config: &AppConfig, args: &CheckoutArgs) -> Result<(), String> {
    let session = StorefrontSession::open(config)
        .map_err(|error| format!("failed to open storefront: {error}"))?;

    for item in &args.items {
        session
            .add_to_cart(&item.id, item.quantity)
            .await
            .map_err(|error| format!("failed to add {}: {error}", item.id))?;
    }

    let cart = session.cart().await;
    let totals = session
        .totals()
        .await
        .map_err(|error| format!("failed to price cart: {error}"))?;

    let confirmation = match session.checkout(&args.form()).await {
        CheckoutOutcome::Placed(confirmation) => confirmation,
        CheckoutOutcome::Invalid(errors) => {
            return Err(format!("please check your details: {errors}"));
        }
        CheckoutOutcome::EmptyCart => return Err("your cart is empty".to_string()),
        CheckoutOutcome::Failed(error) => return Err(format!("order failed: {error}")),
        CheckoutOutcome::Ignored => return Err("a checkout is already in progress".to_string()),
    };

    let tracking = session
        .track(&confirmation.order_id)
        .await
        .map_err(|error| format!("failed to track order: {error}"))?;

    write_placed_order(args, &cart, &totals, &confirmation, &tracking)?;

    session.close().await;

    Ok(())
}

fn write_placed_order(
    args: &CheckoutArgs,
    cart: &Cart,
    totals: &OrderTotals,
    confirmation: &OrderConfirmation,
    tracking: &OrderTracking,
) -> Result<(), String> {
    let mut stdout = io::stdout().lock();

    if args.json {
        let placed = PlacedOrder {
            order_id: confirmation.order_id.to_string(),
            placed_on: confirmation.placed_on.to_string(),
            estimated_delivery: tracking.estimated_delivery.to_string(),
            lines: cart.snapshot(),
            totals: totals.to_minor(),
        };

        serde_json::to_writer_pretty(&mut stdout, &placed)
            .map_err(|error| format!("failed to write order: {error}"))?;

        writeln!(stdout).map_err(|error| format!("failed to write order: {error}"))
    } else {
        receipt::write_summary(&mut stdout, cart, totals)
            .map_err(|error| format!("failed to write receipt: {error}"))?;

        display::write_tracking(&mut stdout, tracking)
            .map_err(|error| format!("failed to write tracking: {error}"))
    }
}
