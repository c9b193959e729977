//! Pricing
//!
//! Order totals for a cart: subtotal, GST, shipping and the amount payable.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::Serialize;
use thiserror::Error;

use crate::{cart::Cart, prices::Price};

/// Errors that can occur while calculating order totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A policy amount is priced in a different currency to the cart.
    #[error("policy currency {0} does not match cart currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Tax and shipping rules applied at checkout.
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    /// GST rate applied to the subtotal
    pub tax_rate: Percentage,

    /// Subtotal at or above which shipping is free
    pub free_shipping_threshold: Price,

    /// Flat shipping charge below the threshold
    pub shipping_charge: Price,
}

impl PricingPolicy {
    /// Standard storefront policy: 18% GST, free shipping from 499, otherwise 50.
    pub fn standard(currency: &'static Currency) -> Self {
        Self {
            tax_rate: Percentage::from(0.18),
            free_shipping_threshold: Money::from_minor(49_900, currency),
            shipping_charge: Money::from_minor(5_000, currency),
        }
    }

    /// Shipping due on a given subtotal.
    pub fn shipping_for(&self, subtotal: &Price) -> Price {
        let free = subtotal.to_minor_units() == 0
            || subtotal.to_minor_units() >= self.free_shipping_threshold.to_minor_units();

        if free {
            Money::from_minor(0, subtotal.currency())
        } else {
            self.shipping_charge
        }
    }
}

/// Totals for an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    /// Sum of line totals
    pub subtotal: Price,

    /// GST on the subtotal
    pub tax: Price,

    /// Shipping charge, zero when free
    pub shipping: Price,

    /// Amount payable
    pub total: Price,
}

impl OrderTotals {
    /// Calculate the totals for a cart under `policy`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the policy is in another currency or a
    /// calculation overflows.
    pub fn for_cart(cart: &Cart, policy: &PricingPolicy) -> Result<Self, PricingError> {
        ensure_currency(policy, cart.currency())?;

        let subtotal = cart.total_price();
        let tax = Money::from_minor(
            percent_of_minor(&policy.tax_rate, subtotal.to_minor_units())?,
            cart.currency(),
        );
        let shipping = policy.shipping_for(&subtotal);
        let total = subtotal.add(tax)?.add(shipping)?;

        Ok(Self {
            subtotal,
            tax,
            shipping,
            total,
        })
    }

    /// Whether shipping was waived.
    pub fn ships_free(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }

    /// Minor-unit view of the totals.
    pub fn to_minor(&self) -> OrderTotalsMinor {
        OrderTotalsMinor {
            currency: self.total.currency().iso_alpha_code,
            subtotal: self.subtotal.to_minor_units(),
            tax: self.tax.to_minor_units(),
            shipping: self.shipping.to_minor_units(),
            total: self.total.to_minor_units(),
        }
    }
}

/// Serialisable minor-unit totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotalsMinor {
    /// ISO currency code
    pub currency: &'static str,

    /// Subtotal in minor units
    pub subtotal: i64,

    /// Tax in minor units
    pub tax: i64,

    /// Shipping in minor units
    pub shipping: i64,

    /// Total in minor units
    pub total: i64,
}

/// Calculate `percent` of `minor`, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the result does not fit in an `i64`.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}

fn ensure_currency(
    policy: &PricingPolicy,
    currency: &'static Currency,
) -> Result<(), PricingError> {
    [policy.free_shipping_threshold, policy.shipping_charge]
        .iter()
        .find(|amount| amount.currency() != currency)
        .map_or(Ok(()), |amount| {
            Err(PricingError::CurrencyMismatch(
                amount.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ))
        })
}
