//! Prices

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// A monetary amount in one of the supported ISO currencies.
pub type Price = Money<'static, Currency>;

/// Errors raised while parsing a price string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The string was not of the form `AMOUNT CURRENCY`.
    #[error("expected format 'AMOUNT CURRENCY', got: {0}")]
    InvalidFormat(String),

    /// The amount could not be parsed or does not fit in minor units.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The amount was below zero.
    #[error("price cannot be negative: {0}")]
    Negative(String),

    /// The currency code is not one we trade in.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Currency every storefront price is quoted in.
pub fn store_currency() -> &'static Currency {
    iso::INR
}

/// A zero amount in the given currency.
pub fn zero(currency: &'static Currency) -> Price {
    Money::from_minor(0, currency)
}

/// Look up a supported currency by its ISO alpha code.
pub fn currency_for_code(code: &str) -> Option<&'static Currency> {
    match code {
        "INR" => Some(iso::INR),
        "USD" => Some(iso::USD),
        "GBP" => Some(iso::GBP),
        "EUR" => Some(iso::EUR),
        _ => None,
    }
}

/// Parse a price string (e.g. `"299 INR"` or `"12.50 INR"`).
///
/// # Errors
///
/// Returns a [`PriceError`] when the string is malformed, negative, or names an
/// unsupported currency.
pub fn parse_price(s: &str) -> Result<Price, PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidFormat(s.to_string()));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidAmount(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PriceError::Negative(s.to_string()));
    }

    let currency =
        currency_for_code(code).ok_or_else(|| PriceError::UnknownCurrency(code.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| PriceError::InvalidAmount(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}
