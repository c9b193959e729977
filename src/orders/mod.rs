//! Orders
//!
//! Order identifiers, fulfilment statuses, tracking timelines and the admin ledger.

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use serde::Serialize;
use thiserror::Error;

use crate::prices::{Price, PriceError};

pub mod ledger;
pub mod tracking;

pub use ledger::{OrderFilter, OrderLedger};
pub use tracking::{TrackingStep, estimated_delivery, tracking_timeline};

const ORDER_ID_PREFIX: &str = "ORD";

/// Order Errors
#[derive(Debug, Error)]
pub enum OrderError {
    /// Not an `ORD`-prefixed id
    #[error("Invalid order id: {0}")]
    InvalidId(String),

    /// Unrecognised status label
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    /// A date could not be parsed
    #[error("Invalid order date {0}: {1}")]
    InvalidDate(String, jiff::Error),

    /// Date arithmetic left the supported range
    #[error("Order date out of range: {0}")]
    DateOutOfRange(jiff::Error),

    /// An order total could not be parsed
    #[error("Invalid total for order {0}: {1}")]
    InvalidTotal(String, PriceError),

    /// Two orders share an id
    #[error("Duplicate order id: {0}")]
    DuplicateId(OrderId),

    /// No order with this id
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// IO error reading a ledger file
    #[error("Failed to read order ledger: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Order number shown to shoppers, e.g. `ORD7K2M9QX4B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Parse an order id, accepting lower case input.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidId`] unless the value is `ORD` followed by
    /// at least one ASCII letter or digit.
    pub fn parse(raw: &str) -> Result<Self, OrderError> {
        let normalised = raw.trim().to_ascii_uppercase();

        match normalised.strip_prefix(ORDER_ID_PREFIX) {
            Some(suffix) if is_valid_suffix(suffix) => Ok(Self(normalised)),
            _ => Err(OrderError::InvalidId(raw.to_string())),
        }
    }

    /// Build an id from its generated suffix.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidId`] if the suffix is empty or not alphanumeric.
    pub fn from_suffix(suffix: &str) -> Result<Self, OrderError> {
        let suffix = suffix.to_ascii_uppercase();

        if !is_valid_suffix(&suffix) {
            return Err(OrderError::InvalidId(suffix));
        }

        Ok(Self(format!("{ORDER_ID_PREFIX}{suffix}")))
    }

    /// Borrow the full id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_suffix(suffix: &str) -> bool {
    !suffix.is_empty()
        && suffix
            .bytes()
            .all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit())
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrderId {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Fulfilment status, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OrderStatus {
    /// Received, not yet picked
    Pending,

    /// Being packed
    Processing,

    /// Handed to the courier
    Shipped,

    /// With the delivery agent
    OutForDelivery,

    /// Received by the customer
    Delivered,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "outfordelivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            _ => Err(OrderError::UnknownStatus(s.to_string())),
        }
    }
}

/// Order, as listed in the admin console.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Order number
    pub id: OrderId,

    /// Customer full name
    pub customer: String,

    /// Customer email
    pub email: String,

    /// Amount charged
    pub total: Price,

    /// Current status
    pub status: OrderStatus,

    /// Date the order was placed
    pub placed_on: Date,

    /// Number of units ordered
    pub items: u64,

    /// Short delivery address
    pub address: String,
}
