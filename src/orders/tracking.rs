//! Order Tracking

use jiff::{ToSpan, civil::Date};
use serde::Serialize;

use crate::orders::{Order, OrderError, OrderStatus};

/// Days after placement each milestone is expected, in lifecycle order.
const MILESTONES: [(&str, OrderStatus, i64); 5] = [
    ("Order Placed", OrderStatus::Pending, 0),
    ("Processing", OrderStatus::Processing, 1),
    ("Shipped", OrderStatus::Shipped, 2),
    ("Out for Delivery", OrderStatus::OutForDelivery, 3),
    ("Delivered", OrderStatus::Delivered, 3),
];

const DELIVERY_DAYS: i64 = 3;

/// One milestone on the tracking page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingStep {
    /// Milestone label
    pub label: &'static str,

    /// Actual or expected date
    pub date: Date,

    /// Whether the order has reached this milestone
    pub completed: bool,
}

/// Build the five-step tracking timeline for an order.
///
/// # Errors
///
/// Returns [`OrderError::DateOutOfRange`] if a milestone date overflows.
pub fn tracking_timeline(order: &Order) -> Result<Vec<TrackingStep>, OrderError> {
    MILESTONES
        .iter()
        .map(|&(label, reached_at, days)| {
            Ok(TrackingStep {
                label,
                date: add_days(order.placed_on, days)?,
                completed: order.status >= reached_at,
            })
        })
        .collect()
}

/// Expected delivery date.
///
/// # Errors
///
/// Returns [`OrderError::DateOutOfRange`] if the date overflows.
pub fn estimated_delivery(order: &Order) -> Result<Date, OrderError> {
    add_days(order.placed_on, DELIVERY_DAYS)
}

fn add_days(date: Date, days: i64) -> Result<Date, OrderError> {
    date.checked_add(days.days())
        .map_err(OrderError::DateOutOfRange)
}
