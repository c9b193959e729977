//! Terminal tables for catalog listings, admin orders and tracking timelines.

use std::io;

use masala::{orders::Order, products::Product};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::session::OrderTracking;

/// Write a product listing.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_products<'a>(
    mut out: impl io::Write,
    products: impl IntoIterator<Item = &'a Product>,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Variant", "Price", "Was", "Category"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.variant.clone().unwrap_or_default(),
            product.price.to_string(),
            product
                .original_price
                .map(|price| price.to_string())
                .unwrap_or_default(),
            product.category.clone().unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}")
}

/// Write the admin order list.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_orders<'a>(
    mut out: impl io::Write,
    orders: impl IntoIterator<Item = &'a Order>,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record([
        "Order ID", "Customer", "Email", "Date", "Items", "Total", "Status",
    ]);

    for order in orders {
        builder.push_record([
            order.id.to_string(),
            order.customer.clone(),
            order.email.clone(),
            order.placed_on.to_string(),
            order.items.to_string(),
            order.total.to_string(),
            order.status.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Columns::new(4..6), Alignment::right());

    writeln!(out, "{table}")
}

/// Write an order's tracking timeline.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_tracking(mut out: impl io::Write, tracking: &OrderTracking) -> io::Result<()> {
    writeln!(
        out,
        "Order {} ({}), estimated delivery {}",
        tracking.order.id, tracking.order.status, tracking.estimated_delivery
    )?;

    let mut builder = Builder::default();

    builder.push_record(["", "Step", "Date"]);

    for step in &tracking.steps {
        builder.push_record([
            if step.completed { "✓" } else { "·" }.to_string(),
            step.label.to_string(),
            step.date.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::rounded());

    writeln!(out, "{table}")
}
