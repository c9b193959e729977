//! Receipt

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::Cart, pricing::OrderTotals};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The output sink failed.
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Write the cart lines and order totals as a table followed by a summary block.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if writing to `out` fails.
pub fn write_summary(
    mut out: impl io::Write,
    cart: &Cart,
    totals: &OrderTotals,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Variant", "Qty", "Unit Price", "Total"]);

    for item in cart.iter() {
        builder.push_record([
            item.name().to_string(),
            item.variant().unwrap_or_default().to_string(),
            item.quantity().to_string(),
            item.price().to_string(),
            item.line_total().to_string(),
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Columns::new(2..5), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")?;

    let shipping = if totals.ships_free() {
        "FREE".to_string()
    } else {
        totals.shipping.to_string()
    };

    let lines = [
        ("Subtotal:", totals.subtotal.to_string()),
        ("GST:", totals.tax.to_string()),
        ("Shipping:", shipping),
        ("Total:", totals.total.to_string()),
    ];

    write_summary_lines(&mut out, &lines)?;

    Ok(())
}

/// Writes summary lines with right-aligned labels and a fixed-width value column.
fn write_summary_lines(out: &mut impl io::Write, lines: &[(&str, String)]) -> io::Result<()> {
    let label_width = lines
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or_default();

    let value_width = lines
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    for (label, value) in lines {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
    }

    Ok(())
}
