//! Cart Items

use std::num::NonZeroU32;

use rusty_money::Money;
use serde::Serialize;

use crate::{prices::Price, products::ProductId};

/// A product about to be added to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    /// Product id; cart lines are unique by this id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Price,

    /// Image URL
    pub image: String,

    /// Optional pack size or grind
    pub variant: Option<String>,
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    id: ProductId,
    name: String,
    price: Price,
    image: String,
    quantity: NonZeroU32,
    variant: Option<String>,
}

impl CartItem {
    pub(crate) fn new(item: NewCartItem, quantity: NonZeroU32) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity,
            variant: item.variant,
        }
    }

    /// Product id
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price
    pub fn price(&self) -> &Price {
        &self.price
    }

    /// Image URL
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Number of units on this line, never zero.
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Pack size or grind, if any.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Unit price multiplied by quantity.
    pub fn line_total(&self) -> Price {
        Money::from_minor(self.line_total_minor(), self.price.currency())
    }

    pub(crate) fn line_total_minor(&self) -> i64 {
        self.price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity.get()))
    }

    pub(crate) fn add_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = self.quantity.saturating_add(quantity.get());
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }
}

/// Owned, serialisable view of a cart line, used when handing a cart to an
/// order placement service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Pack size or grind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Units ordered
    pub quantity: u32,

    /// Unit price in minor units
    pub unit_price_minor: i64,

    /// Line total in minor units
    pub line_total_minor: i64,
}

impl From<&CartItem> for CartLine {
    fn from(item: &CartItem) -> Self {
        CartLine {
            id: item.id.clone(),
            name: item.name.clone(),
            variant: item.variant.clone(),
            quantity: item.quantity.get(),
            unit_price_minor: item.price.to_minor_units(),
            line_total_minor: item.line_total_minor(),
        }
    }
}
