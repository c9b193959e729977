//! Cart
//!
//! The in-memory record of a shopper's cart. Lines keep insertion order, ids are
//! unique, and every quantity is at least one.

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    prices::{Price, store_currency},
    products::ProductId,
};

mod item;

pub use item::{CartItem, CartLine, NewCartItem};

/// Errors related to cart mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The item is priced in a different currency to the cart (item id, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),
}

/// What a cart operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added,

    /// An existing line's quantity was increased.
    Incremented,

    /// A line's quantity was replaced.
    QuantitySet,

    /// A line was deleted.
    Removed,

    /// Every line was deleted.
    Cleared,

    /// Nothing matched; the cart is as it was.
    Unchanged,
}

/// Cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    currency: &'static Currency,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(store_currency())
    }
}

impl Cart {
    /// Create an empty cart priced in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Add `quantity` units of an item.
    ///
    /// An existing line with the same id has its quantity increased; otherwise a
    /// new line is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the item is not priced in the
    /// cart currency. The cart is left unchanged.
    pub fn add_item(
        &mut self,
        item: NewCartItem,
        quantity: NonZeroU32,
    ) -> Result<CartChange, CartError> {
        let item_currency = item.price.currency();

        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                item.id,
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(existing) = self.items.iter_mut().find(|line| line.id() == &item.id) {
            existing.add_quantity(quantity);

            return Ok(CartChange::Incremented);
        }

        self.items.push(CartItem::new(item, quantity));

        Ok(CartChange::Added)
    }

    /// Add a single unit of an item.
    ///
    /// # Errors
    ///
    /// See [`Cart::add_item`].
    pub fn add_one(&mut self, item: NewCartItem) -> Result<CartChange, CartError> {
        self.add_item(item, NonZeroU32::MIN)
    }

    /// Set the quantity of the line with `id`.
    ///
    /// A quantity of zero or below removes the line. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &str, new_quantity: i64) -> CartChange {
        let Some(position) = self.position(id) else {
            return CartChange::Unchanged;
        };

        if new_quantity <= 0 {
            self.items.remove(position);

            return CartChange::Removed;
        }

        let clamped = u32::try_from(new_quantity).unwrap_or(u32::MAX);

        match (NonZeroU32::new(clamped), self.items.get_mut(position)) {
            (Some(quantity), Some(line)) => {
                line.set_quantity(quantity);

                CartChange::QuantitySet
            }
            _ => CartChange::Unchanged,
        }
    }

    /// Remove the line with `id`, if present.
    pub fn remove_item(&mut self, id: &str) -> CartChange {
        match self.position(id) {
            Some(position) => {
                self.items.remove(position);

                CartChange::Removed
            }
            None => CartChange::Unchanged,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) -> CartChange {
        if self.items.is_empty() {
            return CartChange::Unchanged;
        }

        self.items.clear();

        CartChange::Cleared
    }

    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity().get()))
            .sum()
    }

    /// Sum of price multiplied by quantity across all lines.
    pub fn total_price(&self) -> Price {
        let minor = self
            .items
            .iter()
            .fold(0_i64, |acc, line| acc.saturating_add(line.line_total_minor()));

        Money::from_minor(minor, self.currency)
    }

    /// Get the line with `id`.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|line| line.id().as_str() == id)
    }

    /// Iterate over the lines in display order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Owned copy of the lines, for handing to an order service.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.items.iter().map(CartLine::from).collect()
    }

    /// Get the number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|line| line.id().as_str() == id)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{INR, USD};
    use testresult::TestResult;

    use super::*;

    fn spice(id: &str, rupees: i64) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            name: format!("Spice {id}"),
            price: Money::from_minor(rupees * 100, INR),
            image: format!("{id}.jpg"),
            variant: None,
        }
    }

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
    }

    fn assert_aggregates(cart: &Cart) {
        let expected_items: u64 = cart.iter().map(|l| u64::from(l.quantity().get())).sum();
        let expected_minor: i64 = cart
            .iter()
            .map(|l| l.price().to_minor_units() * i64::from(l.quantity().get()))
            .sum();

        assert_eq!(cart.total_items(), expected_items);
        assert_eq!(cart.total_price().to_minor_units(), expected_minor);
    }

    #[test]
    fn default_cart_is_empty_inr() {
        let cart = Cart::default();

        assert!(cart.is_empty());
        assert_eq!(cart.currency(), INR);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Money::from_minor(0, INR));
    }

    #[test]
    fn add_item_appends_new_line() -> TestResult {
        let mut cart = Cart::default();

        assert_eq!(cart.add_one(spice("a", 100))?, CartChange::Added);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 1);

        Ok(())
    }

    #[test]
    fn add_item_same_id_increments_quantity() -> TestResult {
        let mut cart = Cart::default();

        cart.add_item(spice("a", 100), qty(2))?;
        let change = cart.add_item(spice("a", 100), qty(3))?;

        assert_eq!(change, CartChange::Incremented);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("a").map(|l| l.quantity().get()), Some(5));

        Ok(())
    }

    #[test]
    fn add_item_rejects_foreign_currency() {
        let mut cart = Cart::default();
        let mut item = spice("a", 100);
        item.price = Money::from_minor(100, USD);

        let result = cart.add_one(item);

        assert_eq!(
            result,
            Err(CartError::CurrencyMismatch(
                ProductId::new("a"),
                USD.iso_alpha_code,
                INR.iso_alpha_code,
            ))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn lines_keep_insertion_order() -> TestResult {
        let mut cart = Cart::default();

        cart.add_one(spice("c", 1))?;
        cart.add_one(spice("a", 1))?;
        cart.add_one(spice("b", 1))?;
        cart.add_one(spice("a", 1))?;

        let ids: Vec<&str> = cart.iter().map(|l| l.id().as_str()).collect();

        assert_eq!(ids, vec!["c", "a", "b"]);

        Ok(())
    }

    #[test]
    fn update_quantity_sets_value() -> TestResult {
        let mut cart = Cart::default();
        cart.add_one(spice("a", 100))?;

        assert_eq!(cart.update_quantity("a", 4), CartChange::QuantitySet);
        assert_eq!(cart.total_items(), 4);

        Ok(())
    }

    #[test]
    fn update_quantity_zero_removes_line() -> TestResult {
        let mut cart = Cart::default();
        cart.add_one(spice("a", 100))?;

        assert_eq!(cart.update_quantity("a", 0), CartChange::Removed);
        assert!(cart.get("a").is_none());

        Ok(())
    }

    #[test]
    fn update_quantity_negative_removes_line() -> TestResult {
        let mut cart = Cart::default();
        cart.add_one(spice("a", 100))?;
        cart.add_one(spice("b", 50))?;

        assert_eq!(cart.update_quantity("a", -1), CartChange::Removed);
        assert_eq!(cart.len(), 1);
        assert!(cart.get("b").is_some());

        Ok(())
    }

    #[test]
    fn update_quantity_unknown_id_is_noop() -> TestResult {
        let mut cart = Cart::default();
        cart.add_one(spice("a", 100))?;
        let before = cart.clone();

        assert_eq!(cart.update_quantity("missing", 3), CartChange::Unchanged);
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn update_quantity_clamps_huge_values() -> TestResult {
        let mut cart = Cart::default();
        cart.add_one(spice("a", 1))?;

        cart.update_quantity("a", i64::MAX);

        assert_eq!(cart.get("a").map(|l| l.quantity()), Some(NonZeroU32::MAX));

        Ok(())
    }

    #[test]
    fn remove_item_unknown_id_is_noop() {
        let mut cart = Cart::default();

        assert_eq!(cart.remove_item("missing"), CartChange::Unchanged);
        assert!(cart.is_empty());
    }

    #[test]
    fn add_then_remove_restores_prior_state() -> TestResult {
        let mut cart = Cart::default();
        cart.add_item(spice("a", 100), qty(2))?;
        cart.add_one(spice("b", 50))?;
        let before = cart.clone();

        cart.add_one(spice("x", 75))?;
        cart.remove_item("x");

        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn clear_empties_cart() -> TestResult {
        let mut cart = Cart::default();
        cart.add_one(spice("a", 100))?;

        assert_eq!(cart.clear(), CartChange::Cleared);
        assert!(cart.is_empty());
        assert_eq!(cart.clear(), CartChange::Unchanged);

        Ok(())
    }

    #[test]
    fn aggregates_hold_after_every_operation() -> TestResult {
        let mut cart = Cart::default();

        cart.add_item(spice("a", 100), qty(2))?;
        assert_aggregates(&cart);

        cart.add_one(spice("b", 50))?;
        assert_aggregates(&cart);

        cart.add_item(spice("c", 249), qty(7))?;
        assert_aggregates(&cart);

        cart.update_quantity("c", 3);
        assert_aggregates(&cart);

        cart.add_item(spice("a", 100), qty(1))?;
        assert_aggregates(&cart);

        cart.update_quantity("b", 0);
        assert_aggregates(&cart);

        cart.remove_item("missing");
        assert_aggregates(&cart);

        cart.remove_item("a");
        assert_aggregates(&cart);

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Money::from_minor(74_700, INR));

        Ok(())
    }

    #[test]
    fn two_line_cart_totals() -> TestResult {
        let mut cart = Cart::default();
        cart.add_item(spice("a", 100), qty(2))?;
        cart.add_one(spice("b", 50))?;

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Money::from_minor(25_000, INR));

        Ok(())
    }

    #[test]
    fn snapshot_mirrors_lines() -> TestResult {
        let mut cart = Cart::default();
        cart.add_item(spice("a", 100), qty(2))?;

        let snapshot = cart.snapshot();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.first().map(|l| l.line_total_minor), Some(20_000));

        Ok(())
    }
}
