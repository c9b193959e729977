//! Masala
//!
//! Masala is the storefront core of an online spice shop: catalog, cart, pricing, checkout
//! validation, order tracking and receipts, with no I/O beyond loading YAML fixtures.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod receipt;
