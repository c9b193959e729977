//! Masala storefront application layer: configuration, logging, the checkout flow and the
//! storefront session.

pub mod checkout;
pub mod config;
pub mod display;
pub mod observability;
pub mod session;
