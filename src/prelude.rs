//! Masala prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartChange, CartError, CartItem, CartLine, NewCartItem},
    catalog::{Catalog, CatalogError, CatalogQuery, SortOrder},
    checkout::{
        CheckoutForm, Field, FieldError, FieldErrors, PaymentMethod, check_field, validate,
    },
    orders::{
        Order, OrderError, OrderFilter, OrderId, OrderLedger, OrderStatus, TrackingStep,
        estimated_delivery, tracking_timeline,
    },
    prices::{Price, PriceError, parse_price, store_currency},
    pricing::{OrderTotals, OrderTotalsMinor, PricingError, PricingPolicy},
    products::{Product, ProductId},
    receipt::{ReceiptError, write_summary},
};
