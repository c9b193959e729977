//! Checkout
//!
//! The typed checkout form and its field validator.

pub mod form;
pub mod validation;

pub use form::{CheckoutForm, Field, PaymentMethod};
pub use validation::{FieldError, FieldErrors, check_field, validate};
