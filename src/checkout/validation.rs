//! Checkout Validation

use std::{fmt, sync::LazyLock};

use regex::Regex;
use smallvec::SmallVec;
use thiserror::Error;

use crate::checkout::form::{CheckoutForm, Field};

#[expect(
    clippy::expect_used,
    reason = "pattern is a literal and covered by tests"
)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

#[expect(
    clippy::expect_used,
    reason = "pattern is a literal and covered by tests"
)]
static MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid mobile pattern"));

#[expect(
    clippy::expect_used,
    reason = "pattern is a literal and covered by tests"
)]
static PINCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("valid pincode pattern"));

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FieldError {
    /// No value was given.
    #[error("This field is required")]
    Required,

    /// Not of the form `local@domain.tld`.
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Not a 10 digit mobile number starting with 6-9.
    #[error("Please enter a valid 10-digit mobile number")]
    InvalidPhone,

    /// Not a 6 digit PIN code.
    #[error("Please enter a valid 6-digit PIN code")]
    InvalidPincode,
}

/// Field-level errors from one validation pass, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: SmallVec<[(Field, FieldError); 8]>,
}

impl FieldErrors {
    fn push(&mut self, field: Field, error: FieldError) {
        self.errors.push((field, error));
    }

    /// The error recorded against `field`, if any.
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|&(_, error)| error)
    }

    /// Whether `field` has an error.
    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Drop the error for one field, as when the shopper edits it.
    pub fn clear_field(&mut self, field: Field) -> Option<FieldError> {
        let position = self
            .errors
            .iter()
            .position(|(candidate, _)| *candidate == field)?;

        Some(self.errors.remove(position).1)
    }

    /// Iterate over `(field, error)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().copied()
    }

    /// Number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when the form may be submitted.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, error)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{}: {error}", field.label())?;
        }

        Ok(())
    }
}

/// Validate a checkout form.
///
/// Every field is checked; errors accumulate rather than stopping at the first.
/// The payment method is not validated.
pub fn validate(form: &CheckoutForm) -> FieldErrors {
    let mut errors = FieldErrors::default();

    for field in Field::ALL {
        if let Some(error) = check_field(field, form.value(field)) {
            errors.push(field, error);
        }
    }

    errors
}

/// Validate a single field value.
pub fn check_field(field: Field, value: &str) -> Option<FieldError> {
    let value = value.trim();

    if value.is_empty() {
        return Some(FieldError::Required);
    }

    match field {
        Field::Email if !EMAIL.is_match(value) => Some(FieldError::InvalidEmail),
        Field::Phone if !MOBILE.is_match(&digits_only(value)) => Some(FieldError::InvalidPhone),
        Field::Pincode if !PINCODE.is_match(value) => Some(FieldError::InvalidPincode),
        _ => None,
    }
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
