//! Checkout Form

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the shopper intends to pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit or debit card
    #[default]
    Card,

    /// UPI transfer
    Upi,

    /// Cash on delivery
    Cod,
}

impl PaymentMethod {
    /// Label shown next to the payment option.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Upi => "UPI Payment",
            PaymentMethod::Cod => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Cod => "cod",
        })
    }
}

/// A checkout form field that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Contact email
    Email,
    /// Given name
    FirstName,
    /// Family name
    LastName,
    /// Mobile number
    Phone,
    /// Street address
    Address,
    /// City
    City,
    /// State
    State,
    /// PIN code
    Pincode,
}

impl Field {
    /// Every validated field, in form order.
    pub const ALL: [Field; 8] = [
        Field::Email,
        Field::FirstName,
        Field::LastName,
        Field::Phone,
        Field::Address,
        Field::City,
        Field::State,
        Field::Pincode,
    ];

    /// Form key as submitted by the storefront.
    pub fn key(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::City => "city",
            Field::State => "state",
            Field::Pincode => "pincode",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Field::Email => "Email Address",
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Phone => "Phone Number",
            Field::Address => "Address",
            Field::City => "City",
            Field::State => "State",
            Field::Pincode => "PIN Code",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Snapshot of the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutForm {
    /// Contact email
    pub email: String,

    /// Mobile number, any punctuation allowed
    pub phone: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// State
    pub state: String,

    /// Six digit PIN code
    pub pincode: String,

    /// Chosen payment method
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Raw value of a field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::City => &self.city,
            Field::State => &self.state,
            Field::Pincode => &self.pincode,
        }
    }

    /// Replace the value of a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Email => &mut self.email,
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Phone => &mut self.phone,
            Field::Address => &mut self.address,
            Field::City => &mut self.city,
            Field::State => &mut self.state,
            Field::Pincode => &mut self.pincode,
        };

        *slot = value.into();
    }

    /// Full name for the shipping label.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}
