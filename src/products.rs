//! Products

use std::{borrow::Borrow, fmt};

use rusty_money::Money;
use serde::{Deserialize, Serialize};

use crate::{cart::NewCartItem, prices::Price};

/// Stable catalog identifier for a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Catalog id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Price,

    /// Price before markdown, when the product is on offer
    pub original_price: Option<Price>,

    /// Image URL
    pub image: String,

    /// Pack size or grind, e.g. "100g"
    pub variant: Option<String>,

    /// Shelf the product is listed under
    pub category: Option<String>,
}

impl Product {
    /// Amount knocked off the original price, if the product is on offer.
    pub fn markdown(&self) -> Option<Price> {
        let original = self.original_price?;
        let off = original
            .to_minor_units()
            .checked_sub(self.price.to_minor_units())?;

        (off > 0).then(|| Money::from_minor(off, self.price.currency()))
    }
}

impl From<&Product> for NewCartItem {
    fn from(product: &Product) -> Self {
        NewCartItem {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            variant: product.variant.clone(),
        }
    }
}
