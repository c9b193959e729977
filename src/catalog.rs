//! Catalog
//!
//! The product list shoppers browse and add to their cart, loaded from YAML fixtures.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    prices::{Price, PriceError, currency_for_code, parse_price, store_currency},
    products::{Product, ProductId},
};

const BUNDLED_CATALOG_YAML: &str = include_str!("../fixtures/products/spices.yml");

/// Catalog Loading Errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A product price could not be parsed
    #[error("Invalid price for product {0}: {1}")]
    InvalidPrice(String, PriceError),

    /// Unknown catalog currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A product is priced in a different currency to the catalog
    #[error("Currency mismatch for product {id}: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Offending product id
        id: String,
        /// Catalog currency
        expected: &'static str,
        /// Product currency
        found: &'static str,
    },

    /// A product id was empty
    #[error("Product ids cannot be empty")]
    EmptyId,

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateId(String),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    /// Catalog currency code; defaults to the store currency
    currency: Option<String>,

    /// Products in display order
    products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: String,
    name: String,

    /// e.g. "249 INR"
    price: String,

    #[serde(default)]
    original_price: Option<String>,

    #[serde(default)]
    image: String,

    #[serde(default)]
    variant: Option<String>,

    #[serde(default)]
    category: Option<String>,
}

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Alphabetical by product name
    #[default]
    Name,

    /// Cheapest first
    Price,

    /// Catalog order
    Featured,
}

/// Shopper-facing listing filter.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the product name
    pub search: String,

    /// Only products on this shelf; `None` lists every shelf
    pub category: Option<String>,

    /// Listing order
    pub sort: SortOrder,
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// The storefront's own spice list, compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the bundled fixture is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUNDLED_CATALOG_YAML)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on malformed YAML, bad prices, mixed
    /// currencies, or empty or duplicate ids.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let currency = match fixture.currency.as_deref() {
            Some(code) => currency_for_code(code)
                .ok_or_else(|| CatalogError::UnknownCurrency(code.to_string()))?,
            None => store_currency(),
        };

        let mut catalog = Catalog {
            products: Vec::with_capacity(fixture.products.len()),
            index: FxHashMap::default(),
            currency,
        };

        for product in fixture.products {
            catalog.insert(product.into_product(currency)?)?;
        }

        Ok(catalog)
    }

    fn insert(&mut self, product: Product) -> Result<(), CatalogError> {
        if self.index.contains_key(&product.id) {
            return Err(CatalogError::DuplicateId(product.id.to_string()));
        }

        self.index.insert(product.id.clone(), self.products.len());
        self.products.push(product);

        Ok(())
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|&position| self.products.get(position))
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Products matching a shopper's search, filter and sort.
    pub fn browse(&self, query: &CatalogQuery) -> Vec<&Product> {
        let needle = query.search.to_lowercase();

        let mut listing: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| product.name.to_lowercase().contains(&needle))
            .filter(|product| match &query.category {
                Some(category) => product.category.as_deref() == Some(category.as_str()),
                None => true,
            })
            .collect();

        match query.sort {
            SortOrder::Name => listing.sort_by(|a, b| a.name.cmp(&b.name)),
            SortOrder::Price => listing.sort_by_key(|product| product.price.to_minor_units()),
            SortOrder::Featured => {}
        }

        listing
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency every product is priced in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl ProductFixture {
    fn into_product(self, currency: &'static Currency) -> Result<Product, CatalogError> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }

        let price = self.parse(&self.price, currency)?;
        let original_price = self
            .original_price
            .as_deref()
            .map(|raw| self.parse(raw, currency))
            .transpose()?;

        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            price,
            original_price,
            image: self.image,
            variant: self.variant,
            category: self.category,
        })
    }

    fn parse(
        &self,
        raw: &str,
        currency: &'static Currency,
    ) -> Result<Price, CatalogError> {
        let price =
            parse_price(raw).map_err(|error| CatalogError::InvalidPrice(self.id.clone(), error))?;

        if price.currency() != currency {
            return Err(CatalogError::CurrencyMismatch {
                id: self.id.clone(),
                expected: currency.iso_alpha_code,
                found: price.currency().iso_alpha_code,
            });
        }

        Ok(price)
    }
}
