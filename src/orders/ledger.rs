//! Order Ledger

use std::{fs, path::Path};

use jiff::civil::Date;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    orders::{Order, OrderError, OrderId, OrderStatus},
    prices::parse_price,
};

const SEED_ORDERS_YAML: &str = include_str!("../../fixtures/orders/admin.yml");

#[derive(Debug, Deserialize)]
struct LedgerFixture {
    orders: Vec<OrderFixture>,
}

#[derive(Debug, Deserialize)]
struct OrderFixture {
    id: String,
    customer: String,
    email: String,
    total: String,
    status: String,
    date: String,
    items: u64,
    address: String,
}

impl OrderFixture {
    fn into_order(self) -> Result<Order, OrderError> {
        let id = OrderId::parse(&self.id)?;
        let total = parse_price(&self.total)
            .map_err(|error| OrderError::InvalidTotal(self.id.clone(), error))?;
        let placed_on = self
            .date
            .parse::<Date>()
            .map_err(|error| OrderError::InvalidDate(self.date.clone(), error))?;

        Ok(Order {
            id,
            customer: self.customer,
            email: self.email,
            total,
            status: self.status.parse()?,
            placed_on,
            items: self.items,
            address: self.address,
        })
    }
}

/// Admin order search. Both criteria must match.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Case-insensitive substring of the customer name or order id
    pub search: String,

    /// Only orders in this status; `None` matches all
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Whether `order` passes this filter.
    pub fn matches(&self, order: &Order) -> bool {
        let needle = self.search.to_lowercase();

        let matches_search = order.customer.to_lowercase().contains(&needle)
            || order.id.as_str().to_lowercase().contains(&needle);

        let matches_status = self.status.is_none_or(|status| status == order.status);

        matches_search && matches_status
    }
}

/// In-memory list of orders, newest last.
#[derive(Debug, Clone, Default)]
pub struct OrderLedger {
    orders: Vec<Order>,
    index: FxHashMap<OrderId, usize>,
}

impl OrderLedger {
    /// The admin console's seed orders.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the bundled fixture is malformed.
    pub fn seeded() -> Result<Self, OrderError> {
        Self::from_yaml_str(SEED_ORDERS_YAML)
    }

    /// Load orders from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, OrderError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse orders from YAML.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] on malformed YAML, ids, totals, statuses or
    /// dates, or on duplicate ids.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, OrderError> {
        let fixture: LedgerFixture = serde_norway::from_str(yaml)?;

        let mut ledger = OrderLedger::default();

        for order in fixture.orders {
            ledger.insert(order.into_order()?)?;
        }

        Ok(ledger)
    }

    /// Record a new order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::DuplicateId`] if the id is already recorded.
    pub fn insert(&mut self, order: Order) -> Result<(), OrderError> {
        if self.index.contains_key(&order.id) {
            return Err(OrderError::DuplicateId(order.id));
        }

        self.index.insert(order.id.clone(), self.orders.len());
        self.orders.push(order);

        Ok(())
    }

    /// Look up an order by id.
    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.index
            .get(id)
            .and_then(|&position| self.orders.get(position))
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for unknown ids.
    pub fn update_status(&mut self, id: &OrderId, status: OrderStatus) -> Result<(), OrderError> {
        let order = self
            .index
            .get(id)
            .and_then(|&position| self.orders.get_mut(position))
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;

        order.status = status;

        Ok(())
    }

    /// Orders passing `filter`, in ledger order.
    pub fn filter(&self, filter: &OrderFilter) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| filter.matches(order))
            .collect()
    }

    /// Iterate over every order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if the ledger has no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
