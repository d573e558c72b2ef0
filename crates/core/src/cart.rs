//! Shopping cart model.
//!
//! Every operation returns a new [`Cart`] and leaves the receiver untouched,
//! so a cart that has already been handed to another page can never change
//! underneath it.
//!
//! Invariants:
//! - at most one [`CartEntry`] per product id
//! - every entry has a quantity of at least one
//! - entries keep the order in which their item was first added

use serde::Serialize;

use crate::catalog::CatalogItem;
use crate::types::{CurrencyCode, Price, ProductId};

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    item: CatalogItem,
    quantity: u32,
}

impl CartEntry {
    #[must_use]
    pub const fn item(&self) -> &CatalogItem {
        &self.item
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of the line: unit price times quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.item.price.times(self.quantity)
    }
}

/// An ordered collection of cart entries keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild a cart from `(item, quantity)` pairs.
    ///
    /// Zero quantities are skipped and repeated ids are merged into the
    /// first entry for that id, so the result always satisfies the cart
    /// invariants whatever the input looked like.
    #[must_use]
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (CatalogItem, u32)>,
    {
        let mut entries: Vec<CartEntry> = Vec::new();
        for (item, quantity) in lines {
            if quantity == 0 {
                continue;
            }
            match entries.iter_mut().find(|entry| entry.item.id == item.id) {
                Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
                None => entries.push(CartEntry { item, quantity }),
            }
        }
        Self { entries }
    }

    /// A copy of this cart with one more of `item`.
    ///
    /// Increments the existing entry for `item.id`, or appends a new entry
    /// with quantity 1.
    #[must_use]
    pub fn with_item(&self, item: &CatalogItem) -> Self {
        let mut entries = self.entries.clone();
        match entries.iter_mut().find(|entry| entry.item.id == item.id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(1),
            None => entries.push(CartEntry {
                item: item.clone(),
                quantity: 1,
            }),
        }
        Self { entries }
    }

    /// A copy of this cart without any entry for `id`.
    ///
    /// Removal drops the whole entry regardless of its quantity.
    #[must_use]
    pub fn without_item(&self, id: ProductId) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.item.id != id)
                .cloned()
                .collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Quantity of `id` in the cart, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, CartEntry::quantity)
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.entries
            .iter()
            .fold(0_u32, |sum, entry| sum.saturating_add(entry.quantity))
    }

    /// Exact sum of every line price.
    ///
    /// An empty cart totals zero in `currency`.
    #[must_use]
    pub fn total_price(&self, currency: CurrencyCode) -> Price {
        self.entries
            .iter()
            .map(CartEntry::line_price)
            .fold(Price::zero(currency), |sum, line| sum + line)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
