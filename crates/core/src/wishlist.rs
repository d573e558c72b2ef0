//! Wishlist model: an ordered set of catalog items keyed by id.

use serde::Serialize;

use crate::catalog::CatalogItem;
use crate::types::ProductId;

/// Items a shopper has saved for later.
///
/// Like [`Cart`](crate::Cart), every operation returns a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<CatalogItem>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a wishlist, keeping the first occurrence of each id.
    #[must_use]
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = CatalogItem>,
    {
        items
            .into_iter()
            .fold(Self::new(), |wishlist, item| wishlist.with_item(&item))
    }

    /// A copy of this wishlist with `item` appended, or an unchanged copy
    /// if it is already present.
    #[must_use]
    pub fn with_item(&self, item: &CatalogItem) -> Self {
        if self.contains(item.id) {
            return self.clone();
        }
        let mut items = self.items.clone();
        items.push(item.clone());
        Self { items }
    }

    /// A copy of this wishlist without `id`.
    #[must_use]
    pub fn without_item(&self, id: ProductId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id != id)
                .cloned()
                .collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Wishlist {
    type Item = &'a CatalogItem;
    type IntoIter = std::slice::Iter<'a, CatalogItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
