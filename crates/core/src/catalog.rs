//! The read-only product catalog.
//!
//! A [`Catalog`] is built once at startup, either from the built-in demo
//! assortment or from a JSON document, and is never mutated afterwards.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CurrencyCode, Price, ProductId};

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The JSON document could not be parsed.
    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two items share an id.
    #[error("duplicate catalog item id {0}")]
    DuplicateId(ProductId),

    /// An item is priced in a different currency from the rest.
    #[error("item {id} is priced in {found}, expected {expected}")]
    MixedCurrency {
        id: ProductId,
        expected: &'static str,
        found: &'static str,
    },

    /// An offer is not actually cheaper than its original price.
    #[error("offer {0} must be priced below its original price")]
    InvalidOffer(ProductId),
}

/// A purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URI.
    pub image: String,
}

/// A discounted item shown on the special offers page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub original_price: Price,
}

impl Offer {
    /// How much the offer saves against the original price.
    #[must_use]
    pub fn savings(&self) -> Price {
        Price::new(
            self.original_price.amount - self.item.price.amount,
            self.item.price.currency_code,
        )
    }

    /// Discount as a whole percentage, rounded to the nearest percent.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        if self.original_price.amount.is_zero() {
            return 0;
        }
        (self.savings().amount * Decimal::ONE_HUNDRED / self.original_price.amount)
            .round()
            .to_u32()
            .unwrap_or(0)
    }
}

/// All items the storefront sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<CatalogItem>,
    #[serde(default)]
    offers: Vec<Offer>,
}

impl Catalog {
    /// Build a catalog, checking ids are unique, one currency is used
    /// throughout and every offer is a real discount.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found.
    pub fn new(products: Vec<CatalogItem>, offers: Vec<Offer>) -> Result<Self, CatalogError> {
        let catalog = Self { products, offers };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON document.
    ///
    /// Prices are decimal strings (`"299.99"`) so no amount ever passes
    /// through a float.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON, or any validation
    /// error from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The demo assortment the storefront ships with.
    #[must_use]
    pub fn builtin() -> Self {
        let product = |id: i32, name: &str, cents: i64, photo: &str| CatalogItem {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: Price::from_cents(cents),
            image: format!("https://images.unsplash.com/photo-{photo}?w=500"),
        };
        let offer = |item: CatalogItem, original_cents: i64| Offer {
            item,
            original_price: Price::from_cents(original_cents),
        };

        Self {
            products: vec![
                product(1, "Premium Wireless Headphones", 29999, "1505740420928-5e560c06d30e"),
                product(2, "Smart Watch Series X", 39999, "1523275335684-37898b6baf30"),
                product(3, "Ultra HD Camera", 79999, "1526170375885-4d8ecf77b99f"),
                product(4, "Portable Speaker", 19999, "1572536147248-ac59a8abfa4b"),
                product(5, "Wireless Gaming Mouse", 8999, "1527864550417-7fd91fc51a46"),
                product(6, "4K Gaming Monitor", 59999, "1527443224154-c4a3942d3acf"),
                product(7, "Mechanical Keyboard", 14999, "1511467687858-23d96c32e4ae"),
                product(8, "Noise-Canceling Earbuds", 24999, "1590658268037-6bf12165a8df"),
                product(9, "Smart Home Hub", 12999, "1558002038-1055907df827"),
                product(10, "Wireless Charging Pad", 4999, "1587037542794-6c5bf0e66d8b"),
            ],
            offers: vec![
                offer(
                    product(101, "Studio Monitor Headphones Bundle", 24999, "1546435770-a3e426bf472b"),
                    34999,
                ),
                offer(
                    product(102, "Fitness Tracker Pro", 9999, "1575311373937-040b8e1fd5b6"),
                    14999,
                ),
                offer(
                    product(103, "Action Camera Kit", 29999, "1502920917128-1aa500764cbd"),
                    39999,
                ),
                offer(
                    product(104, "Smart Speaker Duo", 14999, "1543512214-318c7553f230"),
                    19999,
                ),
            ],
        }
    }

    #[must_use]
    pub fn products(&self) -> &[CatalogItem] {
        &self.products
    }

    #[must_use]
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Find a product or offer item by id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&CatalogItem> {
        self.products
            .iter()
            .chain(self.offers.iter().map(|offer| &offer.item))
            .find(|item| item.id == id)
    }

    /// Find an offer by the id of its item.
    #[must_use]
    pub fn find_offer(&self, id: ProductId) -> Option<&Offer> {
        self.offers.iter().find(|offer| offer.item.id == id)
    }

    /// Currency every price in the catalog is quoted in.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.products
            .first()
            .or_else(|| self.offers.first().map(|offer| &offer.item))
            .map_or_else(CurrencyCode::default, |item| item.price.currency_code)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let currency = self.currency();
        let mut seen = HashSet::new();

        let items = self
            .products
            .iter()
            .chain(self.offers.iter().map(|offer| &offer.item));
        for item in items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            if item.price.currency_code != currency {
                return Err(CatalogError::MixedCurrency {
                    id: item.id,
                    expected: currency.code(),
                    found: item.price.currency_code.code(),
                });
            }
        }

        for offer in &self.offers {
            if offer.original_price.currency_code != currency
                || offer.item.price.amount >= offer.original_price.amount
            {
                return Err(CatalogError::InvalidOffer(offer.item.id));
            }
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let catalog = Catalog::builtin();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.products().len(), 10);
        assert_eq!(catalog.offers().len(), 4);
    }

    #[test]
    fn test_find_resolves_products_and_offers() {
        let catalog = Catalog::builtin();
        let headphones = catalog.find(ProductId::new(1)).unwrap();
        assert_eq!(headphones.name, "Premium Wireless Headphones");
        assert_eq!(headphones.price.display(), "$299.99");

        let offer_item = catalog.find(ProductId::new(102)).unwrap();
        assert_eq!(offer_item.name, "Fitness Tracker Pro");

        assert!(catalog.find(ProductId::new(999)).is_none());
    }

    #[test]
    fn test_offer_discount() {
        let catalog = Catalog::builtin();
        let offer = catalog.find_offer(ProductId::new(102)).unwrap();
        assert_eq!(offer.savings().display(), "$50.00");
        assert_eq!(offer.discount_percent(), 33);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "products": [
                {"id": 1, "name": "Cable", "price": {"amount": "9.99"}, "image": "https://example.com/cable.jpg"}
            ],
            "offers": [
                {"id": 2, "name": "Cable 3-pack", "price": {"amount": "19.99"}, "image": "https://example.com/3.jpg",
                 "original_price": {"amount": "29.97"}}
            ]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.products().len(), 1);
        assert_eq!(
            catalog.find(ProductId::new(2)).unwrap().price,
            Price::from_cents(1999)
        );
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let json = r#"{"products": [
            {"id": 1, "name": "A", "price": {"amount": "1.00"}, "image": "a"},
            {"id": 1, "name": "B", "price": {"amount": "2.00"}, "image": "b"}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(id)) if id == ProductId::new(1)
        ));
    }

    #[test]
    fn test_rejects_mixed_currency() {
        let json = r#"{"products": [
            {"id": 1, "name": "A", "price": {"amount": "1.00"}, "image": "a"},
            {"id": 2, "name": "B", "price": {"amount": "2.00", "currency_code": "EUR"}, "image": "b"}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::MixedCurrency { .. })
        ));
    }

    #[test]
    fn test_rejects_offer_that_is_not_a_discount() {
        let item = CatalogItem {
            id: ProductId::new(5),
            name: "Lamp".to_owned(),
            price: Price::from_cents(2000),
            image: "lamp".to_owned(),
        };
        let result = Catalog::new(
            Vec::new(),
            vec![Offer {
                item,
                original_price: Price::from_cents(2000),
            }],
        );
        assert!(matches!(result, Err(CatalogError::InvalidOffer(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{"),
            Err(CatalogError::Parse(_))
        ));
    }
}
